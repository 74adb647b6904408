//! Enum descriptor extraction and value-summary composition.
//!
//! Enum metadata is registered explicitly per type (value, symbolic name,
//! optional attribute description) rather than discovered reflectively. The
//! extractor derives one (value, name) pair per distinct underlying value and
//! composes human-readable summaries, merging descriptions from registered
//! attributes and/or the external documentation store. Per-value resolution
//! failures yield an empty description; the extractor never aborts
//! mid-enumeration, so a partially documented enum cannot block document
//! completion.

use crate::doc_store::DocStore;
use crate::document::{EnumValue, Schema};
use crate::hierarchy::{MemberKind, MemberRef};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where per-value enum descriptions are resolved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DescriptionSource {
    /// Registered attribute descriptions only
    #[default]
    Attribute,
    /// External documentation store only
    ExternalDoc,
    /// Registered attribute first, external documentation as fallback
    AttributeThenExternalDoc,
}

/// One declared enum variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumVariant {
    /// Underlying value
    pub value: i64,
    /// Symbolic name
    pub name: String,
    /// Description registered alongside the declaration, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnumVariant {
    /// Create a variant without a registered description
    pub fn new(value: i64, name: &str) -> Self {
        Self {
            value,
            name: name.to_string(),
            description: None,
        }
    }

    /// Create a variant with a registered description
    pub fn described(value: i64, name: &str, description: &str) -> Self {
        Self {
            value,
            name: name.to_string(),
            description: Some(description.to_string()),
        }
    }
}

/// Declared metadata for one enum type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumInfo {
    /// Canonical type id
    pub type_id: String,
    /// Variants in declaration order
    pub variants: Vec<EnumVariant>,
}

impl EnumInfo {
    /// Create enum metadata from declared variants
    pub fn new(type_id: &str, variants: Vec<EnumVariant>) -> Self {
        Self {
            type_id: type_id.to_string(),
            variants,
        }
    }

    /// One (value, name) pair per distinct underlying value, in order of first
    /// declaration. When several names alias the same value, the last-declared
    /// name wins.
    pub fn distinct_names(&self) -> Vec<(i64, String)> {
        let mut order: Vec<i64> = Vec::new();
        let mut names: BTreeMap<i64, String> = BTreeMap::new();
        for variant in &self.variants {
            if !names.contains_key(&variant.value) {
                order.push(variant.value);
            }
            names.insert(variant.value, variant.name.clone());
        }
        order
            .into_iter()
            .map(|value| {
                let name = names.remove(&value).unwrap_or_default();
                (value, name)
            })
            .collect()
    }

    /// Per-value descriptions, aligned with `distinct_names`.
    ///
    /// Resolution failures (no registered description, no documentation node,
    /// blank text) yield an empty string for that value; enumeration always
    /// completes.
    pub fn value_descriptions(
        &self,
        source: DescriptionSource,
        store: &DocStore,
        include_remarks: bool,
    ) -> Vec<String> {
        self.distinct_names()
            .iter()
            .map(|(value, name)| match source {
                DescriptionSource::Attribute => self.attribute_description(*value),
                DescriptionSource::ExternalDoc => {
                    self.doc_description(name, store, include_remarks)
                }
                DescriptionSource::AttributeThenExternalDoc => {
                    let attr = self.attribute_description(*value);
                    if attr.is_empty() {
                        self.doc_description(name, store, include_remarks)
                    } else {
                        attr
                    }
                }
            })
            .collect()
    }

    /// Registered description of the last-declared variant carrying a value
    fn attribute_description(&self, value: i64) -> String {
        self.variants
            .iter()
            .rev()
            .find(|v| v.value == value)
            .and_then(|v| v.description.as_deref())
            .map(|d| d.trim().to_string())
            .unwrap_or_default()
    }

    /// Description from the documentation store entry of a variant field
    fn doc_description(&self, name: &str, store: &DocStore, include_remarks: bool) -> String {
        let member = MemberRef::for_member(&self.type_id, name, MemberKind::Field);
        let Some(entry) = store.lookup(&member.member_id()) else {
            return String::new();
        };
        let Some(summary) = entry.summary.as_deref() else {
            return String::new();
        };
        let mut text = summary.trim().to_string();
        if include_remarks {
            if let Some(remarks) = entry.remarks_text() {
                text.push_str(&format!(" ({})", remarks.trim()));
            }
        }
        text
    }
}

/// Registry of enum metadata, keyed by type id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumRegistry {
    enums: BTreeMap<String, EnumInfo>,
}

impl EnumRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for an enum type
    pub fn insert(&mut self, info: EnumInfo) {
        self.enums.insert(info.type_id.clone(), info);
    }

    /// Look up enum metadata by type id
    pub fn get(&self, type_id: &str) -> Option<&EnumInfo> {
        self.enums.get(type_id)
    }
}

/// Compose the human-readable value summary for an enum schema.
///
/// Produces one line per enum value: `"value = name"`, or
/// `"value = name (description)"` when descriptions are enabled and present.
/// Schemas backed by free-form string enumerations (no parallel names
/// extension) get `"value"` alone per line. Returns `None` when the schema has
/// no enum values, when a names extension exists but its length does not match
/// the value count (malformed input, skipped rather than fatal), or when the
/// values cannot be paired with names.
pub fn compose_enum_summary(
    schema: &Schema,
    names_alias: &str,
    descriptions_alias: &str,
    include_descriptions: bool,
    new_line: &str,
) -> Option<String> {
    let values = schema.enum_values.as_ref().filter(|v| !v.is_empty())?;

    let Some(names) = schema.string_array_extension(names_alias) else {
        // Free-form string enumerations carry their meaning in the values
        // themselves; anything else has nothing readable to show.
        let all_strings = values.iter().all(|v| matches!(v, EnumValue::String(_)));
        if !all_strings {
            return None;
        }
        let mut text = String::new();
        for value in values {
            text.push_str(new_line);
            text.push_str(&value.to_string());
        }
        return Some(text);
    };

    if names.len() != values.len() {
        warn!(
            "Enum names extension length {} does not match value count {}, skipping summary",
            names.len(),
            values.len()
        );
        return None;
    }

    let descriptions = if include_descriptions {
        schema
            .string_array_extension(descriptions_alias)
            .filter(|d| d.len() == values.len())
    } else {
        None
    };

    let mut text = String::new();
    for (i, value) in values.iter().enumerate() {
        text.push_str(new_line);
        text.push_str(&format!("{} = {}", value, names[i]));
        if let Some(descriptions) = descriptions {
            if !descriptions[i].is_empty() {
                text.push_str(&format!(" ({})", descriptions[i]));
            }
        }
    }
    Some(text)
}

/// Append a composed enum summary to a description, unless the description
/// already contains it. Composition stays idempotent under repeated
/// invocation.
pub fn append_enum_summary(description: &mut Option<String>, summary: &str) {
    match description {
        None => *description = Some(summary.to_string()),
        Some(existing) => {
            if !existing.contains(summary) {
                existing.push_str(summary);
            }
        }
    }
}

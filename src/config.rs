//! Configuration surface for the augmentation passes.

use crate::document::{X_ENUM_DESCRIPTIONS, X_ENUM_NAMES};
use crate::enums::DescriptionSource;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration for the document augmentation passes.
///
/// All options have working defaults; `validate` fails fast on malformed setup
/// before any document processing starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AugmentConfig {
    /// Attach per-value descriptions to enum schemas. Default is false.
    pub include_descriptions: bool,
    /// Append remarks text (in parentheses) after inherited summaries. Default is false.
    pub include_remarks: bool,
    /// Where per-value enum descriptions are resolved from.
    pub description_source: DescriptionSource,
    /// Extension key under which symbolic enum names are stored.
    pub x_enum_names_alias: String,
    /// Extension key under which per-value enum descriptions are stored.
    pub x_enum_descriptions_alias: String,
    /// Line separator used when composing enum value summaries.
    pub new_line: String,
    /// Apply the enum extension filter to component schemas. Default is true.
    pub apply_schema_filter: bool,
    /// Apply the enum extension filter to operation parameters. Default is true.
    pub apply_parameter_filter: bool,
    /// Apply the document-level enum display filter. Default is true.
    pub apply_document_filter: bool,
    /// Append per-tag action counts to tag descriptions. Default is false.
    pub append_action_count_to_tags: bool,
    /// Message template for appended action counts; must contain a `{}`
    /// placeholder for the count.
    pub action_count_message_template: String,
    /// Sort the document-level tag catalog by name. Default is false.
    pub order_tags_by_name: bool,
    /// Type ids skipped by the documentation-inheritance annotators.
    pub excluded_types: BTreeSet<String>,
    /// Roles accepted by the role-based pruner.
    pub accepted_roles: BTreeSet<String>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            include_descriptions: false,
            include_remarks: false,
            description_source: DescriptionSource::Attribute,
            x_enum_names_alias: X_ENUM_NAMES.to_string(),
            x_enum_descriptions_alias: X_ENUM_DESCRIPTIONS.to_string(),
            new_line: "\n".to_string(),
            apply_schema_filter: true,
            apply_parameter_filter: true,
            apply_document_filter: true,
            append_action_count_to_tags: false,
            action_count_message_template: "(action count: {})".to_string(),
            order_tags_by_name: false,
            excluded_types: BTreeSet::new(),
            accepted_roles: BTreeSet::new(),
        }
    }
}

impl AugmentConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when an extension alias is not a vendor
    /// extension key or the configured line separator is empty.
    pub fn validate(&self) -> Result<()> {
        if !self.x_enum_names_alias.starts_with("x-") {
            return Err(Error::Config(format!(
                "enum names alias must start with \"x-\": {}",
                self.x_enum_names_alias
            )));
        }
        if !self.x_enum_descriptions_alias.starts_with("x-") {
            return Err(Error::Config(format!(
                "enum descriptions alias must start with \"x-\": {}",
                self.x_enum_descriptions_alias
            )));
        }
        if self.new_line.is_empty() {
            return Err(Error::Config(
                "line separator for enum summaries must not be empty".to_string(),
            ));
        }
        if !self.action_count_message_template.contains("{}") {
            return Err(Error::Config(format!(
                "action count message template must contain \"{{}}\": {}",
                self.action_count_message_template
            )));
        }
        Ok(())
    }
}

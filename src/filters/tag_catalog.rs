//! Filters reshaping the document-level tag catalog.

use super::DocumentFilter;
use crate::document::OpenApiDocument;
use log::debug;
use std::collections::BTreeMap;

/// Appends the number of operations carrying each tag to the tag's
/// description.
///
/// The message template must contain a `{}` placeholder for the count;
/// configuration validation rejects templates without one before any document
/// processing starts. Appending is idempotent: a description already carrying
/// the formatted message is left alone.
pub struct AppendActionCountToTagSummaryDocumentFilter<'a> {
    message_template: &'a str,
}

impl<'a> AppendActionCountToTagSummaryDocumentFilter<'a> {
    /// Create the filter with a count message template
    pub fn new(message_template: &'a str) -> Self {
        Self { message_template }
    }
}

impl DocumentFilter for AppendActionCountToTagSummaryDocumentFilter<'_> {
    fn apply(&self, document: &mut OpenApiDocument) {
        if document.tags.is_empty() {
            return;
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (_, _, operation) in document.operations() {
            for tag in &operation.tags {
                *counts.entry(tag.clone()).or_default() += 1;
            }
        }

        for tag in document.tags.iter_mut() {
            let Some(count) = counts.get(&tag.name) else {
                continue;
            };
            let message = self.message_template.replacen("{}", &count.to_string(), 1);
            debug!("Tag {} carries {} operation(s)", tag.name, count);
            match &mut tag.description {
                None => tag.description = Some(message),
                Some(existing) => {
                    if !existing.contains(&message) {
                        existing.push(' ');
                        existing.push_str(&message);
                    }
                }
            }
        }
    }
}

/// Sorts the document-level tag catalog by tag name.
pub struct TagOrderByNameDocumentFilter;

impl DocumentFilter for TagOrderByNameDocumentFilter {
    fn apply(&self, document: &mut OpenApiDocument) {
        document.tags.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

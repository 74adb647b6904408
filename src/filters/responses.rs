//! Document filter rewriting responses by HTTP status code.

use super::{has_text, DocumentFilter};
use crate::document::{MediaType, OpenApiDocument, Schema, ALL_METHODS};
use log::warn;
use serde::{Deserialize, Serialize};

const JSON_MEDIA_TYPE: &str = "application/json";

/// What a rewrite does to the example payload of a matched response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseExampleOption {
    /// Remove the JSON content entry from the response
    Clear,
    /// Point the JSON content at the configured component and attach the
    /// example value
    AddNew,
    /// Leave the response content alone
    #[default]
    None,
}

/// One rewrite rule targeting responses declared under a status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRewrite {
    /// Status code the rule matches, e.g. 400
    pub status_code: u16,
    /// Replacement description; blank or absent leaves the declared one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// How to treat the JSON content of matched responses
    #[serde(default)]
    pub example_option: ResponseExampleOption,
    /// Example value attached when the option adds new content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    /// Component schema the rewritten content points at
    pub component: String,
}

/// Rewrites every response matching a configured status code.
///
/// A rule whose component is absent from the document is skipped wholesale,
/// so rewrites never introduce dangling schema references.
pub struct ChangeResponseByStatusCodeDocumentFilter<'a> {
    rewrites: &'a [ResponseRewrite],
}

impl<'a> ChangeResponseByStatusCodeDocumentFilter<'a> {
    /// Create the filter over a set of rewrite rules
    pub fn new(rewrites: &'a [ResponseRewrite]) -> Self {
        Self { rewrites }
    }
}

impl DocumentFilter for ChangeResponseByStatusCodeDocumentFilter<'_> {
    fn apply(&self, document: &mut OpenApiDocument) {
        for rewrite in self.rewrites {
            if document.component(&rewrite.component).is_none() {
                warn!(
                    "skipping response rewrite for status {}: component {} not in document",
                    rewrite.status_code, rewrite.component
                );
                continue;
            }
            let status_key = rewrite.status_code.to_string();
            for item in document.paths.values_mut() {
                for method in ALL_METHODS {
                    let Some(operation) = item.operation_mut(method) else {
                        continue;
                    };
                    let Some(response) = operation.responses.get_mut(&status_key) else {
                        continue;
                    };
                    if has_text(&rewrite.description) {
                        if let Some(description) = &rewrite.description {
                            response.description = description.clone();
                        }
                    }
                    match rewrite.example_option {
                        ResponseExampleOption::Clear => {
                            if let Some(content) = &mut response.content {
                                content.remove(JSON_MEDIA_TYPE);
                            }
                        }
                        ResponseExampleOption::AddNew => {
                            let media = response
                                .content
                                .get_or_insert_with(Default::default)
                                .entry(JSON_MEDIA_TYPE.to_string())
                                .or_insert_with(MediaType::default);
                            media.schema = Some(Schema::component_ref(&rewrite.component));
                            media.example = rewrite.example.clone();
                        }
                        ResponseExampleOption::None => {}
                    }
                }
            }
        }
    }
}

//! Read-only documentation store.
//!
//! Documentation arrives as one or more pre-parsed source trees, each mapping
//! canonical member keys to their text sections. Sources are consulted in the
//! order they were registered and the first match wins. The store is built
//! once per document build and treated as immutable afterwards, so it can be
//! shared across builds without locking.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Text sections a redirect marker can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSection {
    /// Summary text
    Summary,
    /// Remarks text
    Remarks,
    /// Per-parameter text
    Param,
}

/// Inline directive meaning "use documentation from elsewhere".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InheritMarker {
    /// Explicit target member key, when the marker names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Sections the inheritance is restricted to; absent means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<DocSection>>,
}

/// Documentation recorded for one member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocEntry {
    /// Summary text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Remarks text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Example text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Per-parameter text, keyed by parameter name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// Inheritance marker, when the member inherits its documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit: Option<InheritMarker>,
}

impl DocEntry {
    /// True when the entry carries a non-empty summary
    pub fn has_summary(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Non-empty remarks text, if present
    pub fn remarks_text(&self) -> Option<&str> {
        self.remarks.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// One documentation source tree, keyed by canonical member key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocSource {
    entries: BTreeMap<String, DocEntry>,
}

impl DocSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Record documentation for a member
    pub fn insert(&mut self, member_id: &str, entry: DocEntry) {
        self.entries.insert(member_id.to_string(), entry);
    }

    /// Look up the entry for a member in this source
    pub fn entry(&self, member_id: &str) -> Option<&DocEntry> {
        self.entries.get(member_id)
    }

    /// Iterate over all entries in deterministic key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DocEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Ordered collection of documentation sources with first-match-wins lookup.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    sources: Vec<DocSource>,
}

impl DocStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; sources are consulted in registration order
    pub fn push_source(&mut self, source: DocSource) {
        self.sources.push(source);
    }

    /// Load a pre-parsed source tree from a JSON file and append it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid source
    /// tree. This is a configuration-time failure; it never happens during
    /// document processing.
    pub fn load_source(&mut self, path: &Path) -> Result<()> {
        debug!("Loading documentation source: {}", path.display());
        let content = fs::read_to_string(path)?;
        let source: DocSource =
            serde_json::from_str(&content).map_err(|e| Error::SourceError {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;
        self.sources.push(source);
        Ok(())
    }

    /// Look up documentation for a member.
    ///
    /// Scans all sources in registration order and returns the first entry
    /// with a non-empty summary. Absence is not an error.
    pub fn lookup(&self, member_id: &str) -> Option<&DocEntry> {
        self.sources
            .iter()
            .filter_map(|s| s.entry(member_id))
            .find(|e| e.has_summary())
    }

    /// Look up the first entry recorded for a member in any source,
    /// regardless of whether it carries a summary.
    pub fn entry(&self, member_id: &str) -> Option<&DocEntry> {
        self.sources.iter().find_map(|s| s.entry(member_id))
    }

    /// Iterate over all entries of all sources, in source registration order
    /// and deterministic key order within each source.
    pub fn iter_entries(&self) -> impl Iterator<Item = (&str, &DocEntry)> {
        self.sources.iter().flat_map(|s| s.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn entry_with_summary(summary: &str) -> DocEntry {
        DocEntry {
            summary: Some(summary.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_first_source_wins() {
        let mut first = DocSource::new();
        first.insert("T:App.Todo", entry_with_summary("From first"));
        let mut second = DocSource::new();
        second.insert("T:App.Todo", entry_with_summary("From second"));

        let mut store = DocStore::new();
        store.push_source(first);
        store.push_source(second);

        let entry = store.lookup("T:App.Todo").unwrap();
        assert_eq!(entry.summary.as_deref(), Some("From first"));
    }

    #[test]
    fn test_lookup_skips_entries_without_summary() {
        let mut first = DocSource::new();
        first.insert("T:App.Todo", DocEntry::default());
        let mut second = DocSource::new();
        second.insert("T:App.Todo", entry_with_summary("Has text"));

        let mut store = DocStore::new();
        store.push_source(first);
        store.push_source(second);

        let entry = store.lookup("T:App.Todo").unwrap();
        assert_eq!(entry.summary.as_deref(), Some("Has text"));

        // The raw entry lookup still returns the first occurrence.
        assert!(!store.entry("T:App.Todo").unwrap().has_summary());
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let store = DocStore::new();
        assert!(store.lookup("T:App.Missing").is_none());
    }

    #[test]
    fn test_blank_summary_is_not_a_summary() {
        let entry = entry_with_summary("   ");
        assert!(!entry.has_summary());
    }

    #[test]
    fn test_load_source_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(
            br#"{
                "T:App.Todo": { "summary": "A todo item", "remarks": "Stored per user" },
                "P:App.Todo.Name": { "inherit": { "target": "P:App.ITodo.Name" } }
            }"#,
        )
        .unwrap();

        let mut store = DocStore::new();
        store.load_source(&path).unwrap();

        assert_eq!(
            store.lookup("T:App.Todo").unwrap().summary.as_deref(),
            Some("A todo item")
        );
        let inherit = store.entry("P:App.Todo.Name").unwrap().inherit.as_ref().unwrap();
        assert_eq!(inherit.target.as_deref(), Some("P:App.ITodo.Name"));
        assert!(inherit.sections.is_none());
    }

    #[test]
    fn test_load_source_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = DocStore::new();
        assert!(store.load_source(&path).is_err());
    }
}

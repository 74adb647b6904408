//! Redirect map for documentation inheritance markers.
//!
//! Scans every documentation entry for an inheritance marker and records the
//! explicit target and scope restriction, if any. When the same member is
//! marked in more than one source (cross-source duplication), the
//! first-occurrence-in-scan-order entry wins; this tie-break is a documented
//! contract, not an artifact of container ordering.

use crate::doc_store::{DocSection, DocStore};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum number of explicit redirect hops followed before a chain is
/// truncated. Redirect chains are intended to be acyclic and short; the bound
/// turns a pathological cycle into a partial result instead of a hang.
pub const MAX_REDIRECT_DEPTH: usize = 32;

/// Which text sections an inheritance applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeSet {
    /// Summary text is inherited
    pub summary: bool,
    /// Remarks text is inherited
    pub remarks: bool,
    /// Per-parameter text is inherited
    pub param: bool,
}

impl ScopeSet {
    /// Scope covering every section; the default when a marker carries no
    /// restriction
    pub fn unrestricted() -> Self {
        Self {
            summary: true,
            remarks: true,
            param: true,
        }
    }

    /// Scope built from an explicit section list
    pub fn from_sections(sections: &[DocSection]) -> Self {
        Self {
            summary: sections.contains(&DocSection::Summary),
            remarks: sections.contains(&DocSection::Remarks),
            param: sections.contains(&DocSection::Param),
        }
    }

    /// Sections allowed by both scopes. Used to accumulate the most specific
    /// restriction along a redirect chain.
    pub fn intersect(self, other: ScopeSet) -> Self {
        Self {
            summary: self.summary && other.summary,
            remarks: self.remarks && other.remarks,
            param: self.param && other.param,
        }
    }
}

impl Default for ScopeSet {
    fn default() -> Self {
        Self::unrestricted()
    }
}

/// Redirect recorded for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    /// Explicit target member key, when the marker names one
    pub target: Option<String>,
    /// Sections the inheritance is restricted to
    pub scope: ScopeSet,
}

/// Result of following a chain of explicit redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRedirect {
    /// Final explicit target, or `None` when the starting entry names no
    /// target and the hierarchy must be walked instead
    pub target: Option<String>,
    /// Most specific scope seen along the chain
    pub scope: ScopeSet,
}

/// Member key to redirect entry map for one document build.
#[derive(Debug, Clone, Default)]
pub struct RedirectMap {
    entries: BTreeMap<String, RedirectEntry>,
}

impl RedirectMap {
    /// Build the map by scanning every entry of every source for an
    /// inheritance marker.
    ///
    /// Sources are scanned in registration order; when multiple entries mark
    /// the same member, the first occurrence wins.
    pub fn build(store: &DocStore) -> Self {
        let mut entries: BTreeMap<String, RedirectEntry> = BTreeMap::new();
        for (member_id, entry) in store.iter_entries() {
            let Some(marker) = &entry.inherit else {
                continue;
            };
            if entries.contains_key(member_id) {
                debug!("Duplicate redirect for {}, keeping first occurrence", member_id);
                continue;
            }
            let scope = marker
                .sections
                .as_deref()
                .map(ScopeSet::from_sections)
                .unwrap_or_default();
            entries.insert(
                member_id.to_string(),
                RedirectEntry {
                    target: marker.target.clone(),
                    scope,
                },
            );
        }
        debug!("Built redirect map with {} entries", entries.len());
        Self { entries }
    }

    /// Look up the redirect entry for a member
    pub fn get(&self, member_id: &str) -> Option<&RedirectEntry> {
        self.entries.get(member_id)
    }

    /// Number of recorded redirects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no member carries a redirect
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follow the chain of explicit targets starting at a member's redirect
    /// entry.
    ///
    /// Advances while the current target itself carries a redirect with an
    /// explicit target, accumulating the most specific scope seen. Stops when
    /// the target has no further redirect entry, when a member repeats, or
    /// when the depth bound is exceeded; in the latter cases the best partial
    /// result is kept. Returns `None` when the member has no redirect entry
    /// at all.
    pub fn resolve_chain(&self, member_id: &str) -> Option<ResolvedRedirect> {
        let first = self.get(member_id)?;
        let mut scope = first.scope;
        let mut target = first.target.clone();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        visited.insert(member_id.to_string());

        let mut depth = 0;
        while let Some(current) = target.clone() {
            let Some(next) = self.get(&current) else {
                break;
            };
            let Some(next_target) = next.target.clone() else {
                break;
            };
            if depth >= MAX_REDIRECT_DEPTH || !visited.insert(current) {
                warn!(
                    "Redirect chain from {} truncated after {} hops",
                    member_id, depth
                );
                break;
            }
            scope = scope.intersect(next.scope);
            target = Some(next_target);
            depth += 1;
        }

        Some(ResolvedRedirect { target, scope })
    }
}

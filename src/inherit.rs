//! Documentation-inheritance resolver.
//!
//! Given a member whose documentation is inherited, finds the concrete
//! ancestor member whose text should be used. Candidates are the
//! identically-named members on the declaring type's interfaces followed by
//! the one on its base type; the base type is appended last so that, absent an
//! explicit target, the base-class declaration wins over interface
//! declarations. An explicit target can pick any specific candidate, or
//! bypass hierarchy walking entirely when it names a member directly.
//!
//! All traversal is guarded: redirect chains are depth-bounded and the
//! hierarchy walk carries a visited set, so pathological cyclic hierarchies
//! degrade to a partial result instead of recursing forever.

use crate::doc_store::{DocEntry, DocStore};
use crate::document::Schema;
use crate::hierarchy::{MemberKind, MemberRef, TypeRegistry};
use crate::redirects::{RedirectMap, ScopeSet};
use log::{debug, warn};
use std::collections::BTreeSet;

/// Documentation resolved for an inheriting member.
#[derive(Debug)]
pub struct ResolvedDoc<'a> {
    /// The ancestor's documentation entry
    pub entry: &'a DocEntry,
    /// Sections the inheritance is restricted to
    pub scope: ScopeSet,
}

/// Resolver walking the type/member hierarchy for inherited documentation.
pub struct InheritResolver<'a> {
    registry: &'a TypeRegistry,
    store: &'a DocStore,
    redirects: &'a RedirectMap,
}

impl<'a> InheritResolver<'a> {
    /// Create a resolver over a hierarchy, a documentation store and the
    /// redirect map built from it
    pub fn new(
        registry: &'a TypeRegistry,
        store: &'a DocStore,
        redirects: &'a RedirectMap,
    ) -> Self {
        Self {
            registry,
            store,
            redirects,
        }
    }

    /// The hierarchy registry this resolver reads
    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// The redirect map this resolver follows
    pub fn redirects(&self) -> &RedirectMap {
        self.redirects
    }

    /// Ancestor type ids of a type: implemented interfaces in declaration
    /// order, then the base type appended last.
    fn ancestor_type_ids(&self, type_id: &str) -> Vec<String> {
        let Some(descriptor) = self.registry.get(type_id) else {
            return Vec::new();
        };
        let mut ancestors = descriptor.interface_ids.clone();
        if let Some(base) = &descriptor.base_id {
            ancestors.push(base.clone());
        }
        ancestors
    }

    /// Choose the candidate ancestor member for an inheriting member.
    ///
    /// The candidate set holds every identically-named member declared on the
    /// type's interfaces, followed by the one on its base type. When
    /// `explicit_target` matches a candidate's member key it is returned
    /// immediately; otherwise the last candidate in enumeration order wins.
    pub fn candidate(&self, member: &MemberRef, explicit_target: Option<&str>) -> Option<MemberRef> {
        let candidates: Vec<MemberRef> = match member.kind {
            MemberKind::Type => self
                .ancestor_type_ids(&member.type_id)
                .iter()
                .map(|id| MemberRef::for_type(id))
                .collect(),
            _ => self
                .ancestor_type_ids(&member.type_id)
                .iter()
                .flat_map(|ancestor_id| {
                    self.registry
                        .get(ancestor_id)
                        .map(|d| {
                            d.members
                                .iter()
                                .filter(|m| m.kind == member.kind && m.name == member.name)
                                .map(|m| MemberRef::for_member(ancestor_id, &m.name, m.kind))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                })
                .collect(),
        };

        if let Some(target) = explicit_target {
            if let Some(found) = candidates.iter().find(|c| c.member_id() == target) {
                return Some(found.clone());
            }
        }

        candidates.last().cloned()
    }

    /// Resolve the concrete member whose documentation should be used,
    /// following redirect entries on intermediate candidates.
    ///
    /// `visited` guards against cyclic hierarchies: a revisited member stops
    /// the walk and the member reached so far is kept.
    pub fn target_recursive(
        &self,
        member: &MemberRef,
        explicit_target: Option<&str>,
        visited: &mut BTreeSet<String>,
    ) -> Option<MemberRef> {
        let target = self.candidate(member, explicit_target)?;
        let target_id = target.member_id();
        if !visited.insert(target_id.clone()) {
            warn!("Inheritance cycle detected at {}, stopping walk", target_id);
            return Some(target);
        }
        match self.redirects.get(&target_id) {
            Some(entry) => self.target_recursive(&target, entry.target.as_deref(), visited),
            None => Some(target),
        }
    }

    /// Resolve the documentation an inheriting member should receive.
    ///
    /// Returns `None` when the member carries no redirect entry, when no
    /// ancestor can be found, or when the resolved target has no documented
    /// summary — all recovered by the caller as "nothing to add".
    pub fn resolve_doc(&self, member: &MemberRef) -> Option<ResolvedDoc<'a>> {
        let member_id = member.member_id();
        let entry = self.redirects.get(&member_id)?;

        if entry.target.is_some() {
            // An explicit target bypasses hierarchy walking; follow any
            // further explicit redirects from it.
            let chain = self.redirects.resolve_chain(&member_id)?;
            let target_id = chain.target?;
            let doc = self.store.lookup(&target_id)?;
            return Some(ResolvedDoc {
                entry: doc,
                scope: chain.scope,
            });
        }

        let mut visited = BTreeSet::new();
        visited.insert(member_id);
        let target = self.target_recursive(member, None, &mut visited)?;
        let doc = self.store.lookup(&target.member_id())?;
        Some(ResolvedDoc {
            entry: doc,
            scope: entry.scope,
        })
    }

    /// Compose the description text a resolved entry contributes: the summary,
    /// optionally followed by the remarks in parentheses when remarks are
    /// enabled and within scope.
    pub fn compose_text(resolved: &ResolvedDoc, include_remarks: bool) -> Option<String> {
        if !resolved.scope.summary {
            return None;
        }
        let summary = resolved.entry.summary.as_deref()?.trim();
        if summary.is_empty() {
            return None;
        }
        let mut text = summary.to_string();
        if include_remarks && resolved.scope.remarks {
            if let Some(remarks) = resolved.entry.remarks_text() {
                text.push_str(&format!(" ({})", remarks.trim()));
            }
        }
        Some(text)
    }

    /// Set a description from inherited documentation unless one is already
    /// directly declared (first-wins). Returns whether anything changed.
    pub fn apply_description(
        &self,
        description: &mut Option<String>,
        member: &MemberRef,
        include_remarks: bool,
    ) -> bool {
        if description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
            return false;
        }
        let Some(resolved) = self.resolve_doc(member) else {
            return false;
        };
        match Self::compose_text(&resolved, include_remarks) {
            Some(text) => {
                *description = Some(text);
                true
            }
            None => false,
        }
    }

    /// Apply inherited documentation to a schema fragment: description
    /// (first-wins) and example.
    pub fn apply_to_schema(&self, schema: &mut Schema, member: &MemberRef, include_remarks: bool) {
        let Some(resolved) = self.resolve_doc(member) else {
            return;
        };

        let directly_documented = schema
            .description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());
        if !directly_documented {
            if let Some(text) = Self::compose_text(&resolved, include_remarks) {
                schema.description = Some(text);
            }
        }

        if schema.example.is_none() {
            if let Some(example) = resolved.entry.example.as_deref() {
                schema.example = parse_example(schema.schema_type.as_deref(), example);
            }
        }
    }
}

/// Parse example text for a schema: string-typed schemas take the literal
/// text, anything else is parsed as a structured value. Parse failure omits
/// the example; it never surfaces as an error.
fn parse_example(schema_type: Option<&str>, text: &str) -> Option<serde_json::Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if schema_type == Some("string") {
        return Some(serde_json::Value::String(text.to_string()));
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Dropping unparseable example {:?}: {}", text, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_store::{DocEntry, DocSource, InheritMarker};
    use crate::hierarchy::{MemberDescriptor, TypeDescriptor};

    fn summary_entry(summary: &str) -> DocEntry {
        DocEntry {
            summary: Some(summary.to_string()),
            ..Default::default()
        }
    }

    fn inherit_entry(target: Option<&str>) -> DocEntry {
        DocEntry {
            inherit: Some(InheritMarker {
                target: target.map(str::to_string),
                sections: None,
            }),
            ..Default::default()
        }
    }

    /// Type `App.Todo` extends `App.TodoBase` and implements `App.ITodo`,
    /// all three declaring a `Name` property.
    fn diamond_registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.insert(
            TypeDescriptor::new("App.ITodo")
                .with_member(MemberDescriptor::new("Name", MemberKind::Property)),
        );
        registry.insert(
            TypeDescriptor::new("App.TodoBase")
                .with_member(MemberDescriptor::new("Name", MemberKind::Property)),
        );
        registry.insert(
            TypeDescriptor::new("App.Todo")
                .with_base("App.TodoBase")
                .with_interface("App.ITodo")
                .with_member(MemberDescriptor::new("Name", MemberKind::Property)),
        );
        registry
    }

    fn store_with(entries: Vec<(&str, DocEntry)>) -> DocStore {
        let mut source = DocSource::new();
        for (id, entry) in entries {
            source.insert(id, entry);
        }
        let mut store = DocStore::new();
        store.push_source(source);
        store
    }

    #[test]
    fn test_candidate_prefers_base_without_explicit_target() {
        let registry = diamond_registry();
        let store = store_with(vec![]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);
        let candidate = resolver.candidate(&member, None).unwrap();
        assert_eq!(candidate.type_id, "App.TodoBase");
    }

    #[test]
    fn test_explicit_target_picks_interface() {
        let registry = diamond_registry();
        let store = store_with(vec![]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);
        let candidate = resolver
            .candidate(&member, Some("P:App.ITodo.Name"))
            .unwrap();
        assert_eq!(candidate.type_id, "App.ITodo");
    }

    #[test]
    fn test_unmatched_explicit_target_falls_back_to_last() {
        let registry = diamond_registry();
        let store = store_with(vec![]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);
        let candidate = resolver
            .candidate(&member, Some("P:App.Elsewhere.Name"))
            .unwrap();
        assert_eq!(candidate.type_id, "App.TodoBase");
    }

    #[test]
    fn test_resolve_doc_through_hierarchy() {
        let registry = diamond_registry();
        let store = store_with(vec![
            ("P:App.Todo.Name", inherit_entry(None)),
            ("P:App.TodoBase.Name", summary_entry("Name of the item")),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);
        let resolved = resolver.resolve_doc(&member).unwrap();
        assert_eq!(resolved.entry.summary.as_deref(), Some("Name of the item"));
    }

    #[test]
    fn test_resolve_doc_recurses_through_intermediate_redirect() {
        // Base inherits from the interface; the chain must land on the
        // interface's concrete documentation.
        let registry = diamond_registry();
        let store = store_with(vec![
            ("P:App.Todo.Name", inherit_entry(None)),
            ("P:App.TodoBase.Name", inherit_entry(Some("P:App.ITodo.Name"))),
            ("P:App.ITodo.Name", summary_entry("Interface text")),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);
        let resolved = resolver.resolve_doc(&member).unwrap();
        assert_eq!(resolved.entry.summary.as_deref(), Some("Interface text"));
    }

    #[test]
    fn test_resolve_doc_with_explicit_target_bypasses_hierarchy() {
        let registry = TypeRegistry::new(); // intentionally empty
        let store = store_with(vec![
            ("T:App.A", inherit_entry(Some("T:App.Doc"))),
            ("T:App.Doc", summary_entry("Pointed at directly")),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        let resolved = resolver.resolve_doc(&MemberRef::for_type("App.A")).unwrap();
        assert_eq!(
            resolved.entry.summary.as_deref(),
            Some("Pointed at directly")
        );
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        // Two types inheriting docs from each other through their bases.
        let mut registry = TypeRegistry::new();
        registry.insert(TypeDescriptor::new("App.A").with_base("App.B"));
        registry.insert(TypeDescriptor::new("App.B").with_base("App.A"));
        let store = store_with(vec![
            ("T:App.A", inherit_entry(None)),
            ("T:App.B", inherit_entry(None)),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);

        // Must return (partial result or nothing), never hang.
        let _ = resolver.resolve_doc(&MemberRef::for_type("App.A"));
    }

    #[test]
    fn test_apply_description_first_wins() {
        let registry = diamond_registry();
        let store = store_with(vec![
            ("P:App.Todo.Name", inherit_entry(None)),
            ("P:App.TodoBase.Name", summary_entry("Inherited")),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);
        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);

        let mut declared = Some("Already documented".to_string());
        assert!(!resolver.apply_description(&mut declared, &member, false));
        assert_eq!(declared.as_deref(), Some("Already documented"));

        let mut empty = None;
        assert!(resolver.apply_description(&mut empty, &member, false));
        assert_eq!(empty.as_deref(), Some("Inherited"));
    }

    #[test]
    fn test_remarks_appended_in_parentheses() {
        let registry = diamond_registry();
        let store = store_with(vec![
            ("P:App.Todo.Name", inherit_entry(None)),
            (
                "P:App.TodoBase.Name",
                DocEntry {
                    summary: Some("Item name".to_string()),
                    remarks: Some("Unique per list".to_string()),
                    ..Default::default()
                },
            ),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);
        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);

        let mut with_remarks = None;
        resolver.apply_description(&mut with_remarks, &member, true);
        assert_eq!(
            with_remarks.as_deref(),
            Some("Item name (Unique per list)")
        );

        let mut without_remarks = None;
        resolver.apply_description(&mut without_remarks, &member, false);
        assert_eq!(without_remarks.as_deref(), Some("Item name"));
    }

    #[test]
    fn test_example_applied_by_schema_type() {
        let registry = diamond_registry();
        let store = store_with(vec![
            ("P:App.Todo.Name", inherit_entry(None)),
            (
                "P:App.TodoBase.Name",
                DocEntry {
                    summary: Some("Name".to_string()),
                    example: Some("42".to_string()),
                    ..Default::default()
                },
            ),
        ]);
        let redirects = RedirectMap::build(&store);
        let resolver = InheritResolver::new(&registry, &store, &redirects);
        let member = MemberRef::for_member("App.Todo", "Name", MemberKind::Property);

        // String-typed schemas take the literal text.
        let mut string_schema = Schema {
            schema_type: Some("string".to_string()),
            ..Default::default()
        };
        resolver.apply_to_schema(&mut string_schema, &member, false);
        assert_eq!(string_schema.example, Some(serde_json::json!("42")));

        // Other types parse it as a structured value.
        let mut int_schema = Schema {
            schema_type: Some("integer".to_string()),
            ..Default::default()
        };
        resolver.apply_to_schema(&mut int_schema, &member, false);
        assert_eq!(int_schema.example, Some(serde_json::json!(42)));
    }

    #[test]
    fn test_unparseable_example_is_omitted() {
        assert_eq!(parse_example(Some("integer"), "not a number"), None);
        assert_eq!(parse_example(Some("integer"), ""), None);
        assert_eq!(
            parse_example(Some("string"), "anything at all"),
            Some(serde_json::json!("anything at all"))
        );
    }
}

//! Role-based document pruning.
//!
//! Removes operations whose declared role requirements are not satisfied by
//! the accepted role set, then sweeps component schemas that are no longer
//! reachable from any surviving operation, and finally drops tag catalog
//! entries no surviving operation references. When no operation anywhere
//! declares a restriction the pruner is a no-op and the document passes
//! through untouched.

use crate::document::{HttpMethod, OpenApiDocument, Operation, ALL_METHODS};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// Source of per-operation role requirements.
///
/// An operation's requirement is a list of role groups; the operation is
/// visible only when every declared group shares at least one role with the
/// accepted set. An empty list means the operation is unrestricted.
pub trait RoleProvider {
    /// Role groups required to see an operation
    fn required_roles(&self, path: &str, method: HttpMethod) -> Vec<Vec<String>>;

    /// True when any operation anywhere declares a restriction
    fn has_restrictions(&self) -> bool;
}

/// Static role requirement table keyed by path and method.
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    requirements: BTreeMap<(String, HttpMethod), Vec<Vec<String>>>,
}

impl RoleMap {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one role group required by an operation. Calling this more than
    /// once for the same operation records additional groups; each declared
    /// group must be satisfied independently for the operation to stay
    /// visible.
    pub fn require(&mut self, path: &str, method: HttpMethod, roles: Vec<String>) {
        self.requirements
            .entry((path.to_string(), method))
            .or_default()
            .push(roles);
    }
}

impl RoleProvider for RoleMap {
    fn required_roles(&self, path: &str, method: HttpMethod) -> Vec<Vec<String>> {
        self.requirements
            .get(&(path.to_string(), method))
            .cloned()
            .unwrap_or_default()
    }

    fn has_restrictions(&self) -> bool {
        self.requirements.values().any(|groups| !groups.is_empty())
    }
}

/// Prunes operations, component schemas and tags a caller's roles do not
/// grant access to.
pub struct RolePruner<'a> {
    provider: &'a dyn RoleProvider,
    accepted_roles: &'a BTreeSet<String>,
}

impl<'a> RolePruner<'a> {
    /// Create a pruner over a role requirement source and an accepted role set
    pub fn new(provider: &'a dyn RoleProvider, accepted_roles: &'a BTreeSet<String>) -> Self {
        Self {
            provider,
            accepted_roles,
        }
    }

    /// Prune the document in place.
    ///
    /// Runs three phases: operation elimination, component reachability sweep
    /// and tag catalog pruning. When no operation declares a restriction the
    /// document is left untouched, including components and tags nothing
    /// references.
    pub fn prune(&self, document: &mut OpenApiDocument) {
        if !self.provider.has_restrictions() {
            debug!("No role restrictions declared, skipping pruning");
            return;
        }

        let removed = self.remove_denied_operations(document);
        info!(
            "Removed {} operation(s) not visible to the accepted roles",
            removed
        );
        self.sweep_unreachable_components(document);
        self.prune_tags(document);
    }

    /// Every declared group must intersect the accepted set. No declared
    /// groups means unrestricted.
    fn satisfied(&self, groups: &[Vec<String>]) -> bool {
        groups
            .iter()
            .all(|group| group.iter().any(|role| self.accepted_roles.contains(role)))
    }

    fn remove_denied_operations(&self, document: &mut OpenApiDocument) -> usize {
        let mut removed = 0;
        for (path, item) in document.paths.iter_mut() {
            for method in ALL_METHODS {
                if item.operation(method).is_none() {
                    continue;
                }
                let groups = self.provider.required_roles(path, method);
                if !self.satisfied(&groups) {
                    debug!("Removing {} {}", method.as_str(), path);
                    item.remove_operation(method);
                    removed += 1;
                }
            }
        }
        document.paths.retain(|_, item| !item.is_empty());
        removed
    }

    /// Mark every component reachable from a surviving operation, then drop
    /// the rest. Reachability crosses component boundaries with a visited set,
    /// so reference cycles between schemas terminate.
    fn sweep_unreachable_components(&self, document: &mut OpenApiDocument) {
        let Some(components) = document.components.as_ref() else {
            return;
        };
        if components.schemas.is_empty() {
            return;
        }

        let mut pending: Vec<String> = Vec::new();
        for (_, _, operation) in document.operations() {
            collect_operation_edges(operation, &mut pending);
        }

        let mut reachable: BTreeSet<String> = BTreeSet::new();
        while let Some(name) = pending.pop() {
            if !reachable.insert(name.clone()) {
                continue;
            }
            if let Some(schema) = document.component(&name) {
                schema.component_edges(&mut pending);
            }
        }

        if let Some(components) = document.components.as_mut() {
            let before = components.schemas.len();
            components.schemas.retain(|name, _| reachable.contains(name));
            debug!(
                "Swept {} unreachable component schema(s)",
                before - components.schemas.len()
            );
        }
    }

    /// Drop tag catalog entries no surviving operation references
    fn prune_tags(&self, document: &mut OpenApiDocument) {
        if document.tags.is_empty() {
            return;
        }
        let referenced: BTreeSet<String> = document
            .operations()
            .flat_map(|(_, _, op)| op.tags.iter().cloned())
            .collect();
        document.tags.retain(|tag| referenced.contains(&tag.name));
    }
}

/// Collect component references from every schema directly attached to an
/// operation: parameters, request body media types and response media types.
fn collect_operation_edges(operation: &Operation, out: &mut Vec<String>) {
    if let Some(parameters) = &operation.parameters {
        for parameter in parameters {
            if let Some(schema) = &parameter.schema {
                schema.component_edges(out);
            }
            if let Some(content) = &parameter.content {
                for media_type in content.values() {
                    if let Some(schema) = &media_type.schema {
                        schema.component_edges(out);
                    }
                }
            }
        }
    }
    if let Some(body) = &operation.request_body {
        for media_type in body.content.values() {
            if let Some(schema) = &media_type.schema {
                schema.component_edges(out);
            }
        }
    }
    for response in operation.responses.values() {
        if let Some(content) = &response.content {
            for media_type in content.values() {
                if let Some(schema) = &media_type.schema {
                    schema.component_edges(out);
                }
            }
        }
    }
}

//! Top-level augmentation pipeline.
//!
//! Ties the pieces together: builds the redirect map, runs the
//! documentation-inheritance and enum display filters over every document
//! node, then prunes operations, components and tags the accepted roles do
//! not grant access to. The pipeline mutates the document in place and is
//! idempotent, so re-augmenting an already augmented document changes
//! nothing.

use crate::config::AugmentConfig;
use crate::doc_store::DocStore;
use crate::document::{HttpMethod, OpenApiDocument, Schema, ALL_METHODS};
use crate::enums::EnumRegistry;
use crate::error::Result;
use crate::filters::enum_display::{
    DisplayEnumsWithValuesDocumentFilter, XEnumNamesParameterFilter, XEnumNamesSchemaFilter,
};
use crate::filters::inherit_doc::{
    InheritDocOperationFilter, InheritDocParameterFilter, InheritDocRequestBodyFilter,
    InheritDocSchemaFilter,
};
use crate::filters::responses::{ChangeResponseByStatusCodeDocumentFilter, ResponseRewrite};
use crate::filters::tag_catalog::{
    AppendActionCountToTagSummaryDocumentFilter, TagOrderByNameDocumentFilter,
};
use crate::filters::{
    DocumentFilter, OperationFilter, OperationFilterContext, ParameterFilter,
    ParameterFilterContext, RequestBodyFilter, RequestBodyFilterContext, SchemaFilter,
    SchemaFilterContext,
};
use crate::hierarchy::{MemberRef, TypeRegistry};
use crate::inherit::InheritResolver;
use crate::pruner::{RoleMap, RolePruner};
use crate::redirects::RedirectMap;
use log::info;
use std::collections::BTreeMap;

/// Binding between document nodes and the program elements they were
/// generated from.
///
/// The generation engine that produced the document knows which type a
/// component came from and which handler method an operation came from; this
/// crate only consumes that mapping. Unbound nodes are simply not annotated.
#[derive(Debug, Clone, Default)]
pub struct DocumentBinding {
    schema_types: BTreeMap<String, String>,
    operation_handlers: BTreeMap<(String, HttpMethod), MemberRef>,
    parameter_members: BTreeMap<(String, HttpMethod, String), MemberRef>,
    request_body_members: BTreeMap<(String, HttpMethod), MemberRef>,
    tag_types: BTreeMap<String, String>,
}

impl DocumentBinding {
    /// Create an empty binding
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a component schema to the type it was generated from
    pub fn bind_schema(&mut self, component_name: &str, type_id: &str) {
        self.schema_types
            .insert(component_name.to_string(), type_id.to_string());
    }

    /// Bind an operation to its handler method
    pub fn bind_operation(&mut self, path: &str, method: HttpMethod, handler: MemberRef) {
        self.operation_handlers
            .insert((path.to_string(), method), handler);
    }

    /// Bind an operation parameter to the program member it was generated from
    pub fn bind_parameter(
        &mut self,
        path: &str,
        method: HttpMethod,
        parameter_name: &str,
        member: MemberRef,
    ) {
        self.parameter_members.insert(
            (path.to_string(), method, parameter_name.to_string()),
            member,
        );
    }

    /// Bind an operation's request body to the program member it was
    /// generated from
    pub fn bind_request_body(&mut self, path: &str, method: HttpMethod, member: MemberRef) {
        self.request_body_members
            .insert((path.to_string(), method), member);
    }

    /// Bind a document-level tag to the type it groups operations of
    pub fn bind_tag(&mut self, tag_name: &str, type_id: &str) {
        self.tag_types
            .insert(tag_name.to_string(), type_id.to_string());
    }

    /// Type bound to a component schema
    pub fn schema_type(&self, component_name: &str) -> Option<&str> {
        self.schema_types.get(component_name).map(String::as_str)
    }

    /// Handler method bound to an operation
    pub fn operation_handler(&self, path: &str, method: HttpMethod) -> Option<&MemberRef> {
        self.operation_handlers.get(&(path.to_string(), method))
    }

    /// Member bound to an operation parameter
    pub fn parameter_member(
        &self,
        path: &str,
        method: HttpMethod,
        parameter_name: &str,
    ) -> Option<&MemberRef> {
        self.parameter_members
            .get(&(path.to_string(), method, parameter_name.to_string()))
    }

    /// Member bound to an operation's request body
    pub fn request_body_member(&self, path: &str, method: HttpMethod) -> Option<&MemberRef> {
        self.request_body_members.get(&(path.to_string(), method))
    }

    /// Type bound to a document-level tag
    pub fn tag_type(&self, tag_name: &str) -> Option<&str> {
        self.tag_types.get(tag_name).map(String::as_str)
    }
}

/// Document augmenter applying inherited documentation, enum display
/// extensions and role-based pruning.
#[derive(Debug, Default)]
pub struct Augmenter {
    config: AugmentConfig,
    registry: TypeRegistry,
    enums: EnumRegistry,
    store: DocStore,
    roles: RoleMap,
    response_rewrites: Vec<ResponseRewrite>,
}

impl Augmenter {
    /// Create an augmenter from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is malformed; no document
    /// processing has happened at that point.
    pub fn new(config: AugmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: TypeRegistry::new(),
            enums: EnumRegistry::new(),
            store: DocStore::new(),
            roles: RoleMap::new(),
            response_rewrites: Vec::new(),
        })
    }

    /// Set the type hierarchy the inheritance resolver walks
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the registered enum metadata
    pub fn with_enums(mut self, enums: EnumRegistry) -> Self {
        self.enums = enums;
        self
    }

    /// Set the documentation store
    pub fn with_store(mut self, store: DocStore) -> Self {
        self.store = store;
        self
    }

    /// Set the role requirement table consumed by the pruner
    pub fn with_roles(mut self, roles: RoleMap) -> Self {
        self.roles = roles;
        self
    }

    /// Set the response rewrite rules applied by status code
    pub fn with_response_rewrites(mut self, rewrites: Vec<ResponseRewrite>) -> Self {
        self.response_rewrites = rewrites;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Augment a document in place.
    ///
    /// Runs the component schema filters, then the operation-level filters,
    /// then the document-level filters (enum display, response rewrites),
    /// then the role-based pruner, and finally the tag catalog filters over
    /// whatever survived pruning.
    pub fn augment(&self, document: &mut OpenApiDocument, binding: &DocumentBinding) {
        let redirects = RedirectMap::build(&self.store);
        let resolver = InheritResolver::new(&self.registry, &self.store, &redirects);

        let snapshot: BTreeMap<String, Schema> = document
            .components
            .as_ref()
            .map(|c| c.schemas.clone())
            .unwrap_or_default();

        info!(
            "Augmenting document with {} path(s) and {} component schema(s)",
            document.paths.len(),
            snapshot.len()
        );

        let inherit_schema = InheritDocSchemaFilter::new(&resolver, &self.config);
        let enum_schema = XEnumNamesSchemaFilter::new(&self.enums, &self.store, &self.config);
        if let Some(components) = document.components.as_mut() {
            for (name, schema) in components.schemas.iter_mut() {
                let context = SchemaFilterContext {
                    component_name: name,
                    type_id: binding.schema_type(name),
                };
                inherit_schema.apply(schema, &context);
                if self.config.apply_schema_filter {
                    enum_schema.apply(schema, &context);
                }
            }
        }

        let operation_filter = InheritDocOperationFilter::new(&resolver, &self.config);
        let parameter_inherit = InheritDocParameterFilter::new(&resolver, &self.config);
        let parameter_enum = XEnumNamesParameterFilter::new(&self.config);
        let body_filter = InheritDocRequestBodyFilter::new(&resolver, &self.config);
        for (path, item) in document.paths.iter_mut() {
            for method in ALL_METHODS {
                let Some(operation) = item.operation_mut(method) else {
                    continue;
                };
                operation_filter.apply(
                    operation,
                    &OperationFilterContext {
                        handler: binding.operation_handler(path, method),
                    },
                );
                if let Some(parameters) = operation.parameters.as_mut() {
                    for parameter in parameters.iter_mut() {
                        let member = binding.parameter_member(path, method, &parameter.name);
                        let context = ParameterFilterContext {
                            member,
                            schemas: &snapshot,
                        };
                        parameter_inherit.apply(parameter, &context);
                        if self.config.apply_parameter_filter {
                            parameter_enum.apply(parameter, &context);
                        }
                    }
                }
                if let Some(body) = operation.request_body.as_mut() {
                    body_filter.apply(
                        body,
                        &RequestBodyFilterContext {
                            member: binding.request_body_member(path, method),
                            schemas: &snapshot,
                        },
                    );
                }
            }
        }

        if self.config.include_remarks {
            self.annotate_tags(document, binding);
        }

        if self.config.apply_document_filter {
            DisplayEnumsWithValuesDocumentFilter::new(&self.config).apply(document);
        }

        if !self.response_rewrites.is_empty() {
            ChangeResponseByStatusCodeDocumentFilter::new(&self.response_rewrites).apply(document);
        }

        RolePruner::new(&self.roles, &self.config.accepted_roles).prune(document);

        // Tag counts reflect the pruned document.
        if self.config.append_action_count_to_tags {
            AppendActionCountToTagSummaryDocumentFilter::new(
                &self.config.action_count_message_template,
            )
            .apply(document);
        }
        if self.config.order_tags_by_name {
            TagOrderByNameDocumentFilter.apply(document);
        }
    }

    /// Append the remarks of a tag's bound type to the tag description.
    /// Appending is idempotent under repeated augmentation.
    fn annotate_tags(&self, document: &mut OpenApiDocument, binding: &DocumentBinding) {
        for tag in document.tags.iter_mut() {
            let Some(type_id) = binding.tag_type(&tag.name) else {
                continue;
            };
            let member_id = MemberRef::for_type(type_id).member_id();
            let Some(entry) = self.store.lookup(&member_id) else {
                continue;
            };
            let Some(remarks) = entry.remarks_text() else {
                continue;
            };
            match &mut tag.description {
                None => tag.description = Some(remarks.to_string()),
                Some(existing) => {
                    if !existing.contains(remarks) {
                        existing.push_str(&format!(" ({})", remarks));
                    }
                }
            }
        }
    }
}

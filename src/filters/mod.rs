//! Augmentation filters applied to document nodes.
//!
//! Every kind of document node has a filter trait with a single `apply`
//! method taking the node mutably plus a read-only context describing what
//! the node is bound to. Filters never fail: a filter that cannot contribute
//! anything leaves its node alone. Contexts carry a snapshot of the component
//! schemas taken before mutation began, so filters can read referenced
//! components while the live document is being rewritten.

pub mod enum_display;
pub mod inherit_doc;
pub mod responses;
pub mod tag_catalog;

use crate::document::{OpenApiDocument, Operation, Parameter, RequestBody, Schema};
use crate::hierarchy::MemberRef;
use std::collections::BTreeMap;

/// Context passed to component schema filters.
pub struct SchemaFilterContext<'a> {
    /// Component name of the schema being filtered
    pub component_name: &'a str,
    /// Program type bound to the component, when the binding knows one
    pub type_id: Option<&'a str>,
}

/// Context passed to parameter filters.
pub struct ParameterFilterContext<'a> {
    /// Program member the parameter was generated from, when known
    pub member: Option<&'a MemberRef>,
    /// Snapshot of component schemas for reference fallback
    pub schemas: &'a BTreeMap<String, Schema>,
}

/// Context passed to operation filters.
pub struct OperationFilterContext<'a> {
    /// Handler method the operation was generated from, when known
    pub handler: Option<&'a MemberRef>,
}

/// Context passed to request body filters.
pub struct RequestBodyFilterContext<'a> {
    /// Program member the body payload was generated from, when known
    pub member: Option<&'a MemberRef>,
    /// Snapshot of component schemas for reference fallback
    pub schemas: &'a BTreeMap<String, Schema>,
}

/// Filter mutating one component schema
pub trait SchemaFilter {
    /// Apply the filter to a component schema
    fn apply(&self, schema: &mut Schema, context: &SchemaFilterContext);
}

/// Filter mutating one operation parameter
pub trait ParameterFilter {
    /// Apply the filter to a parameter
    fn apply(&self, parameter: &mut Parameter, context: &ParameterFilterContext);
}

/// Filter mutating one operation
pub trait OperationFilter {
    /// Apply the filter to an operation
    fn apply(&self, operation: &mut Operation, context: &OperationFilterContext);
}

/// Filter mutating one request body
pub trait RequestBodyFilter {
    /// Apply the filter to a request body
    fn apply(&self, body: &mut RequestBody, context: &RequestBodyFilterContext);
}

/// Filter mutating the whole document after node-level filters ran
pub trait DocumentFilter {
    /// Apply the filter to the document
    fn apply(&self, document: &mut OpenApiDocument);
}

/// True when an optional text field carries non-blank text
pub(crate) fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

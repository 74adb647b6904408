//! Filters attaching inherited documentation to document nodes.
//!
//! All four filters share the same policy: directly declared text always wins
//! over inherited text, excluded types are skipped entirely, and a node the
//! resolver has nothing for is left untouched.

use super::{
    has_text, OperationFilter, OperationFilterContext, ParameterFilter, ParameterFilterContext,
    RequestBodyFilter, RequestBodyFilterContext, SchemaFilter, SchemaFilterContext,
};
use crate::config::AugmentConfig;
use crate::document::{Operation, Parameter, RequestBody, Schema};
use crate::hierarchy::MemberRef;
use crate::inherit::InheritResolver;
use log::debug;

/// Attaches inherited descriptions and examples to component schemas and
/// their properties.
pub struct InheritDocSchemaFilter<'a> {
    resolver: &'a InheritResolver<'a>,
    config: &'a AugmentConfig,
}

impl<'a> InheritDocSchemaFilter<'a> {
    /// Create the filter over a resolver and the active configuration
    pub fn new(resolver: &'a InheritResolver<'a>, config: &'a AugmentConfig) -> Self {
        Self { resolver, config }
    }
}

impl SchemaFilter for InheritDocSchemaFilter<'_> {
    fn apply(&self, schema: &mut Schema, context: &SchemaFilterContext) {
        let Some(type_id) = context.type_id else {
            return;
        };
        if self.config.excluded_types.contains(type_id) {
            debug!("Skipping excluded type {}", type_id);
            return;
        }

        let type_ref = MemberRef::for_type(type_id);
        self.resolver.apply_description(
            &mut schema.description,
            &type_ref,
            self.config.include_remarks,
        );

        let Some(properties) = schema.properties.as_mut() else {
            return;
        };
        for (property_name, property_schema) in properties.iter_mut() {
            let Some(member) = self.resolver.registry().find_member(type_id, property_name)
            else {
                continue;
            };
            if let Some(value_type) = self.resolver.registry().member_value_type(&member) {
                if self.config.excluded_types.contains(value_type) {
                    debug!(
                        "Skipping property {} of excluded value type {}",
                        property_name, value_type
                    );
                    continue;
                }
            }
            self.resolver
                .apply_to_schema(property_schema, &member, self.config.include_remarks);
        }
    }
}

/// Attaches inherited descriptions to operation parameters, falling back to
/// the referenced component's description when the member has nothing.
pub struct InheritDocParameterFilter<'a> {
    resolver: &'a InheritResolver<'a>,
    config: &'a AugmentConfig,
}

impl<'a> InheritDocParameterFilter<'a> {
    /// Create the filter over a resolver and the active configuration
    pub fn new(resolver: &'a InheritResolver<'a>, config: &'a AugmentConfig) -> Self {
        Self { resolver, config }
    }
}

impl ParameterFilter for InheritDocParameterFilter<'_> {
    fn apply(&self, parameter: &mut Parameter, context: &ParameterFilterContext) {
        if has_text(&parameter.description) {
            return;
        }

        if let Some(member) = context.member {
            if self.config.excluded_types.contains(&member.type_id) {
                return;
            }
            if self.resolver.apply_description(
                &mut parameter.description,
                member,
                self.config.include_remarks,
            ) {
                return;
            }
        }

        // Fall back to the description of the component the parameter's
        // schema references.
        let target = parameter
            .schema
            .as_ref()
            .and_then(|s| s.reference_target())
            .map(str::to_string);
        let Some(target) = target else {
            return;
        };
        if let Some(component) = context.schemas.get(&target) {
            if let Some(description) = component.description.as_deref() {
                if !description.trim().is_empty() {
                    parameter.description = Some(description.to_string());
                }
            }
        }
    }
}

/// Attaches an inherited summary and per-parameter text to operations.
pub struct InheritDocOperationFilter<'a> {
    resolver: &'a InheritResolver<'a>,
    config: &'a AugmentConfig,
}

impl<'a> InheritDocOperationFilter<'a> {
    /// Create the filter over a resolver and the active configuration
    pub fn new(resolver: &'a InheritResolver<'a>, config: &'a AugmentConfig) -> Self {
        Self { resolver, config }
    }
}

impl OperationFilter for InheritDocOperationFilter<'_> {
    fn apply(&self, operation: &mut Operation, context: &OperationFilterContext) {
        let Some(handler) = context.handler else {
            return;
        };
        if self.config.excluded_types.contains(&handler.type_id) {
            return;
        }
        let Some(resolved) = self.resolver.resolve_doc(handler) else {
            return;
        };

        if !has_text(&operation.summary) {
            if let Some(text) =
                InheritResolver::compose_text(&resolved, self.config.include_remarks)
            {
                operation.summary = Some(text);
            }
        }

        if !resolved.scope.param || resolved.entry.params.is_empty() {
            return;
        }
        let Some(parameters) = operation.parameters.as_mut() else {
            return;
        };
        for parameter in parameters.iter_mut() {
            if has_text(&parameter.description) {
                continue;
            }
            let text = resolved
                .entry
                .params
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&parameter.name))
                .map(|(_, text)| text.trim())
                .filter(|text| !text.is_empty());
            if let Some(text) = text {
                parameter.description = Some(text.to_string());
            }
        }
    }
}

/// Attaches inherited descriptions to request bodies, falling back to the
/// description of the component the body payload references.
pub struct InheritDocRequestBodyFilter<'a> {
    resolver: &'a InheritResolver<'a>,
    config: &'a AugmentConfig,
}

impl<'a> InheritDocRequestBodyFilter<'a> {
    /// Create the filter over a resolver and the active configuration
    pub fn new(resolver: &'a InheritResolver<'a>, config: &'a AugmentConfig) -> Self {
        Self { resolver, config }
    }
}

impl RequestBodyFilter for InheritDocRequestBodyFilter<'_> {
    fn apply(&self, body: &mut RequestBody, context: &RequestBodyFilterContext) {
        if has_text(&body.description) {
            return;
        }

        if let Some(member) = context.member {
            if self.config.excluded_types.contains(&member.type_id) {
                return;
            }
            if self.resolver.apply_description(
                &mut body.description,
                member,
                self.config.include_remarks,
            ) {
                return;
            }
        }

        let target = body
            .content
            .values()
            .find_map(|m| m.schema.as_ref())
            .and_then(|s| s.reference_target())
            .map(str::to_string);
        let Some(target) = target else {
            return;
        };
        if let Some(component) = context.schemas.get(&target) {
            if let Some(description) = component.description.as_deref() {
                if !description.trim().is_empty() {
                    body.description = Some(description.to_string());
                }
            }
        }
    }
}

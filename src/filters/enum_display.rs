//! Filters making enum values readable in the rendered document.
//!
//! The schema filter attaches the vendor extensions (symbolic names and,
//! optionally, per-value descriptions) to enum component schemas. The
//! parameter filter and the document filter then compose human-readable value
//! summaries from those extensions and append them to the descriptions of
//! every place an enum surfaces: the component itself, properties wrapping an
//! enum reference in a composition, operation parameters and request bodies.
//! Appending is idempotent, so re-running the filters over an already
//! augmented document changes nothing.

use super::{
    DocumentFilter, ParameterFilter, ParameterFilterContext, SchemaFilter, SchemaFilterContext,
};
use crate::config::AugmentConfig;
use crate::doc_store::DocStore;
use crate::document::{OpenApiDocument, Operation, Parameter, Schema, ALL_METHODS};
use crate::enums::{append_enum_summary, compose_enum_summary, EnumRegistry};
use std::collections::BTreeMap;

/// Attaches symbolic name and description extensions to enum component
/// schemas from registered enum metadata.
pub struct XEnumNamesSchemaFilter<'a> {
    enums: &'a EnumRegistry,
    store: &'a DocStore,
    config: &'a AugmentConfig,
}

impl<'a> XEnumNamesSchemaFilter<'a> {
    /// Create the filter over registered enum metadata and the documentation
    /// store used for external value descriptions
    pub fn new(enums: &'a EnumRegistry, store: &'a DocStore, config: &'a AugmentConfig) -> Self {
        Self {
            enums,
            store,
            config,
        }
    }
}

impl SchemaFilter for XEnumNamesSchemaFilter<'_> {
    fn apply(&self, schema: &mut Schema, context: &SchemaFilterContext) {
        let Some(type_id) = context.type_id else {
            return;
        };
        let Some(info) = self.enums.get(type_id) else {
            return;
        };
        if schema.enum_values.as_ref().map_or(true, |v| v.is_empty()) {
            return;
        }

        let names: Vec<String> = info
            .distinct_names()
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        schema.insert_string_array_extension(&self.config.x_enum_names_alias, names);

        if self.config.include_descriptions {
            let descriptions = info.value_descriptions(
                self.config.description_source,
                self.store,
                self.config.include_remarks,
            );
            if descriptions.iter().any(|d| !d.is_empty()) {
                schema.insert_string_array_extension(
                    &self.config.x_enum_descriptions_alias,
                    descriptions,
                );
            }
        }
    }
}

/// Appends enum value summaries to parameter descriptions, for both inline
/// enum schemas and references to enum components.
pub struct XEnumNamesParameterFilter<'a> {
    config: &'a AugmentConfig,
}

impl<'a> XEnumNamesParameterFilter<'a> {
    /// Create the filter over the active configuration
    pub fn new(config: &'a AugmentConfig) -> Self {
        Self { config }
    }

    fn compose(&self, schema: &Schema) -> Option<String> {
        compose_enum_summary(
            schema,
            &self.config.x_enum_names_alias,
            &self.config.x_enum_descriptions_alias,
            self.config.include_descriptions,
            &self.config.new_line,
        )
    }
}

impl ParameterFilter for XEnumNamesParameterFilter<'_> {
    fn apply(&self, parameter: &mut Parameter, context: &ParameterFilterContext) {
        let summary = parameter.schema.as_ref().and_then(|s| self.compose(s));
        if let Some(summary) = summary {
            append_enum_summary(&mut parameter.description, &summary);
            return;
        }

        let target = parameter
            .schema
            .as_ref()
            .and_then(|s| s.reference_target())
            .map(str::to_string);
        let Some(target) = target else {
            return;
        };
        let summary = context.schemas.get(&target).and_then(|s| self.compose(s));
        if let Some(summary) = summary {
            append_enum_summary(&mut parameter.description, &summary);
        }
    }
}

/// Appends enum value summaries across the whole document: component schema
/// descriptions, properties wrapping an enum reference, operation parameters
/// and request bodies.
pub struct DisplayEnumsWithValuesDocumentFilter<'a> {
    config: &'a AugmentConfig,
}

impl<'a> DisplayEnumsWithValuesDocumentFilter<'a> {
    /// Create the filter over the active configuration
    pub fn new(config: &'a AugmentConfig) -> Self {
        Self { config }
    }

    fn compose(&self, schema: &Schema) -> Option<String> {
        compose_enum_summary(
            schema,
            &self.config.x_enum_names_alias,
            &self.config.x_enum_descriptions_alias,
            self.config.include_descriptions,
            &self.config.new_line,
        )
    }

    /// Component name a property references through a single-entry
    /// composition wrapper. Properties carrying a bare reference cannot hold
    /// their own description, so only wrapped references are annotated.
    fn wrapped_reference(property: &Schema) -> Option<String> {
        let all_of = property.all_of.as_ref()?;
        if all_of.len() != 1 {
            return None;
        }
        all_of[0].reference_target().map(str::to_string)
    }

    fn annotate_operation(&self, operation: &mut Operation, snapshot: &BTreeMap<String, Schema>) {
        if let Some(parameters) = operation.parameters.as_mut() {
            for parameter in parameters.iter_mut() {
                let target = parameter
                    .schema
                    .as_ref()
                    .and_then(|s| s.reference_target())
                    .map(str::to_string);
                let summary = match target {
                    Some(target) => snapshot.get(&target).and_then(|s| self.compose(s)),
                    None => parameter.schema.as_ref().and_then(|s| self.compose(s)),
                };
                if let Some(summary) = summary {
                    append_enum_summary(&mut parameter.description, &summary);
                }
            }
        }

        let Some(body) = operation.request_body.as_mut() else {
            return;
        };
        for media_type in body.content.values() {
            let Some(schema) = &media_type.schema else {
                continue;
            };
            let summary = match schema.reference_target() {
                Some(target) => snapshot.get(target).and_then(|s| self.compose(s)),
                None => self.compose(schema),
            };
            if let Some(summary) = summary {
                append_enum_summary(&mut body.description, &summary);
            }
        }
    }
}

impl DocumentFilter for DisplayEnumsWithValuesDocumentFilter<'_> {
    fn apply(&self, document: &mut OpenApiDocument) {
        // Snapshot taken after the schema filter attached its extensions, so
        // composition sees the names the renderer will see.
        let snapshot: BTreeMap<String, Schema> = document
            .components
            .as_ref()
            .map(|c| c.schemas.clone())
            .unwrap_or_default();

        if let Some(components) = document.components.as_mut() {
            for schema in components.schemas.values_mut() {
                if let Some(summary) = self.compose(schema) {
                    append_enum_summary(&mut schema.description, &summary);
                }
                let Some(properties) = schema.properties.as_mut() else {
                    continue;
                };
                for property in properties.values_mut() {
                    let Some(target) = Self::wrapped_reference(property) else {
                        continue;
                    };
                    let summary = snapshot.get(&target).and_then(|s| self.compose(s));
                    if let Some(summary) = summary {
                        append_enum_summary(&mut property.description, &summary);
                    }
                }
            }
        }

        for item in document.paths.values_mut() {
            for method in ALL_METHODS {
                if let Some(operation) = item.operation_mut(method) {
                    self.annotate_operation(operation, &snapshot);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        Components, EnumValue, HttpMethod, Info, MediaType, PathItem, RequestBody, X_ENUM_NAMES,
    };
    use crate::enums::{EnumInfo, EnumVariant};

    fn status_schema() -> Schema {
        Schema {
            schema_type: Some("integer".to_string()),
            enum_values: Some(vec![EnumValue::Integer(0), EnumValue::Integer(1)]),
            ..Default::default()
        }
    }

    fn annotated_status_schema() -> Schema {
        let mut schema = status_schema();
        schema.insert_string_array_extension(
            X_ENUM_NAMES,
            vec!["None".to_string(), "Task".to_string()],
        );
        schema
    }

    #[test]
    fn test_schema_filter_attaches_names_extension() {
        let mut enums = EnumRegistry::new();
        enums.insert(EnumInfo::new(
            "App.Status",
            vec![EnumVariant::new(0, "None"), EnumVariant::new(1, "Task")],
        ));
        let store = DocStore::new();
        let config = AugmentConfig::default();
        let filter = XEnumNamesSchemaFilter::new(&enums, &store, &config);

        let mut schema = status_schema();
        filter.apply(
            &mut schema,
            &SchemaFilterContext {
                component_name: "Status",
                type_id: Some("App.Status"),
            },
        );

        assert_eq!(
            schema.string_array_extension(X_ENUM_NAMES),
            Some(&["None".to_string(), "Task".to_string()][..])
        );
    }

    #[test]
    fn test_schema_filter_attaches_descriptions_when_enabled() {
        let mut enums = EnumRegistry::new();
        enums.insert(EnumInfo::new(
            "App.Status",
            vec![
                EnumVariant::described(0, "None", "Default tag"),
                EnumVariant::new(1, "Task"),
            ],
        ));
        let store = DocStore::new();
        let config = AugmentConfig {
            include_descriptions: true,
            ..Default::default()
        };
        let filter = XEnumNamesSchemaFilter::new(&enums, &store, &config);

        let mut schema = status_schema();
        filter.apply(
            &mut schema,
            &SchemaFilterContext {
                component_name: "Status",
                type_id: Some("App.Status"),
            },
        );

        assert_eq!(
            schema.string_array_extension("x-enumDescriptions"),
            Some(&["Default tag".to_string(), String::new()][..])
        );
    }

    #[test]
    fn test_parameter_filter_annotates_referenced_enum() {
        let config = AugmentConfig::default();
        let filter = XEnumNamesParameterFilter::new(&config);

        let mut schemas = BTreeMap::new();
        schemas.insert("Status".to_string(), annotated_status_schema());
        let mut parameter = Parameter {
            name: "status".to_string(),
            location: "query".to_string(),
            required: false,
            schema: Some(Schema::component_ref("Status")),
            content: None,
            description: Some("Filter by status.".to_string()),
        };

        filter.apply(
            &mut parameter,
            &ParameterFilterContext {
                member: None,
                schemas: &schemas,
            },
        );
        assert_eq!(
            parameter.description.as_deref(),
            Some("Filter by status.\n0 = None\n1 = Task")
        );
    }

    fn document_with_status() -> OpenApiDocument {
        let mut properties = BTreeMap::new();
        properties.insert(
            "status".to_string(),
            Schema {
                description: Some("Current status.".to_string()),
                all_of: Some(vec![Schema::component_ref("Status")]),
                ..Default::default()
            },
        );
        let mut schemas = BTreeMap::new();
        schemas.insert("Status".to_string(), annotated_status_schema());
        schemas.insert(
            "Todo".to_string(),
            Schema {
                schema_type: Some("object".to_string()),
                properties: Some(properties),
                ..Default::default()
            },
        );

        let mut content = BTreeMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType::for_schema(Schema::component_ref("Status")),
        );
        let mut item = PathItem::default();
        item.set_operation(
            HttpMethod::Post,
            Operation {
                request_body: Some(RequestBody {
                    description: None,
                    required: true,
                    content,
                }),
                ..Default::default()
            },
        );
        let mut paths = BTreeMap::new();
        paths.insert("/todos/status".to_string(), item);

        OpenApiDocument {
            openapi: "3.0.1".to_string(),
            info: Info {
                title: "Test".to_string(),
                version: "1".to_string(),
                description: None,
            },
            tags: Vec::new(),
            paths,
            components: Some(Components { schemas }),
        }
    }

    #[test]
    fn test_document_filter_annotates_everywhere() {
        let config = AugmentConfig::default();
        let filter = DisplayEnumsWithValuesDocumentFilter::new(&config);

        let mut doc = document_with_status();
        filter.apply(&mut doc);

        let status = doc.component("Status").unwrap();
        assert_eq!(status.description.as_deref(), Some("\n0 = None\n1 = Task"));

        let todo = doc.component("Todo").unwrap();
        let property = &todo.properties.as_ref().unwrap()["status"];
        assert_eq!(
            property.description.as_deref(),
            Some("Current status.\n0 = None\n1 = Task")
        );

        let body = doc.paths["/todos/status"]
            .operation(HttpMethod::Post)
            .unwrap()
            .request_body
            .as_ref()
            .unwrap();
        assert_eq!(body.description.as_deref(), Some("\n0 = None\n1 = Task"));
    }

    #[test]
    fn test_document_filter_is_idempotent() {
        let config = AugmentConfig::default();
        let filter = DisplayEnumsWithValuesDocumentFilter::new(&config);

        let mut doc = document_with_status();
        filter.apply(&mut doc);
        let first = serde_json::to_value(&doc).unwrap();
        filter.apply(&mut doc);
        let second = serde_json::to_value(&doc).unwrap();
        assert_eq!(first, second);
    }
}

//! In-memory OpenAPI document model.
//!
//! This module defines the typed document graph that the augmentation passes
//! operate on: paths, operations, parameters, request bodies, responses, the
//! component schema registry and the document-level tag catalog. The model is
//! produced by an external generation engine and serialized by an external
//! writer; this crate only mutates it in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default key under which symbolic enum names are stored in schema extensions.
pub const X_ENUM_NAMES: &str = "x-enumNames";

/// Default key under which per-value enum descriptions are stored in schema extensions.
pub const X_ENUM_DESCRIPTIONS: &str = "x-enumDescriptions";

/// Prefix of component schema references inside a document.
pub const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Complete OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// Document-level tag catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// API paths
    pub paths: BTreeMap<String, PathItem>,
    /// Components (schemas, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Document-level tag catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Tag description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// HTTP methods carried by path items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

/// All methods a path item can carry, in declaration order.
pub const ALL_METHODS: [HttpMethod; 7] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
    HttpMethod::Patch,
    HttpMethod::Options,
    HttpMethod::Head,
];

impl HttpMethod {
    /// Get the HTTP method as an uppercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    fn slot(&self, method: HttpMethod) -> &Option<Operation> {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Post => &self.post,
            HttpMethod::Put => &self.put,
            HttpMethod::Delete => &self.delete,
            HttpMethod::Patch => &self.patch,
            HttpMethod::Options => &self.options,
            HttpMethod::Head => &self.head,
        }
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        }
    }

    /// Get the operation declared for a method, if any
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.slot(method).as_ref()
    }

    /// Get the operation declared for a method mutably, if any
    pub fn operation_mut(&mut self, method: HttpMethod) -> Option<&mut Operation> {
        self.slot_mut(method).as_mut()
    }

    /// Set the operation for a method
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot_mut(method) = Some(operation);
    }

    /// Remove and return the operation declared for a method
    pub fn remove_operation(&mut self, method: HttpMethod) -> Option<Operation> {
        self.slot_mut(method).take()
    }

    /// Iterate over declared operations in method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        ALL_METHODS
            .iter()
            .filter_map(move |m| self.operation(*m).map(|op| (*m, op)))
    }

    /// True when the path item declares no operations
    pub fn is_empty(&self) -> bool {
        ALL_METHODS.iter().all(|m| self.slot(*m).is_none())
    }
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Tag references declared on the operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parameters (path, query, header)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, header)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Parameter content types and their schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    /// Request body description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the request body is required
    pub required: bool,
    /// Content types and their schemas
    pub content: BTreeMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Example value for this media type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl MediaType {
    /// Create a media type carrying only a schema
    pub fn for_schema(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            example: None,
        }
    }
}

/// OpenAPI Response object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,
}

/// A single enum value carried in a schema `enum` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    /// Integer-backed enum value
    Integer(i64),
    /// Free-form string enum value
    String(String),
}

impl std::fmt::Display for EnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EnumValue::Integer(v) => write!(f, "{}", v),
            EnumValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Typed value held under a vendor-extension key on a schema.
///
/// Replaces the loosely typed extension bag of wire-format libraries with the
/// two shapes this crate actually stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionValue {
    /// Array of strings (enum names, enum descriptions)
    StringArray(Vec<String>),
    /// Single string value
    String(String),
}

/// OpenAPI Schema definition.
///
/// Used both for named components and for inline schemas nested in properties,
/// array items, composition wrappers, parameters and media types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Schema description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    /// Required field names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Composition wrapper ("all-of" list)
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<EnumValue>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Format for primitive types (e.g., "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Example value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    /// Vendor extensions ("x-..." keys)
    #[serde(flatten)]
    pub extensions: BTreeMap<String, ExtensionValue>,
}

impl Schema {
    /// Create a schema that references a named component
    pub fn component_ref(name: &str) -> Self {
        Schema {
            reference: Some(format!("{}{}", COMPONENT_REF_PREFIX, name)),
            ..Default::default()
        }
    }

    /// Component name this schema directly references, if it is a reference
    pub fn reference_target(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(COMPONENT_REF_PREFIX))
    }

    /// Look up a string-array vendor extension by key
    pub fn string_array_extension(&self, key: &str) -> Option<&[String]> {
        match self.extensions.get(key) {
            Some(ExtensionValue::StringArray(values)) => Some(values),
            _ => None,
        }
    }

    /// Insert a string-array vendor extension unless the key is already present
    pub fn insert_string_array_extension(&mut self, key: &str, values: Vec<String>) {
        if !self.extensions.contains_key(key) && !values.is_empty() {
            self.extensions
                .insert(key.to_string(), ExtensionValue::StringArray(values));
        }
    }

    /// Collect the names of all components referenced from this schema value,
    /// including references nested inside properties, array items and
    /// composition wrappers. Only component boundaries are crossed by the
    /// caller; within one schema value the structure is a finite tree.
    pub fn component_edges(&self, out: &mut Vec<String>) {
        if let Some(name) = self.reference_target() {
            out.push(name.to_string());
        }
        if let Some(items) = &self.items {
            items.component_edges(out);
        }
        if let Some(all_of) = &self.all_of {
            for member in all_of {
                member.component_edges(out);
            }
        }
        if let Some(properties) = &self.properties {
            for property in properties.values() {
                property.component_edges(out);
            }
        }
    }
}

impl OpenApiDocument {
    /// Get a named component schema, if the document has one
    pub fn component(&self, name: &str) -> Option<&Schema> {
        self.components.as_ref()?.schemas.get(name)
    }

    /// Iterate over declared operations across all paths
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_target() {
        let schema = Schema::component_ref("User");
        assert_eq!(schema.reference_target(), Some("User"));

        let plain = Schema::default();
        assert_eq!(plain.reference_target(), None);
    }

    #[test]
    fn test_path_item_operations_in_method_order() {
        let mut item = PathItem::default();
        item.set_operation(HttpMethod::Post, Operation::default());
        item.set_operation(HttpMethod::Get, Operation::default());

        let methods: Vec<HttpMethod> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn test_path_item_remove_and_is_empty() {
        let mut item = PathItem::default();
        item.set_operation(HttpMethod::Delete, Operation::default());
        assert!(!item.is_empty());

        assert!(item.remove_operation(HttpMethod::Delete).is_some());
        assert!(item.is_empty());
    }

    #[test]
    fn test_component_edges_nested() {
        let mut properties = BTreeMap::new();
        properties.insert(
            "owner".to_string(),
            Schema {
                all_of: Some(vec![Schema::component_ref("User")]),
                ..Default::default()
            },
        );
        properties.insert(
            "tags".to_string(),
            Schema {
                schema_type: Some("array".to_string()),
                items: Some(Box::new(Schema::component_ref("Tag"))),
                ..Default::default()
            },
        );
        let schema = Schema {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            ..Default::default()
        };

        let mut edges = Vec::new();
        schema.component_edges(&mut edges);
        edges.sort();
        assert_eq!(edges, vec!["Tag".to_string(), "User".to_string()]);
    }

    #[test]
    fn test_extension_insert_is_first_wins() {
        let mut schema = Schema::default();
        schema.insert_string_array_extension(X_ENUM_NAMES, vec!["A".to_string()]);
        schema.insert_string_array_extension(X_ENUM_NAMES, vec!["B".to_string()]);

        assert_eq!(
            schema.string_array_extension(X_ENUM_NAMES),
            Some(&["A".to_string()][..])
        );
    }

    #[test]
    fn test_schema_serialization_shape() {
        let schema = Schema {
            schema_type: Some("integer".to_string()),
            enum_values: Some(vec![EnumValue::Integer(0), EnumValue::Integer(1)]),
            ..Default::default()
        };
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "integer");
        assert_eq!(json["enum"][1], 1);
    }
}

//! OpenAPI Augment - Post-generation enrichment of OpenAPI documents.
//!
//! This library takes an OpenAPI document produced by a generation engine and
//! augments it in place: inherited documentation is resolved through the type
//! hierarchy and attached where nothing was declared directly, enum schemas
//! get symbolic names and readable value summaries, and operations the
//! caller's roles do not grant access to are pruned together with the
//! component schemas and tags only they referenced.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`document`] - The in-memory OpenAPI document model
//! 2. [`hierarchy`] - Static type and member hierarchy with canonical member keys
//! 3. [`doc_store`] - Ordered documentation sources with first-match-wins lookup
//! 4. [`redirects`] - Redirect map built from inheritance markers
//! 5. [`inherit`] - The documentation-inheritance resolver
//! 6. [`enums`] - Enum metadata and value-summary composition
//! 7. [`filters`] - Node-level filters applying the above to document nodes
//! 8. [`pruner`] - Role-based operation, component and tag pruning
//! 9. [`augmenter`] - The top-level pipeline tying everything together
//!
//! # Example Usage
//!
//! ```
//! use openapi_augment::{
//!     augmenter::{Augmenter, DocumentBinding},
//!     config::AugmentConfig,
//!     doc_store::DocStore,
//!     document::{Components, Info, OpenApiDocument},
//!     hierarchy::TypeRegistry,
//! };
//! use std::collections::BTreeMap;
//!
//! let augmenter = Augmenter::new(AugmentConfig::default())
//!     .unwrap()
//!     .with_registry(TypeRegistry::new())
//!     .with_store(DocStore::new());
//!
//! let mut document = OpenApiDocument {
//!     openapi: "3.0.1".to_string(),
//!     info: Info {
//!         title: "My API".to_string(),
//!         version: "1.0".to_string(),
//!         description: None,
//!     },
//!     tags: Vec::new(),
//!     paths: BTreeMap::new(),
//!     components: Some(Components::default()),
//! };
//!
//! let binding = DocumentBinding::new();
//! augmenter.augment(&mut document, &binding);
//! ```

pub mod augmenter;
pub mod config;
pub mod doc_store;
pub mod document;
pub mod enums;
pub mod error;
pub mod filters;
pub mod hierarchy;
pub mod inherit;
pub mod pruner;
pub mod redirects;

pub use augmenter::{Augmenter, DocumentBinding};
pub use config::AugmentConfig;
pub use error::{Error, Result};

//! Schema-driven field and container resolution for Reify.
//!
//! Given a data schema, an optional presentation schema, and the current
//! form data, this crate decides — per schema node — which field renderer
//! to mount, which container to wrap object/array nodes in, and what props
//! (label, description, options, path, required) to thread through. The
//! decision is a pure function of its inputs: nothing persists between
//! render passes, and registry lookups go through the
//! [`Resolver`](reify_registry::resolver::Resolver) like any other
//! component resolution.
//!
//! # Example
//!
//! ```
//! use reify_forms::field::{FieldKind, resolve_form};
//! use reify_forms::presentation::PresentationNode;
//! use reify_forms::schema::SchemaNode;
//! use reify_registry::access::Principal;
//! use reify_registry::resolver::Resolver;
//! use reify_registry::store::ComponentRegistry;
//! use serde_json::{Value, json};
//!
//! let schema: SchemaNode = serde_json::from_value(json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "integer" }
//!     }
//! }))
//! .unwrap();
//!
//! let registry = ComponentRegistry::new();
//! let principal = Principal::anonymous();
//! let resolver = Resolver::new(&registry, &principal);
//!
//! let form = resolve_form(&resolver, &schema, PresentationNode::empty(), &Value::Null);
//! assert_eq!(form.children[0].kind, FieldKind::StringField);
//! assert!(form.children[0].required);
//! assert_eq!(form.children[1].kind, FieldKind::NumberField);
//! ```

pub mod container;
pub mod error;
pub mod field;
pub mod presentation;
pub mod schema;
pub mod template;

pub use container::{ContainerKind, ResolvedContainer, resolve_container};
pub use error::{FormError, TemplateError};
pub use field::{FieldKind, FieldResolver, FieldSet, ResolvedField, resolve_form};
pub use presentation::PresentationNode;
pub use schema::{PropertyPath, SchemaKind, SchemaNode};
pub use template::{has_template, render_template};

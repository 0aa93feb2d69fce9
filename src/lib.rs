//! # xmlentity
//!
//! An in-memory XML document model: a tree of named, attributed entities that can be built
//! programmatically, changed in bulk through visitors, queried by child-name paths,
//! printed as an outline, and written out as indented XML.
//!
//! ```rust
//! use xmlentity::Document;
//!
//! let mut document = Document::build("plano", |plano| {
//!     plano.child("fuc", |fuc| {
//!         fuc.attribute("codigo", "M4310")
//!             .child("avaliacao", |a| {
//!                 a.child("componente", |c| {
//!                     c.attribute("nome", "Quizzes").attribute("peso", "20%");
//!                 })
//!                 .child("componente", |c| {
//!                     c.attribute("nome", "Projeto").attribute("peso", "80%");
//!                 });
//!             });
//!     });
//! })
//! .unwrap();
//!
//! // Every bulk operation selects entities by their full opening tag text
//! document.rename_entities(|name| name.starts_with("componente"), "component").unwrap();
//! document.edit_attributes(|name| name.contains(r#"nome="Projeto""#), "peso", "75%").unwrap();
//!
//! assert_eq!(
//!     document.query("fuc/avaliacao/component"),
//!     [
//!         r#"<component nome="Quizzes" peso="20%"/>"#,
//!         r#"<component nome="Projeto" peso="75%"/>"#,
//!     ]
//! );
//! assert_eq!(
//!     document.to_tree(),
//!     "plano\n└── fuc\n    └── avaliacao\n        ├── component\n        └── component"
//! );
//! ```
//!
//! Attribute values and text are escaped when they are stored (`&`, `<`, `>`, `"` and `'`),
//! so the text produced by [`Document::to_xml`] is always well-formed.
#![warn(missing_docs)]

mod arena;
pub use arena::{EntityArena, EntityId};

mod builder;
pub use builder::EntityBuilder;

mod document;
pub use document::{Declaration, Document, SUPPORTED_ENCODINGS, SUPPORTED_VERSIONS};

pub mod error;
pub use error::{XmlError, XmlErrorKind, XmlResult};

mod escape;
pub use escape::{escape, unescape};

pub mod node;
pub use node::{Entity, is_valid_name, validate_name};

pub mod operator;
pub use operator::{
    AttributeOperation, AttributeOperator, EntityCollector, EntityOperation, EntityOperator,
};

mod query;
pub use query::{query_ids, query_path};

mod reflect;
pub use reflect::{Field, ToEntity};

pub mod to_tree;
pub use to_tree::TreePrinter;

pub mod to_xml;
pub use to_xml::XmlTextCollector;

mod tree;
pub use tree::EntityTree;

pub mod visitor;
pub use visitor::{EntityRef, Visitor, VisitorMut};

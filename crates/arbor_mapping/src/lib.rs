//! Mapping between typed values and [`Tree`]s.
//!
//! Values take part in mapping through runtime [`Type`] descriptors. The
//! two mappers, [`ObjectToTreeMapper`] and [`TreeToObjectMapper`], walk a
//! value (or a tree) recursively and pick a handler per [`ClassId`] from a
//! [`DispatchTable`]. Failures never panic: they are collected in an
//! [`ErrorStack`] together with the index, key or field path that led to
//! them.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use arbor_mapping::types::{FieldInfo, NonGenericTypeCell, Type, Typed};
//! use arbor_mapping::{
//!     ObjectToTreeConfig, ObjectToTreeMapper, TreeToObjectConfig, TreeToObjectMapper,
//! };
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Book {
//!     title: Option<Arc<str>>,
//!     pages: Option<u16>,
//! }
//!
//! impl Typed for Book {
//!     fn type_info() -> &'static Type {
//!         static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
//!         CELL.get_or_init(|| {
//!             Type::object::<Self>("Book", [
//!                 FieldInfo::new("title", |b: &Self| &b.title, |b| &mut b.title).required(),
//!                 FieldInfo::new("pages", |b: &Self| &b.pages, |b| &mut b.pages),
//!             ])
//!         })
//!     }
//! }
//!
//! let book = Book { title: Some("Hello World!".into()), pages: Some(96) };
//!
//! let tree = ObjectToTreeMapper::new()
//!     .map_to_tree(&book, &ObjectToTreeConfig::default())
//!     .unwrap();
//! assert_eq!(tree["title"].as_str(), Some("Hello World!"));
//! assert_eq!(tree["pages"].get_value::<u16>(), Some(96));
//!
//! let back: Book = TreeToObjectMapper::new()
//!     .map_from_tree(&tree, &TreeToObjectConfig::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(back, book);
//! ```
//!
//! [`Tree`]: arbor_tree::Tree
//! [`Type`]: types::Type

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod class;
mod config;
mod dispatch;
mod error;
mod value;

pub mod object_to_tree;
pub mod tree_to_object;
pub mod types;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Exports

pub use class::ClassId;
pub use config::{ObjectToTreeConfig, TreeToObjectConfig};
pub use dispatch::DispatchTable;
pub use error::{ErrorFrame, ErrorStack, Locator, MappingError};
pub use object_to_tree::ObjectToTreeMapper;
pub use tree_to_object::TreeToObjectMapper;
pub use value::{AnyValue, BoxedAny, Value, ValueRef};

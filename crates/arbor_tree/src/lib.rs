//! The intermediate tree value.
//!
//! [`Tree`] is a JSON-like tagged union that sits between typed object
//! graphs and concrete wire formats. The mappers in `arbor_mapping` fill
//! and read it; any `serde` data format can encode or decode it through
//! the [`Serialize`]/[`Deserialize`] impls in this crate.
//!
//! # Examples
//!
//! ```
//! use arbor_tree::Tree;
//!
//! let mut article = Tree::default();
//!
//! article["name"] = "Hello World!".into();
//! article["pages"] = 96.into();
//!
//! article["references"].set_vector_with_len(2);
//! article["references"][0]["author"] = "Alexander".into();
//! article["references"][1]["author"] = "Leonid".into();
//!
//! assert_eq!(article["pages"].get_value::<i32>(), Some(96));
//! assert_eq!(article["references"][0]["author"].as_str(), Some("Alexander"));
//! ```
//!
//! [`Serialize`]: serde_core::Serialize
//! [`Deserialize`]: serde_core::Deserialize
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod map;
mod scalar;
mod serde;
mod tree;

// -----------------------------------------------------------------------------
// Exports

pub use error::TreeConversionError;
pub use map::TreeMap;
pub use scalar::{Number, TreeScalar};
pub use tree::{Entries, Pair, Tree, TreeType};

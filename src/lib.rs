//! Reflection-driven mapping between typed object graphs and a JSON-like [`Tree`].
//!
//! - [`tree`]: the intermediate tree value.
//! - [`mapping`]: type descriptors and the two mappers.
//! - [`utils`]: hashing helpers shared by the other crates.
//!
//! [`Tree`]: tree::Tree

pub use arbor_mapping as mapping;
pub use arbor_tree as tree;
pub use arbor_utils as utils;

//! Small shared utilities for the `arbor` crates.
//!
//! Currently only [`hash`]: fixed-seed hashing and `hashbrown` containers
//! used by tree maps, interpretation sets and type caches.
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;

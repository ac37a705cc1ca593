//! Combat components

pub mod melee;

pub use melee::*;

//! Combat systems

pub mod damage;
pub mod melee;

#[cfg(test)]
mod melee_tests;

pub use damage::*;
pub use melee::*;

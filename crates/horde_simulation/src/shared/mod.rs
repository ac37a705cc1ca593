//! Shared helpers: геометрия/углы, используемые в нескольких доменах
//! (perception, orientation smoothing, attack distance).

pub mod angles;

pub use angles::*;

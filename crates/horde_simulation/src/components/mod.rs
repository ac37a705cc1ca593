//! ECS Components, общие для нескольких доменов
//!
//! - actor: Health (приём урона, смерть)
//! - presentation: AnimatorFeed, SoundCues, SkinTint

pub mod actor;
pub mod presentation;

pub use actor::*;
pub use presentation::*;

//! AI systems

pub mod animation;
pub mod fsm;
pub mod perception;
pub mod reactions;
pub mod timeline;


pub use animation::*;
pub use fsm::*;
pub use perception::*;
pub use reactions::*;
pub use timeline::*;

//! AI Events: обмен с animation collaborator'ом
//!
//! ECS → анимация: `AnimationTrigger` (начать замах, умереть).
//! Анимация → ECS: `TimelineCue` (окно удара открылось / закрылось).

use bevy::prelude::*;

/// Триггеры для animation state machine хоста
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTrigger {
    /// Tracking → AttackBegin: проиграть замах
    BeginAttack { entity: Entity },
    /// Смерть: death анимация с root motion
    Die { entity: Entity },
}

/// Timeline события атаки (animation events хоста)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineCue {
    /// AttackBegin → Attacking, начинается новый attack cycle
    EnableAttack { entity: Entity },
    /// Attacking → Tracking | Patrol, навигация возобновляется
    DisableAttack { entity: Entity },
}

impl TimelineCue {
    pub fn entity(&self) -> Entity {
        match self {
            TimelineCue::EnableAttack { entity } | TimelineCue::DisableAttack { entity } => *entity,
        }
    }
}

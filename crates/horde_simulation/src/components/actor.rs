//! Health entity: здоровье, смерть, приём урона

use bevy::prelude::*;

/// Здоровье живой сущности (враг, игрок, любой damageable)
///
/// Инвариант: 0 ≤ current ≤ max, `dead` выставляется один раз через `die()`
/// и больше не сбрасывается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub dead: bool,
    /// Урон не принимается, пока true
    pub invulnerable: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: false,
            invulnerable: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Приём урона. `false`: урон отклонён (мёртв или неуязвим).
    pub fn accept_damage(&mut self, amount: f32) -> bool {
        if self.dead || self.invulnerable {
            return false;
        }
        self.current = (self.current - amount.max(0.0)).max(0.0);
        true
    }

    /// Здоровье исчерпано, но `die()` ещё не вызван
    pub fn should_die(&self) -> bool {
        !self.dead && self.current <= 0.0
    }

    /// Переход в мёртвое состояние. `true` только при первом вызове.
    pub fn die(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.current = 0.0;
        true
    }
}

//! Damage events
//!
//! DamageMessage (запрос урона) → `apply_damage` → DamageDealt / EntityDied.

use bevy::prelude::*;

/// Запрос на нанесение урона health entity
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageMessage {
    pub damager: Entity,
    pub target: Entity,
    pub amount: f32,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
}

/// Событие: урон принят целью
///
/// Hit reaction для эффектов (кровь, вспышка) по impact point/normal.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub impact_point: Vec3,
    pub impact_normal: Vec3,
    pub target_died: bool,
}

/// Событие: entity умер (onDeath)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Звук для audio collaborator'а хоста
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub emitter: Entity,
    pub clip: String,
    pub position: Vec3,
}

/// Компонент-маркер: entity мертв
///
/// Деспавн не автоматический, трупы убирает spawner хоста.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

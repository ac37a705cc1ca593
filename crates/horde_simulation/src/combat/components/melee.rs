//! Melee attack components.

use bevy::prelude::*;

use crate::shared::horizontal_distance;
use crate::spatial::COLLISION_MASK_ENEMY_TARGETS;

/// Параметры удара
///
/// `attack_distance`: дистанция, с которой начинается замах, она же
/// stopping distance навигации: горизонтальное расстояние от тела до
/// attack pivot + attack radius + радиус навигационного агента.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackConfig {
    /// Точка удара относительно Transform (local space)
    pub pivot_offset: Vec3,
    /// Радиус sweep сферы
    pub attack_radius: f32,
    pub attack_distance: f32,
    pub damage: f32,
    pub target_mask: u32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, -0.6), 2.0, 30.0, 0.5)
    }
}

impl AttackConfig {
    pub fn new(pivot_offset: Vec3, attack_radius: f32, damage: f32, agent_radius: f32) -> Self {
        Self {
            pivot_offset,
            attack_radius,
            attack_distance: attack_distance_for(pivot_offset, attack_radius, agent_radius),
            damage,
            target_mask: COLLISION_MASK_ENEMY_TARGETS,
        }
    }

    /// Attack pivot в world space
    pub fn pivot(&self, transform: &Transform) -> Vec3 {
        transform.transform_point(self.pivot_offset)
    }
}

/// Дистанция атаки для pivot'а, заданного относительно тела
pub fn attack_distance_for(pivot_offset: Vec3, attack_radius: f32, agent_radius: f32) -> f32 {
    horizontal_distance(Vec3::ZERO, pivot_offset) + attack_radius + agent_radius
}

/// Кого уже ударили в текущем attack cycle.
///
/// Очищается только при входе в Attacking (EnableAttack).
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackCycleHits {
    pub entities: Vec<Entity>,
}

impl AttackCycleHits {
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn record(&mut self, entity: Entity) {
        if !self.contains(entity) {
            self.entities.push(entity);
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

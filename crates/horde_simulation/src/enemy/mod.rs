//! Enemy setup и spawn
//!
//! `EnemySetup`: параметры, которые хост задаёт один раз при создании
//! (health, damage, скорости, tint). `EnemyRig`: описание тела (глаза,
//! pivot удара, коллайдер, звуки). `spawn_enemy` собирает из них агента.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups, Group};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{EnemyState, EnemyTarget, MovementConfig, PerceptionConfig, PerceptionTask, TurnSmoothing};
use crate::combat::{AttackConfig, AttackCycleHits};
use crate::components::{AnimatorFeed, Health, SkinTint, SoundCues};
use crate::navigation::NavigationAgent;
use crate::spatial::{ProxyShape, SpatialProxy, COLLISION_LAYER_ENEMIES, COLLISION_MASK_SIGHTLINE};

/// Marker: враждебный melee агент
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Ошибки setup call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("health must be positive and finite, got {0}")]
    InvalidHealth(f32),
    #[error("damage must be non-negative and finite, got {0}")]
    InvalidDamage(f32),
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidSpeed { name: &'static str, value: f32 },
}

/// Setup call: задаётся один раз при создании агента
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySetup {
    pub health: f32,
    pub damage: f32,
    pub run_speed: f32,
    pub patrol_speed: f32,
    /// RGBA
    pub tint: [f32; 4],
}

impl Default for EnemySetup {
    fn default() -> Self {
        Self {
            health: 100.0,
            damage: 30.0,
            run_speed: 10.0,
            patrol_speed: 3.0,
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl EnemySetup {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !self.health.is_finite() || self.health <= 0.0 {
            return Err(SetupError::InvalidHealth(self.health));
        }
        if !self.damage.is_finite() || self.damage < 0.0 {
            return Err(SetupError::InvalidDamage(self.damage));
        }
        for (name, value) in [("run_speed", self.run_speed), ("patrol_speed", self.patrol_speed)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SetupError::InvalidSpeed { name, value });
            }
        }
        Ok(())
    }
}

/// Описание тела агента (prefab-level параметры)
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyRig {
    pub eye_offset: Vec3,
    pub eye_rotation: Quat,
    pub fov_degrees: f32,
    pub view_distance: f32,
    /// Точка удара (local space)
    pub pivot_offset: Vec3,
    pub attack_radius: f32,
    pub agent_radius: f32,
    /// Форма тела для proxy backend'а
    pub body_shape: ProxyShape,
    pub body_offset: Vec3,
    pub turn_smooth_time: f32,
    pub patrol_radius: f32,
    pub sounds: SoundCues,
    /// Добавить rapier Collider + CollisionGroups (для Rapier backend'а)
    pub physics_collider: bool,
}

impl Default for EnemyRig {
    fn default() -> Self {
        Self {
            eye_offset: Vec3::new(0.0, 1.6, 0.0),
            eye_rotation: Quat::IDENTITY,
            fov_degrees: 50.0,
            view_distance: 10.0,
            pivot_offset: Vec3::new(0.0, 1.0, -0.6),
            attack_radius: 2.0,
            agent_radius: 0.5,
            body_shape: ProxyShape::Cuboid {
                half_extents: Vec3::new(0.5, 0.9, 0.5),
            },
            body_offset: Vec3::new(0.0, 0.9, 0.0),
            turn_smooth_time: 0.1,
            patrol_radius: 20.0,
            sounds: SoundCues::default(),
            physics_collider: false,
        }
    }
}

/// Спавн врага в Patrol.
///
/// Навигация стартует на patrol speed, stopping distance = attack distance.
/// Perception task срабатывает на первом же тике.
pub fn spawn_enemy(
    commands: &mut Commands,
    setup: &EnemySetup,
    rig: &EnemyRig,
    transform: Transform,
) -> Result<Entity, SetupError> {
    setup.validate()?;

    let attack = AttackConfig::new(rig.pivot_offset, rig.attack_radius, setup.damage, rig.agent_radius);

    let movement = MovementConfig {
        run_speed: setup.run_speed,
        patrol_speed: setup.patrol_speed,
        patrol_radius: rig.patrol_radius,
        ..default()
    }
    .with_turn_smooth_time(rig.turn_smooth_time);

    let perception = PerceptionConfig {
        fov_degrees: rig.fov_degrees,
        view_distance: rig.view_distance,
        eye_offset: rig.eye_offset,
        eye_rotation: rig.eye_rotation,
        ..default()
    };

    let mut nav = NavigationAgent::new(rig.agent_radius);
    nav.speed = movement.patrol_speed;
    nav.stopping_distance = attack.attack_distance;

    let proxy = SpatialProxy {
        shape: rig.body_shape,
        offset: rig.body_offset,
        layers: COLLISION_LAYER_ENEMIES,
        enabled: true,
    };

    let mut entity_commands = commands.spawn((
        Enemy,
        transform,
        Health::new(setup.health),
        (
            EnemyState::Patrol,
            EnemyTarget::default(),
            PerceptionTask::default(),
            TurnSmoothing::default(),
            perception,
            movement,
        ),
        (attack, AttackCycleHits::default(), nav, proxy),
        (
            AnimatorFeed::default(),
            rig.sounds.clone(),
            SkinTint(setup.tint),
        ),
    ));

    if rig.physics_collider {
        let (half_height, radius) = match rig.body_shape {
            ProxyShape::Sphere { radius } => (0.0, radius),
            ProxyShape::Cuboid { half_extents } => {
                let radius = half_extents.x.max(half_extents.z);
                ((half_extents.y - radius).max(0.0), radius)
            }
        };
        entity_commands.insert((
            Collider::compound(vec![(rig.body_offset, Quat::IDENTITY, Collider::capsule_y(half_height, radius))]),
            CollisionGroups::new(
                Group::from_bits_truncate(COLLISION_LAYER_ENEMIES),
                Group::from_bits_truncate(COLLISION_MASK_SIGHTLINE),
            ),
        ));
    }

    let entity = entity_commands.id();
    crate::log(&format!(
        "👹 Enemy {:?} spawned at {:?} (hp {}, damage {}, attack distance {:.2})",
        entity, transform.translation, setup.health, setup.damage, attack.attack_distance
    ));

    Ok(entity)
}

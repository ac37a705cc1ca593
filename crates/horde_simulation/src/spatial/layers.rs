//! Collision Layers Constants
//!
//! Общие битовые маски для обоих spatial backend'ов:
//! - proxy: `SpatialProxy::layers`
//! - rapier: `CollisionGroups::memberships`
//!
//! ## Layers:
//! - Layer 1 (0b1): Reserved
//! - Layer 2 (0b10): Targets (игрок и всё, что враги преследуют)
//! - Layer 3 (0b100): Environment (стены, препятствия)
//! - Layer 4 (0b1000): Enemies

/// Layer 2: цели преследования (player)
pub const COLLISION_LAYER_TARGETS: u32 = 0b10;

/// Layer 3: статическое окружение (перекрывает линию видимости)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100;

/// Layer 4: враги
pub const COLLISION_LAYER_ENEMIES: u32 = 0b1000;

/// Mask: что враг ищет и бьёт
pub const COLLISION_MASK_ENEMY_TARGETS: u32 = COLLISION_LAYER_TARGETS;

/// Mask: sightline check (цель + всё, что может её загородить)
pub const COLLISION_MASK_SIGHTLINE: u32 = COLLISION_LAYER_TARGETS | COLLISION_LAYER_ENVIRONMENT;

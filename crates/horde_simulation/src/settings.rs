//! Глобальные настройки AI/combat (Resource).
//!
//! Per-agent параметры живут в компонентах (`PerceptionConfig`,
//! `MovementConfig`, `AttackConfig`), здесь только общее для всех.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::spatial::SpatialBackend;

#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct EnemyAiSettings {
    /// Период perception task (секунды)
    pub perception_period: f32,
    /// Максимум попаданий одного sweep'а
    pub sweep_capacity: usize,
    pub spatial_backend: SpatialBackend,
}

impl Default for EnemyAiSettings {
    fn default() -> Self {
        Self {
            perception_period: 0.05, // 20 Hz
            sweep_capacity: 10,
            spatial_backend: SpatialBackend::Proxy,
        }
    }
}

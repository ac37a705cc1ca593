//! Presentation-side компоненты (animation feed, audio cues, tint).
//!
//! Симуляция только пишет сюда данные, воспроизведение: на стороне хоста.

use bevy::prelude::*;

/// Параметры для animation collaborator
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimatorFeed {
    /// Модуль desired velocity навигации (обновляется в Update)
    pub speed: f32,
    /// После смерти движение тела отдаётся анимации (root motion)
    pub apply_root_motion: bool,
}

/// Звуки, которые сущность проигрывает при попадании/смерти.
///
/// `None`: звук не настроен, cue не отправляется.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SoundCues {
    pub hit: Option<String>,
    pub death: Option<String>,
}

/// Цвет скина (RGBA, linear), задаётся при setup
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SkinTint(pub [f32; 4]);

impl Default for SkinTint {
    fn default() -> Self {
        Self([1.0, 1.0, 1.0, 1.0])
    }
}

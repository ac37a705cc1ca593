//! Enemy AI: state machine + perception
//!
//! Patrol → Tracking → AttackBegin → Attacking → (Tracking | Patrol), Dead терминальное.
//! Perception: periodic task (20 Hz), переходы по дистанции: каждый тик.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::*;
pub use systems::{disable_attack, enable_attack, is_target_on_sight};

use crate::settings::EnemyAiSettings;
use crate::{DeterministicRng, SimulationSet};

/// AI Plugin
///
/// FixedUpdate, `SimulationSet::Decision`:
/// 1. apply_timeline_cues: EnableAttack / DisableAttack от анимации
/// 2. run_perception_task: поиск цели, destination, Patrol ↔ Tracking
/// 3. update_attack_transitions: Tracking → AttackBegin, потеря цели
/// 4. smooth_attack_orientation: доворот на цель в атаке
///
/// FixedUpdate, `SimulationSet::Reactions` (после damage dispatch):
/// 1. handle_enemy_death
/// 2. adopt_damager_as_target
///
/// Update: feed_animator_speed
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.init_resource::<EnemyAiSettings>()
            .add_event::<AnimationTrigger>()
            .add_event::<TimelineCue>();

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_timeline_cues,
                systems::run_perception_task,
                systems::update_attack_transitions,
                systems::smooth_attack_orientation,
            )
                .chain()
                .in_set(SimulationSet::Decision),
        )
        .add_systems(
            FixedUpdate,
            (systems::handle_enemy_death, systems::adopt_damager_as_target)
                .chain()
                .in_set(SimulationSet::Reactions),
        )
        .add_systems(Update, systems::feed_animator_speed);
    }
}

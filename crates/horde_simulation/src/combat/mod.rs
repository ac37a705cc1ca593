//! Combat module
//!
//! - components: AttackConfig, AttackCycleHits
//! - systems/melee: sphere sweep hit detection в Attacking
//! - systems/damage: damage dispatcher (Health::accept_damage), смерть
//! - damage: события DamageMessage / DamageDealt / EntityDied / SoundCue

use bevy::prelude::*;

pub mod components;
pub mod damage;
pub mod systems;

pub use components::*;
pub use damage::{DamageDealt, DamageMessage, Dead, EntityDied, SoundCue};
pub use systems::{deliver_damage, resolve_hit_point, select_sweep_victim, DamageOutcome};

use crate::settings::EnemyAiSettings;
use crate::SimulationSet;

/// Combat Plugin
///
/// FixedUpdate, `SimulationSet::Combat`:
/// 1. sweep_attack_hits: sweep → DamageMessage
/// 2. apply_damage: DamageMessage → Health → DamageDealt / EntityDied
/// 3. mark_dead: маркер Dead
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyAiSettings>()
            .add_event::<DamageMessage>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<SoundCue>();

        app.add_systems(
            FixedUpdate,
            (
                systems::sweep_attack_hits,
                systems::apply_damage,
                systems::mark_dead,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}

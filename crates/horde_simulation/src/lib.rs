//! HORDE Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: враждебные melee агенты.
//! - ai: state machine (Patrol / Tracking / AttackBegin / Attacking / Dead), perception
//! - combat: sphere sweep hit detection, damage dispatch
//! - navigation: headless navigation provider
//! - spatial: overlap / sweep / sightline поверх proxy или rapier
//!
//! Тик-модель: всё решающее в FixedUpdate (60 Hz), Update только
//! кормит анимацию.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod combat;
pub mod components;
pub mod enemy;
pub mod logger;
pub mod navigation;
pub mod settings;
pub mod shared;
pub mod spatial;

pub use ai::{AIPlugin, EnemyState, EnemyTarget, MovementConfig, PerceptionConfig, PerceptionTask};
pub use combat::{AttackConfig, AttackCycleHits, CombatPlugin, DamageDealt, DamageMessage, Dead, EntityDied};
pub use components::*;
pub use enemy::{spawn_enemy, Enemy, EnemyRig, EnemySetup, SetupError};
pub use logger::{init_logger, log};
pub use navigation::{NavigationAgent, NavigationPlugin, WalkableArea};
pub use settings::EnemyAiSettings;
pub use spatial::{SpatialBackend, SpatialProxy, SpatialQueries, SpatialQuery};

/// Порядок фаз внутри одного FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Timeline cues, perception, state transitions, orientation
    Decision,
    /// Движение агентов
    Navigation,
    /// Attack sweep + damage dispatch
    Combat,
    /// Смерть, aggro-on-hit
    Reactions,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // create_headless_app уже мог вставить seed, не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<EnemyAiSettings>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Decision,
                    SimulationSet::Navigation,
                    SimulationSet::Combat,
                    SimulationSet::Reactions,
                )
                    .chain(),
            )
            .add_plugins((AIPlugin, NavigationPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T>(world: &mut World) -> Vec<u8>
where
    T: Component + std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

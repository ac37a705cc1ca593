//! Headless симуляция HORDE
//!
//! Манекен-цель + несколько врагов на proxy backend'е, 1000 тиков.
//! Анимация заменена скриптом: замах → EnableAttack → DisableAttack.

use std::collections::BTreeMap;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use horde_simulation::ai::{AnimationTrigger, TimelineCue};
use horde_simulation::spatial::COLLISION_LAYER_TARGETS;
use horde_simulation::*;

/// Тики от BeginAttack до открытия окна удара
const WINDUP_TICKS: u32 = 12;
/// Тики от BeginAttack до закрытия окна удара
const RECOVERY_TICKS: u32 = 30;

/// Скриптовая замена animation timeline
#[derive(Component, Debug, Default)]
struct ScriptedSwing {
    ticks: u32,
}

fn start_scripted_swings(mut commands: Commands, mut triggers: EventReader<AnimationTrigger>) {
    for trigger in triggers.read() {
        if let AnimationTrigger::BeginAttack { entity } = trigger {
            if let Ok(mut entity_commands) = commands.get_entity(*entity) {
                entity_commands.insert(ScriptedSwing::default());
            }
        }
    }
}

fn advance_scripted_swings(
    mut commands: Commands,
    mut swings: Query<(Entity, &mut ScriptedSwing)>,
    mut cues: EventWriter<TimelineCue>,
) {
    for (entity, mut swing) in swings.iter_mut() {
        swing.ticks += 1;
        if swing.ticks == WINDUP_TICKS {
            cues.write(TimelineCue::EnableAttack { entity });
        } else if swing.ticks >= RECOVERY_TICKS {
            cues.write(TimelineCue::DisableAttack { entity });
            commands.entity(entity).remove::<ScriptedSwing>();
        }
    }
}

fn state_counts(world: &mut World) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    let mut query = world.query::<&EnemyState>();
    for state in query.iter(world) {
        *counts.entry(format!("{:?}", state)).or_insert(0) += 1;
    }
    counts
}

fn main() {
    let seed = 42;
    println!("Starting HORDE headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .insert_resource(WalkableArea {
            min: Vec2::splat(-25.0),
            max: Vec2::splat(25.0),
        })
        .add_plugins(SimulationPlugin)
        .add_systems(
            FixedUpdate,
            (start_scripted_swings, advance_scripted_swings)
                .chain()
                .after(SimulationSet::Reactions),
        );

    let dummy = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 0.0, -6.0),
            Health::new(400.0),
            SpatialProxy::cuboid(Vec3::new(0.6, 1.0, 0.6), COLLISION_LAYER_TARGETS).with_offset(Vec3::Y),
        ))
        .id();

    let setup = EnemySetup::default();
    let rig = EnemyRig::default();
    let spawns = [
        Transform::default(),
        Transform::from_xyz(4.0, 0.0, 0.0).looking_at(Vec3::new(0.0, 0.0, -6.0), Vec3::Y),
        Transform::from_xyz(-8.0, 0.0, 8.0),
        Transform::from_xyz(12.0, 0.0, -12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ];
    {
        let mut commands = app.world_mut().commands();
        for transform in spawns {
            if let Err(error) = spawn_enemy(&mut commands, &setup, &rig, transform) {
                eprintln!("Enemy setup rejected: {}", error);
            }
        }
    }
    app.world_mut().flush();

    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let counts = state_counts(app.world_mut());
            let dummy_health = app.world().get::<Health>(dummy).map(|health| health.current);
            println!("Tick {}: {:?}, dummy health {:?}", tick, counts, dummy_health);
        }
    }

    println!("Simulation complete!");
}

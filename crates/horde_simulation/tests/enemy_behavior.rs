//! Enemy behavior integration tests
//!
//! Полный SimulationPlugin, proxy backend, 1 app.update() = 1 fixed тик.
//!
//! Проверяем:
//! - Patrol → Tracking в пределах одного периода perception
//! - FOV и загораживание линии видимости
//! - Tracking → Patrol при смерти цели
//! - aggro-on-hit, терминальная смерть
//! - patrol агент держит точку после первого leg'а
//! - Rapier backend без RapierContext не паникует

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use horde_simulation::ai::TimelineCue;
use horde_simulation::spatial::{COLLISION_LAYER_ENVIRONMENT, COLLISION_LAYER_TARGETS};
use horde_simulation::*;

/// Helper: headless App с SimulationPlugin, первый (нулевой) кадр уже прогнан
fn behavior_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_plugins(SimulationPlugin);
    // Первый кадр без FixedUpdate (delta = 0)
    app.update();
    app
}

/// Helper: цель (игрок) с телом на слое Targets
fn spawn_dummy(app: &mut App, position: Vec3, health: f32) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Health::new(health),
            SpatialProxy::cuboid(Vec3::new(0.6, 1.0, 0.6), COLLISION_LAYER_TARGETS).with_offset(Vec3::Y),
        ))
        .id()
}

/// Helper: стена (Environment), загораживает обзор
fn spawn_wall(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            SpatialProxy::cuboid(Vec3::new(3.0, 2.0, 0.2), COLLISION_LAYER_ENVIRONMENT).with_offset(Vec3::Y * 2.0),
        ))
        .id()
}

/// Helper: враг, который патрулирует на месте (patrol radius 0) и смотрит в -Z
fn spawn_stationary_enemy(app: &mut App, position: Vec3) -> Entity {
    let rig = EnemyRig {
        patrol_radius: 0.0,
        ..default()
    };
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn_enemy(&mut commands, &EnemySetup::default(), &rig, Transform::from_translation(position))
            .expect("default setup is valid")
    };
    app.world_mut().flush();
    entity
}

fn state(app: &App, entity: Entity) -> EnemyState {
    *app.world().get::<EnemyState>(entity).expect("enemy state")
}

fn target(app: &App, entity: Entity) -> Option<Entity> {
    app.world().get::<EnemyTarget>(entity).expect("enemy target").entity
}

/// Прогоняет тики, пока не выполнится условие. Возвращает число тиков.
fn run_until(app: &mut App, max_ticks: usize, condition: impl Fn(&App) -> bool) -> Option<usize> {
    for tick in 1..=max_ticks {
        app.update();
        if condition(app) {
            return Some(tick);
        }
    }
    None
}

#[test]
fn test_target_in_front_acquired_within_one_poll() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -6.0), 100.0);

    // Первая итерация task'а: цель найдена
    app.update();
    assert_eq!(target(&app, enemy), Some(dummy));

    // Следующая итерация (≤ 50ms): Patrol → Tracking
    let ticks = run_until(&mut app, 4, |app| state(app, enemy) == EnemyState::Tracking);
    assert!(ticks.is_some(), "Tracking должен начаться в пределах одного периода");

    let nav = app.world().get::<NavigationAgent>(enemy).expect("nav");
    assert_eq!(nav.speed, EnemySetup::default().run_speed);

    // Update кормит аниматор модулем desired velocity
    app.update();
    let desired = app.world().get::<NavigationAgent>(enemy).expect("nav").desired_velocity;
    let feed = app.world().get::<AnimatorFeed>(enemy).expect("feed");
    assert!(desired.length() > 0.0);
    assert_eq!(feed.speed, desired.length());
}

#[test]
fn test_patrol_holds_after_first_leg() {
    let mut app = behavior_app(7);
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn_enemy(&mut commands, &EnemySetup::default(), &EnemyRig::default(), Transform::default())
            .expect("default setup is valid")
    };
    app.world_mut().flush();

    // Самый длинный leg (20m на 3 m/s) заканчивается раньше
    for _ in 0..600 {
        app.update();
    }
    let nav = *app.world().get::<NavigationAgent>(entity).expect("nav");
    let position = app.world().get::<Transform>(entity).expect("transform").translation;
    let movement = *app.world().get::<MovementConfig>(entity).expect("movement");

    assert!(nav.destination.is_some());
    assert!(nav.stopping_distance > movement.patrol_arrival_threshold);
    assert!(nav.remaining_distance > movement.patrol_arrival_threshold);

    // Stopping distance > arrival threshold: новая точка не выбирается
    for _ in 0..300 {
        app.update();
    }
    let held = app.world().get::<NavigationAgent>(entity).expect("nav");
    assert_eq!(held.destination, nav.destination);
    assert_eq!(app.world().get::<Transform>(entity).expect("transform").translation, position);
    assert_eq!(state(&app, entity), EnemyState::Patrol);
}

#[test]
fn test_target_behind_not_acquired() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    spawn_dummy(&mut app, Vec3::new(0.0, 0.0, 6.0), 100.0);

    for _ in 0..30 {
        app.update();
    }

    assert_eq!(state(&app, enemy), EnemyState::Patrol);
    assert_eq!(target(&app, enemy), None);
}

#[test]
fn test_target_outside_view_distance_not_acquired() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -14.0), 100.0);

    for _ in 0..30 {
        app.update();
    }

    assert_eq!(target(&app, enemy), None);
}

#[test]
fn test_obstructed_target_not_acquired_until_wall_removed() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -6.0), 100.0);
    let wall = spawn_wall(&mut app, Vec3::new(0.0, 0.0, -3.0));

    for _ in 0..30 {
        app.update();
    }
    assert_eq!(state(&app, enemy), EnemyState::Patrol);
    assert_eq!(target(&app, enemy), None);

    app.world_mut().despawn(wall);
    let ticks = run_until(&mut app, 4, |app| target(app, enemy) == Some(dummy));
    assert!(ticks.is_some(), "после удаления стены цель видна");
}

#[test]
fn test_chase_stops_at_attack_distance_and_begins_attack() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -8.0), 100.0);

    let ticks = run_until(&mut app, 120, |app| state(app, enemy) == EnemyState::AttackBegin);
    assert!(ticks.is_some(), "враг должен догнать цель");

    let nav = app.world().get::<NavigationAgent>(enemy).expect("nav");
    assert!(nav.is_stopped);

    let attack_distance = app.world().get::<AttackConfig>(enemy).expect("attack").attack_distance;
    let own = app.world().get::<Transform>(enemy).expect("transform").translation;
    let other = app.world().get::<Transform>(dummy).expect("transform").translation;
    assert!(own.distance(other) <= attack_distance + 0.01);

    // Пока окно удара не открыто, урона нет
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(app.world().get::<Health>(dummy).expect("health").current, 100.0);
    assert_eq!(state(&app, enemy), EnemyState::AttackBegin);
}

#[test]
fn test_target_death_reverts_to_patrol() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -9.0), 100.0);

    let ticks = run_until(&mut app, 6, |app| state(app, enemy) == EnemyState::Tracking);
    assert!(ticks.is_some());

    app.world_mut().get_mut::<Health>(dummy).expect("health").die();
    app.update();

    assert_eq!(state(&app, enemy), EnemyState::Patrol);
    assert_eq!(target(&app, enemy), None);
    let nav = app.world().get::<NavigationAgent>(enemy).expect("nav");
    assert_eq!(nav.speed, EnemySetup::default().patrol_speed);
}

#[test]
fn test_damage_from_untracked_source_adopts_attacker() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    // Атакующий за спиной, вне FOV
    let attacker = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, 5.0), 100.0);

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(target(&app, enemy), None);

    app.world_mut().send_event(DamageMessage {
        damager: attacker,
        target: enemy,
        amount: 10.0,
        hit_point: Vec3::new(0.0, 1.0, 0.5),
        hit_normal: Vec3::Z,
    });
    app.update();

    assert_eq!(target(&app, enemy), Some(attacker));
    assert_eq!(app.world().get::<Health>(enemy).expect("health").current, 90.0);

    let ticks = run_until(&mut app, 4, |app| state(app, enemy) == EnemyState::Tracking);
    assert!(ticks.is_some(), "обидчик становится целью преследования");
}

#[test]
fn test_enemy_death_is_terminal() {
    let mut app = behavior_app(42);
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -6.0), 100.0);

    let ticks = run_until(&mut app, 6, |app| state(app, enemy) == EnemyState::Tracking);
    assert!(ticks.is_some());

    app.world_mut().send_event(DamageMessage {
        damager: dummy,
        target: enemy,
        amount: 500.0,
        hit_point: Vec3::Y,
        hit_normal: Vec3::NEG_Z,
    });
    app.update();

    assert_eq!(state(&app, enemy), EnemyState::Dead);
    assert!(app.world().get::<Dead>(enemy).is_some());
    assert!(!app.world().get::<SpatialProxy>(enemy).expect("proxy").enabled);
    assert!(!app.world().get::<NavigationAgent>(enemy).expect("nav").enabled);

    let position = app.world().get::<Transform>(enemy).expect("transform").translation;

    // Timeline cues и время больше ничего не меняют
    app.world_mut().send_event(TimelineCue::EnableAttack { entity: enemy });
    for _ in 0..30 {
        app.update();
    }
    assert_eq!(state(&app, enemy), EnemyState::Dead);
    assert_eq!(app.world().get::<Transform>(enemy).expect("transform").translation, position);
}

#[test]
fn test_rapier_backend_without_context_degrades_to_patrol() {
    let mut app = behavior_app(42);
    app.world_mut().resource_mut::<EnemyAiSettings>().spatial_backend = SpatialBackend::Rapier;
    let enemy = spawn_stationary_enemy(&mut app, Vec3::ZERO);
    spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -6.0), 100.0);

    for _ in 0..30 {
        app.update();
    }

    assert_eq!(state(&app, enemy), EnemyState::Patrol);
    assert_eq!(target(&app, enemy), None);
}

//! Perception task: периодический поиск цели (FOV + sightline).

use bevy::prelude::*;

use crate::ai::{EnemyState, EnemyTarget, MovementConfig, PerceptionConfig, PerceptionTask};
use crate::components::Health;
use crate::navigation::{sample_patrol_point, NavigationAgent, WalkableArea};
use crate::settings::EnemyAiSettings;
use crate::shared::within_field_of_view;
use crate::spatial::{SpatialQueries, SpatialQuery};
use crate::DeterministicRng;

/// Видит ли наблюдатель цель.
///
/// Вертикаль направления берётся от forward глаз (смотрим "по уровню"),
/// угол должен быть строго меньше половины FOV, первая поверхность на
/// sightline должна быть самой целью.
pub fn is_target_on_sight(
    spatial: &impl SpatialQuery,
    observer: Entity,
    eye: Vec3,
    eye_forward: Vec3,
    target: Entity,
    target_position: Vec3,
    config: &PerceptionConfig,
) -> bool {
    let mut direction = target_position - eye;
    direction.y = eye_forward.y;

    if !within_field_of_view(eye_forward, direction, config.fov_degrees) {
        return false;
    }

    spatial
        .sightline(eye, direction, config.view_distance, config.sightline_mask, Some(observer))
        .is_some_and(|hit| hit.entity == target)
}

/// Система: итерация perception task (каждые `perception_period` секунд)
///
/// Цель есть: Patrol → Tracking (run speed), destination = позиция цели.
/// Цели нет: сброс ссылки, Tracking → Patrol (patrol speed), новая patrol
/// точка по прибытии, затем scan: overlap → FOV → sightline → живой.
pub fn run_perception_task(
    time: Res<Time<Fixed>>,
    settings: Res<EnemyAiSettings>,
    area: Option<Res<WalkableArea>>,
    mut rng: ResMut<DeterministicRng>,
    spatial: SpatialQueries,
    healths: Query<&Health>,
    transforms: Query<&Transform>,
    mut agents: Query<(
        Entity,
        &mut PerceptionTask,
        &mut EnemyState,
        &mut EnemyTarget,
        &mut NavigationAgent,
        &PerceptionConfig,
        &MovementConfig,
    )>,
    mut candidates: Local<Vec<Entity>>,
) {
    let delta = time.delta_secs();

    for (entity, mut task, mut state, mut target, mut nav, perception, movement) in agents.iter_mut() {
        // Task живёт, пока агент жив
        if state.is_dead() {
            continue;
        }

        if !task.tick(delta, settings.perception_period) {
            continue;
        }

        let Ok(transform) = transforms.get(entity) else {
            continue;
        };

        if let Some(current) = target.resolve(&healths) {
            let Ok(target_transform) = transforms.get(current) else {
                continue;
            };

            if *state == EnemyState::Patrol {
                *state = EnemyState::Tracking;
                nav.speed = movement.run_speed;
                crate::log(&format!("🏃 {:?} Patrol → Tracking (target {:?})", entity, current));
            }

            nav.set_destination(target_transform.translation);
            continue;
        }

        if let Some(lost) = target.entity {
            target.clear();
            crate::log(&format!("👻 {:?} lost target {:?}", entity, lost));
        }

        if *state == EnemyState::Tracking {
            *state = EnemyState::Patrol;
            nav.speed = movement.patrol_speed;
            crate::log(&format!("🚶 {:?} Tracking → Patrol (no target)", entity));
        }

        if *state == EnemyState::Patrol && nav.remaining_distance <= movement.patrol_arrival_threshold {
            match sample_patrol_point(
                &mut rng.rng,
                transform.translation,
                movement.patrol_radius,
                area.as_deref(),
            ) {
                Some(point) => nav.set_destination(point),
                None => crate::logger::log_warning(&format!(
                    "{:?}: no reachable patrol point within {:.1}m, keeping destination",
                    entity, movement.patrol_radius
                )),
            }
        }

        let (eye, eye_forward) = perception.eye(transform);

        candidates.clear();
        spatial.overlap_sphere(
            eye,
            perception.view_distance,
            perception.target_mask,
            Some(entity),
            &mut candidates,
        );

        for &candidate in candidates.iter() {
            if !healths.get(candidate).is_ok_and(Health::is_alive) {
                continue;
            }
            let Ok(candidate_transform) = transforms.get(candidate) else {
                continue;
            };

            if is_target_on_sight(
                &spatial,
                entity,
                eye,
                eye_forward,
                candidate,
                candidate_transform.translation,
                perception,
            ) {
                target.set(candidate);
                crate::log(&format!("👁️ {:?} spotted {:?}", entity, candidate));
                break;
            }
        }
    }
}

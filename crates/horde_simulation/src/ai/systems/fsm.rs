//! Per-tick state machine transitions and attack orientation.

use bevy::prelude::*;

use crate::ai::{AnimationTrigger, EnemyState, EnemyTarget, MovementConfig, TurnSmoothing};
use crate::combat::AttackConfig;
use crate::components::Health;
use crate::navigation::NavigationAgent;
use crate::shared::{smooth_damp_angle, yaw_of, yaw_towards};

/// Навигация останавливается ровно на stopping distance (= attack distance),
/// float погрешность не должна оставлять агента вне дистанции атаки
const ATTACK_RANGE_TOLERANCE: f32 = 1e-3;

/// Система: переходы, которые проверяются каждый physics тик
///
/// - Tracking, цель невалидна → Patrol (сброс цели, patrol speed)
/// - Tracking, дистанция до цели ≤ attack distance → AttackBegin
///   (навигация стоп, BeginAttack триггер анимации)
/// - Patrol с мёртвой ссылкой → ссылка сбрасывается
pub fn update_attack_transitions(
    mut agents: Query<(
        Entity,
        &mut EnemyState,
        &mut EnemyTarget,
        &mut NavigationAgent,
        &AttackConfig,
        &MovementConfig,
    )>,
    transforms: Query<&Transform>,
    healths: Query<&Health>,
    mut triggers: EventWriter<AnimationTrigger>,
) {
    for (entity, mut state, mut target, mut nav, attack, movement) in agents.iter_mut() {
        match *state {
            EnemyState::Tracking => {
                let Some(current) = target.resolve(&healths) else {
                    target.clear();
                    *state = EnemyState::Patrol;
                    nav.speed = movement.patrol_speed;
                    crate::log(&format!("❌ {:?} Tracking → Patrol (target invalid)", entity));
                    continue;
                };

                let (Ok(own), Ok(other)) = (transforms.get(entity), transforms.get(current)) else {
                    continue;
                };

                let distance = own.translation.distance(other.translation);
                if distance <= attack.attack_distance + ATTACK_RANGE_TOLERANCE {
                    *state = EnemyState::AttackBegin;
                    nav.is_stopped = true;
                    triggers.write(AnimationTrigger::BeginAttack { entity });
                    crate::log(&format!(
                        "⚔️ {:?} Tracking → AttackBegin (target {:?}, distance {:.2} ≤ {:.2})",
                        entity, current, distance, attack.attack_distance
                    ));
                }
            }
            EnemyState::Patrol => {
                if target.entity.is_some() && !target.has_target(&healths) {
                    target.clear();
                }
            }
            EnemyState::AttackBegin | EnemyState::Attacking | EnemyState::Dead => {}
        }
    }
}

/// Система: доворот на цель во время атаки (только yaw)
///
/// Critically damped smoothing, независимо от rotation навигации.
/// Без валидной цели агент не поворачивается.
pub fn smooth_attack_orientation(
    mut agents: Query<(Entity, &EnemyState, &EnemyTarget, &MovementConfig, &mut TurnSmoothing)>,
    mut transforms: Query<&mut Transform>,
    healths: Query<&Health>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, state, target, movement, mut turn) in agents.iter_mut() {
        if !state.is_attacking() {
            continue;
        }

        let Some(current) = target.resolve(&healths) else {
            continue;
        };

        let Ok(target_position) = transforms.get(current).map(|t| t.translation) else {
            continue;
        };

        let Ok(mut transform) = transforms.get_mut(entity) else {
            continue;
        };

        let Some(target_yaw) = yaw_towards(target_position - transform.translation) else {
            continue;
        };

        let yaw = smooth_damp_angle(
            yaw_of(transform.rotation),
            target_yaw,
            &mut turn.velocity,
            movement.turn_smooth_time,
            delta,
        );
        transform.rotation = Quat::from_rotation_y(yaw);
    }
}

//! Attack timeline entry points (EnableAttack / DisableAttack).
//!
//! Хост шлёт `TimelineCue` из animation events, либо вызывает
//! `enable_attack` / `disable_attack` напрямую.

use bevy::prelude::*;

use crate::ai::{EnemyState, EnemyTarget, MovementConfig, TimelineCue};
use crate::combat::AttackCycleHits;
use crate::components::Health;
use crate::navigation::NavigationAgent;

/// AttackBegin → Attacking. Новый attack cycle: hit set очищается.
///
/// Возвращает `false`, если агент не в AttackBegin (cue игнорируется).
pub fn enable_attack(state: &mut EnemyState, hits: &mut AttackCycleHits) -> bool {
    if *state != EnemyState::AttackBegin {
        return false;
    }
    *state = EnemyState::Attacking;
    hits.clear();
    true
}

/// Конец окна удара.
///
/// Из AttackBegin / Attacking: Tracking, если цель ещё валидна, иначе Patrol
/// (с patrol speed). В Tracking / Patrol только возобновляет навигацию.
/// Dead не трогается.
pub fn disable_attack(
    state: &mut EnemyState,
    has_target: bool,
    nav: &mut NavigationAgent,
    movement: &MovementConfig,
) {
    match *state {
        EnemyState::Dead => return,
        EnemyState::AttackBegin | EnemyState::Attacking => {
            if has_target {
                *state = EnemyState::Tracking;
            } else {
                *state = EnemyState::Patrol;
                nav.speed = movement.patrol_speed;
            }
        }
        EnemyState::Tracking | EnemyState::Patrol => {}
    }
    nav.is_stopped = false;
}

/// Система: применение TimelineCue событий
pub fn apply_timeline_cues(
    mut cues: EventReader<TimelineCue>,
    mut enemies: Query<(
        &mut EnemyState,
        &EnemyTarget,
        &mut NavigationAgent,
        &MovementConfig,
        &mut AttackCycleHits,
    )>,
    healths: Query<&Health>,
) {
    for cue in cues.read() {
        let entity = cue.entity();
        let Ok((mut state, target, mut nav, movement, mut hits)) = enemies.get_mut(entity) else {
            continue;
        };

        if state.is_dead() {
            continue;
        }

        match cue {
            TimelineCue::EnableAttack { .. } => {
                if enable_attack(&mut state, &mut hits) {
                    crate::log(&format!("🗡️ {:?} AttackBegin → Attacking (hit set cleared)", entity));
                } else {
                    crate::log(&format!("⚠️ {:?} EnableAttack ignored in {:?}", entity, *state));
                }
            }
            TimelineCue::DisableAttack { .. } => {
                let before = *state;
                disable_attack(&mut state, target.has_target(&healths), &mut nav, movement);
                if before != *state {
                    crate::log(&format!("↩️ {:?} {:?} → {:?} (DisableAttack)", entity, before, *state));
                }
            }
        }
    }
}

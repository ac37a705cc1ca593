//! Melee hit detection: sphere sweep каждый physics тик в Attacking.

use bevy::prelude::*;

use crate::ai::EnemyState;
use crate::combat::{AttackConfig, AttackCycleHits, DamageMessage};
use crate::components::Health;
use crate::navigation::NavigationAgent;
use crate::settings::EnemyAiSettings;
use crate::spatial::{SpatialQueries, SpatialQuery, SphereSweep, SweepHit};

/// Первый кандидат sweep'а, которого можно ударить в этом цикле.
///
/// Порядок кандидатов задаёт spatial backend. Пропускаются: сам атакующий,
/// сущности без Health, уже ударенные в этом цикле.
pub fn select_sweep_victim(
    hits: &[SweepHit],
    attacker: Entity,
    cycle: &AttackCycleHits,
    is_health_entity: impl Fn(Entity) -> bool,
) -> Option<SweepHit> {
    hits.iter()
        .copied()
        .find(|hit| hit.entity != attacker && is_health_entity(hit.entity) && !cycle.contains(hit.entity))
}

/// Точка попадания; pivot, если контакт был уже на старте sweep'а (distance ≤ 0)
pub fn resolve_hit_point(hit: &SweepHit, pivot: Vec3) -> Vec3 {
    if hit.distance <= 0.0 {
        pivot
    } else {
        hit.point
    }
}

/// System: attack sweep (только Attacking).
///
/// Сфера attack radius из pivot вдоль forward на |velocity| × dt.
/// Не больше одного DamageMessage за тик, не больше одного на цель за цикл.
pub fn sweep_attack_hits(
    time: Res<Time<Fixed>>,
    settings: Res<EnemyAiSettings>,
    spatial: SpatialQueries,
    mut attackers: Query<(
        Entity,
        &EnemyState,
        &Transform,
        &NavigationAgent,
        &AttackConfig,
        &mut AttackCycleHits,
    )>,
    healths: Query<&Health>,
    mut damage_messages: EventWriter<DamageMessage>,
    mut hits: Local<Vec<SweepHit>>,
) {
    let delta = time.delta_secs();

    for (entity, state, transform, nav, attack, mut cycle) in attackers.iter_mut() {
        if *state != EnemyState::Attacking {
            continue;
        }

        let pivot = attack.pivot(transform);
        let sweep = SphereSweep {
            origin: pivot,
            radius: attack.attack_radius,
            direction: transform.forward().as_vec3(),
            distance: nav.velocity.length() * delta,
            mask: attack.target_mask,
            exclude: Some(entity),
            capacity: settings.sweep_capacity,
        };

        hits.clear();
        spatial.sweep_sphere(&sweep, &mut hits);

        let Some(victim) = select_sweep_victim(&hits, entity, &cycle, |candidate| healths.contains(candidate))
        else {
            continue;
        };

        damage_messages.write(DamageMessage {
            damager: entity,
            target: victim.entity,
            amount: attack.damage,
            hit_point: resolve_hit_point(&victim, pivot),
            hit_normal: victim.normal,
        });
        cycle.record(victim.entity);

        crate::log(&format!(
            "💥 {:?} sweep hit {:?} ({} candidates, distance {:.2})",
            entity,
            victim.entity,
            hits.len(),
            victim.distance
        ));
    }
}

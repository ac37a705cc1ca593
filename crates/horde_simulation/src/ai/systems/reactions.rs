//! AI reaction systems (death, aggro-on-hit).

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;

use crate::ai::{AnimationTrigger, EnemyState, EnemyTarget};
use crate::combat::{DamageDealt, SoundCue};
use crate::components::{AnimatorFeed, Health, SoundCues};
use crate::navigation::NavigationAgent;
use crate::spatial::SpatialProxy;

/// System: смерть врага → терминальный Dead state
///
/// Срабатывает один раз при `Health::dead`:
/// - коллизии выключаются (proxy + rapier ColliderDisabled)
/// - навигация выключается навсегда
/// - движение тела отдаётся death анимации (root motion)
/// - death звук, если настроен
pub fn handle_enemy_death(
    mut commands: Commands,
    mut enemies: Query<
        (
            Entity,
            &Health,
            &Transform,
            &mut EnemyState,
            &mut NavigationAgent,
            Option<&mut SpatialProxy>,
            Option<&mut AnimatorFeed>,
            Option<&SoundCues>,
        ),
        Changed<Health>,
    >,
    mut triggers: EventWriter<AnimationTrigger>,
    mut sounds: EventWriter<SoundCue>,
) {
    for (entity, health, transform, mut state, mut nav, proxy, feed, cues) in enemies.iter_mut() {
        if health.is_alive() || state.is_dead() {
            continue;
        }

        let previous = *state;
        *state = EnemyState::Dead;
        nav.disable();

        if let Some(mut proxy) = proxy {
            proxy.enabled = false;
        }
        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.insert(ColliderDisabled);
        }

        if let Some(mut feed) = feed {
            feed.apply_root_motion = true;
        }
        triggers.write(AnimationTrigger::Die { entity });

        if let Some(clip) = cues.and_then(|cues| cues.death.clone()) {
            sounds.write(SoundCue {
                emitter: entity,
                clip,
                position: transform.translation,
            });
        }

        crate::log(&format!("💀 {:?} {:?} → Dead (collision and navigation disabled)", entity, previous));
    }
}

/// System: aggro-on-hit
///
/// Если враг принял урон и сейчас без (валидной) цели, атакующий
/// становится целью, независимо от слоя/фракции атакующего.
/// Атакующий без Health целью стать не может.
pub fn adopt_damager_as_target(
    mut damage_events: EventReader<DamageDealt>,
    mut enemies: Query<(&EnemyState, &mut EnemyTarget)>,
    healths: Query<&Health>,
) {
    for event in damage_events.read() {
        let Ok((state, mut target)) = enemies.get_mut(event.target) else {
            continue;
        };

        if state.is_dead() || !healths.get(event.target).is_ok_and(Health::is_alive) {
            continue;
        }

        if target.has_target(&healths) {
            continue;
        }

        if healths.get(event.attacker).is_err() {
            continue;
        }

        target.set(event.attacker);
        crate::log(&format!(
            "🔥 {:?} hit by {:?} → attacker becomes target",
            event.target, event.attacker
        ));
    }
}

//! Damage dispatch and death systems.

use bevy::prelude::*;

use crate::combat::{DamageDealt, DamageMessage, Dead, EntityDied, SoundCue};
use crate::components::{Health, SoundCues};

/// Результат доставки одного DamageMessage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Цель без Health (despawned или не damageable)
    NoHealth,
    /// Мёртв / неуязвим
    Rejected,
    Accepted,
    /// Принят и добил
    Killed,
}

/// Доставка урона в health entity
pub fn deliver_damage(health: &mut Health, amount: f32) -> DamageOutcome {
    if !health.accept_damage(amount) {
        return DamageOutcome::Rejected;
    }
    if health.should_die() && health.die() {
        return DamageOutcome::Killed;
    }
    DamageOutcome::Accepted
}

/// Система: damage dispatcher
///
/// 1. Читаем DamageMessage
/// 2. accept_damage на Health цели
/// 3. Принят → DamageDealt (hit reaction) + hit звук цели
/// 4. Добит → EntityDied
pub fn apply_damage(
    mut messages: EventReader<DamageMessage>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut sounds: EventWriter<SoundCue>,
    mut targets: Query<(&mut Health, Option<&SoundCues>)>,
) {
    for message in messages.read() {
        let outcome = match targets.get_mut(message.target) {
            Ok((mut health, _)) => deliver_damage(&mut health, message.amount),
            Err(_) => DamageOutcome::NoHealth,
        };

        match outcome {
            DamageOutcome::NoHealth => {
                crate::logger::log_warning(&format!(
                    "DamageMessage: target {:?} has no Health component",
                    message.target
                ));
                continue;
            }
            DamageOutcome::Rejected => {
                crate::log(&format!("🛡️ {:?} rejected damage from {:?}", message.target, message.damager));
                continue;
            }
            DamageOutcome::Accepted | DamageOutcome::Killed => {}
        }

        let target_died = outcome == DamageOutcome::Killed;

        damage_dealt_events.write(DamageDealt {
            attacker: message.damager,
            target: message.target,
            damage: message.amount,
            impact_point: message.hit_point,
            impact_normal: message.hit_normal,
            target_died,
        });

        if let Ok((_, Some(cues))) = targets.get(message.target) {
            if let Some(clip) = cues.hit.clone() {
                sounds.write(SoundCue {
                    emitter: message.target,
                    clip,
                    position: message.hit_point,
                });
            }
        }

        if target_died {
            entity_died_events.write(EntityDied {
                entity: message.target,
                killer: Some(message.damager),
            });
            crate::logger::log_info(&format!("☠️ Entity {:?} killed by {:?}", message.target, message.damager));
        } else {
            crate::log(&format!(
                "🩸 {:?} took {:.1} damage from {:?}",
                message.target, message.amount, message.damager
            ));
        }
    }
}

/// Система: маркер Dead для всех умерших (не только врагов)
pub fn mark_dead(mut commands: Commands, mut death_events: EventReader<EntityDied>) {
    for event in death_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }
    }
}

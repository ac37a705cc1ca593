//! Tests for melee sweep hit detection.

#[cfg(test)]
mod tests {
    use super::super::melee::{resolve_hit_point, select_sweep_victim, sweep_attack_hits};
    use crate::ai::EnemyState;
    use crate::combat::{attack_distance_for, AttackConfig, AttackCycleHits, DamageMessage};
    use crate::components::Health;
    use crate::navigation::NavigationAgent;
    use crate::settings::EnemyAiSettings;
    use crate::spatial::{SpatialProxy, SweepHit, COLLISION_LAYER_TARGETS};
    use approx::assert_relative_eq;
    use bevy::prelude::*;

    fn hit(index: u32, distance: f32) -> SweepHit {
        SweepHit {
            entity: Entity::from_raw(index),
            distance,
            point: Vec3::new(0.0, 1.0, -distance),
            normal: Vec3::Z,
        }
    }

    #[test]
    fn test_attack_distance_formula() {
        // горизонталь pivot'а 0.6 (высота не учитывается) + радиус 2 + агент 0.5
        let distance = attack_distance_for(Vec3::new(0.0, 1.2, -0.6), 2.0, 0.5);
        assert_relative_eq!(distance, 3.1, epsilon = 1e-5);

        let config = AttackConfig::new(Vec3::new(0.3, 0.0, -0.4), 1.0, 30.0, 0.25);
        assert_relative_eq!(config.attack_distance, 1.75, epsilon = 1e-5);
    }

    #[test]
    fn test_select_victim_skips_already_hit_and_non_living() {
        let hits = [hit(1, 0.0), hit(2, 0.1), hit(3, 0.2)];
        let mut cycle = AttackCycleHits::default();
        cycle.record(Entity::from_raw(1));

        let victim = select_sweep_victim(&hits, Entity::from_raw(9), &cycle, |e| e != Entity::from_raw(2))
            .expect("third candidate");
        assert_eq!(victim.entity, Entity::from_raw(3));
    }

    #[test]
    fn test_select_victim_skips_attacker() {
        let hits = [hit(9, 0.0)];
        let cycle = AttackCycleHits::default();
        assert!(select_sweep_victim(&hits, Entity::from_raw(9), &cycle, |_| true).is_none());
    }

    #[test]
    fn test_hit_point_falls_back_to_pivot_on_initial_overlap() {
        let pivot = Vec3::new(5.0, 1.0, 5.0);
        assert_eq!(resolve_hit_point(&hit(1, 0.0), pivot), pivot);
        assert_eq!(resolve_hit_point(&hit(1, 0.5), pivot), Vec3::new(0.0, 1.0, -0.5));
    }

    #[test]
    fn test_cycle_hits_record_is_idempotent() {
        let mut cycle = AttackCycleHits::default();
        cycle.record(Entity::from_raw(4));
        cycle.record(Entity::from_raw(4));
        assert_eq!(cycle.entities.len(), 1);
        cycle.clear();
        assert!(cycle.entities.is_empty());
    }

    fn sweep_app() -> App {
        let mut app = App::new();
        app.insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<EnemyAiSettings>()
            .add_event::<DamageMessage>()
            .add_systems(Update, sweep_attack_hits);
        app
    }

    fn spawn_attacker(app: &mut App, state: EnemyState) -> Entity {
        app.world_mut()
            .spawn((
                Transform::default(),
                state,
                NavigationAgent::new(0.5),
                AttackConfig::new(Vec3::new(0.0, 1.0, -0.6), 1.0, 30.0, 0.5),
                AttackCycleHits::default(),
                Health::new(100.0),
            ))
            .id()
    }

    fn spawn_dummy(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_translation(position),
                Health::new(100.0),
                SpatialProxy::sphere(0.5, COLLISION_LAYER_TARGETS).with_offset(Vec3::Y),
            ))
            .id()
    }

    fn drain_messages(app: &mut App) -> Vec<DamageMessage> {
        app.world_mut().resource_mut::<Events<DamageMessage>>().drain().collect()
    }

    #[test]
    fn test_two_candidates_one_per_tick() {
        let mut app = sweep_app();
        let attacker = spawn_attacker(&mut app, EnemyState::Attacking);
        let near = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -0.8));
        let far = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -1.8));

        app.update();
        let first = drain_messages(&mut app);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].target, near);
        assert_eq!(first[0].damager, attacker);
        assert_eq!(first[0].amount, 30.0);
        // Нулевая дистанция sweep'а: точка попадания = pivot
        assert_eq!(first[0].hit_point, Vec3::new(0.0, 1.0, -0.6));

        app.update();
        let second = drain_messages(&mut app);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].target, far);

        app.update();
        assert!(drain_messages(&mut app).is_empty(), "оба уже ударены в этом цикле");

        let cycle = app.world().get::<AttackCycleHits>(attacker).expect("cycle");
        assert_eq!(cycle.entities, vec![near, far]);
    }

    #[test]
    fn test_no_damage_outside_attacking() {
        for state in [EnemyState::Patrol, EnemyState::Tracking, EnemyState::AttackBegin, EnemyState::Dead] {
            let mut app = sweep_app();
            spawn_attacker(&mut app, state);
            spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -0.8));

            app.update();
            assert!(drain_messages(&mut app).is_empty(), "state {:?} must not sweep", state);
        }
    }

    #[test]
    fn test_disabled_proxy_not_hit() {
        let mut app = sweep_app();
        spawn_attacker(&mut app, EnemyState::Attacking);
        let dummy = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -0.8));
        app.world_mut()
            .get_mut::<SpatialProxy>(dummy)
            .expect("proxy")
            .enabled = false;

        app.update();
        assert!(drain_messages(&mut app).is_empty());
    }
}

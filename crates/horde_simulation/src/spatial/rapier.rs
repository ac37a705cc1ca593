//! Rapier spatial backend (query pipeline bevy_rapier3d).
//!
//! Слои берутся из `CollisionGroups::memberships` коллайдеров,
//! маска запроса идёт в `CollisionGroups::filters`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups, Group, QueryFilter, RapierContext, ShapeCastOptions};

use super::{SightlineHit, SphereSweep, SpatialQuery, SweepHit};

/// Обёртка над RapierContext, реализующая `SpatialQuery`
pub struct RapierSpatial<'a> {
    pub context: &'a RapierContext<'a>,
}

fn mask_groups(mask: u32) -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
}

impl SpatialQuery for RapierSpatial<'_> {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32, exclude: Option<Entity>, out: &mut Vec<Entity>) {
        let shape = Collider::ball(radius);
        let mut filter = QueryFilter::new().groups(mask_groups(mask));
        if let Some(entity) = exclude {
            filter = filter.exclude_collider(entity);
        }

        self.context
            .intersections_with_shape(center, Quat::IDENTITY, &shape, filter, |entity| {
                out.push(entity);
                true
            });
    }

    fn sweep_sphere(&self, sweep: &SphereSweep, out: &mut Vec<SweepHit>) {
        let Some(direction) = sweep.direction.try_normalize() else {
            return;
        };
        let shape = Collider::ball(sweep.radius);

        // cast_shape возвращает только ближайшее попадание: повторяем,
        // исключая уже найденных, пока не упрёмся в capacity
        let mut found: Vec<Entity> = Vec::with_capacity(sweep.capacity);
        while found.len() < sweep.capacity {
            let predicate = |entity: Entity| !found.contains(&entity);
            let mut filter = QueryFilter::new().groups(mask_groups(sweep.mask)).predicate(&predicate);
            if let Some(entity) = sweep.exclude {
                filter = filter.exclude_collider(entity);
            }

            let options = ShapeCastOptions {
                max_time_of_impact: sweep.distance.max(0.0),
                target_distance: 0.0,
                stop_at_penetration: true,
                compute_impact_geometry_on_penetration: true,
            };

            let Some((entity, hit)) =
                self.context
                    .cast_shape(sweep.origin, Quat::IDENTITY, direction, &shape, options, filter)
            else {
                break;
            };

            let (point, normal) = match hit.details {
                Some(details) => (details.witness1, details.normal1),
                None => (sweep.origin + direction * hit.time_of_impact, -direction),
            };

            out.push(SweepHit {
                entity,
                distance: hit.time_of_impact,
                point,
                normal,
            });
            found.push(entity);
        }
    }

    fn sightline(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<SightlineHit> {
        let direction = direction.try_normalize()?;
        let mut filter = QueryFilter::new().groups(mask_groups(mask));
        if let Some(entity) = exclude {
            filter = filter.exclude_collider(entity);
        }

        let (entity, intersection) = self
            .context
            .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)?;

        Some(SightlineHit {
            entity,
            distance: intersection.time_of_impact,
            point: intersection.point,
        })
    }
}

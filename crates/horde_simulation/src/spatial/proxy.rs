//! Proxy spatial backend: brute-force геометрия по ECS компонентам.
//!
//! Каждая сущность с `SpatialProxy` описывается простой формой (шар или
//! axis-aligned box) вокруг `Transform::translation + offset`.
//! Используется в headless симуляции и тестах, где rapier world не поднят.

use bevy::prelude::*;

use super::{SightlineHit, SphereSweep, SpatialQuery, SweepHit};

const EPSILON: f32 = 1e-6;

/// Форма proxy-коллайдера
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ProxyShape {
    Sphere { radius: f32 },
    /// Axis-aligned (rotation Transform игнорируется)
    Cuboid { half_extents: Vec3 },
}

/// Коллайдер для proxy backend'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpatialProxy {
    pub shape: ProxyShape,
    /// Смещение центра формы от Transform::translation
    pub offset: Vec3,
    /// Битовая маска слоёв (см. `spatial::layers`)
    pub layers: u32,
    /// false после смерти (collider disabled)
    pub enabled: bool,
}

impl SpatialProxy {
    pub fn sphere(radius: f32, layers: u32) -> Self {
        Self {
            shape: ProxyShape::Sphere { radius },
            offset: Vec3::ZERO,
            layers,
            enabled: true,
        }
    }

    pub fn cuboid(half_extents: Vec3, layers: u32) -> Self {
        Self {
            shape: ProxyShape::Cuboid { half_extents },
            offset: Vec3::ZERO,
            layers,
            enabled: true,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }
}

/// Снимок одного proxy в world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyEntry {
    pub entity: Entity,
    pub center: Vec3,
    pub shape: ProxyShape,
    pub layers: u32,
}

impl ProxyEntry {
    /// `None` для выключенного proxy
    pub fn from_components(entity: Entity, transform: &Transform, proxy: &SpatialProxy) -> Option<Self> {
        if !proxy.enabled {
            return None;
        }
        Some(Self {
            entity,
            center: transform.translation + proxy.offset,
            shape: proxy.shape,
            layers: proxy.layers,
        })
    }

    fn matches(&self, mask: u32, exclude: Option<Entity>) -> bool {
        self.layers & mask != 0 && exclude != Some(self.entity)
    }
}

impl ProxyShape {
    /// Ближайшая к `point` точка формы (сама `point`, если она внутри)
    pub fn closest_point(&self, center: Vec3, point: Vec3) -> Vec3 {
        match *self {
            ProxyShape::Sphere { radius } => {
                let offset = point - center;
                if offset.length() <= radius {
                    point
                } else {
                    center + offset.normalize() * radius
                }
            }
            ProxyShape::Cuboid { half_extents } => center + (point - center).clamp(-half_extents, half_extents),
        }
    }

    pub fn distance_to(&self, center: Vec3, point: Vec3) -> f32 {
        (point - self.closest_point(center, point)).length()
    }

    /// Первый `t >= 0`, при котором луч входит в форму, раздутую на `inflate`.
    ///
    /// `direction`: единичный вектор. Для origin внутри формы возвращает 0.
    /// Углы раздутого cuboid'а не скругляются.
    pub fn ray_entry(&self, center: Vec3, origin: Vec3, direction: Vec3, inflate: f32) -> Option<f32> {
        match *self {
            ProxyShape::Sphere { radius } => {
                let r = radius + inflate;
                let oc = origin - center;
                let c = oc.length_squared() - r * r;
                if c <= 0.0 {
                    return Some(0.0);
                }
                let b = oc.dot(direction);
                if b > 0.0 {
                    return None;
                }
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                Some((-b - discriminant.sqrt()).max(0.0))
            }
            ProxyShape::Cuboid { half_extents } => {
                let extents = half_extents + Vec3::splat(inflate);
                let lo = center - extents;
                let hi = center + extents;

                let mut t_min = 0.0_f32;
                let mut t_max = f32::INFINITY;
                for axis in 0..3 {
                    let o = origin[axis];
                    let d = direction[axis];
                    if d.abs() < EPSILON {
                        if o < lo[axis] || o > hi[axis] {
                            return None;
                        }
                        continue;
                    }
                    let t1 = (lo[axis] - o) / d;
                    let t2 = (hi[axis] - o) / d;
                    t_min = t_min.max(t1.min(t2));
                    t_max = t_max.min(t1.max(t2));
                    if t_min > t_max {
                        return None;
                    }
                }
                Some(t_min)
            }
        }
    }
}

/// Overlap: все proxy слоёв `mask`, пересекающие шар. Порядок: по расстоянию до центра.
pub fn overlap_sphere(
    entries: impl Iterator<Item = ProxyEntry>,
    center: Vec3,
    radius: f32,
    mask: u32,
    exclude: Option<Entity>,
    out: &mut Vec<Entity>,
) {
    let mut found: Vec<(f32, Entity)> = entries
        .filter(|entry| entry.matches(mask, exclude))
        .filter_map(|entry| {
            let distance = entry.shape.distance_to(entry.center, center);
            (distance <= radius).then_some((distance, entry.entity))
        })
        .collect();

    found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    out.extend(found.into_iter().map(|(_, entity)| entity));
}

/// Sphere sweep: ближайшие попадания первыми, не больше `sweep.capacity`.
pub fn sweep_sphere(entries: impl Iterator<Item = ProxyEntry>, sweep: &SphereSweep, out: &mut Vec<SweepHit>) {
    let direction = sweep.direction.normalize_or_zero();
    let distance = sweep.distance.max(0.0);

    let mut hits: Vec<SweepHit> = entries
        .filter(|entry| entry.matches(sweep.mask, sweep.exclude))
        .filter_map(|entry| {
            let t = entry
                .shape
                .ray_entry(entry.center, sweep.origin, direction, sweep.radius)?;
            if t > distance {
                return None;
            }
            let sphere_center = sweep.origin + direction * t;
            let point = entry.shape.closest_point(entry.center, sphere_center);
            let normal = (sphere_center - point).try_normalize().unwrap_or(-direction);
            Some(SweepHit {
                entity: entry.entity,
                distance: t,
                point,
                normal,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.entity.cmp(&b.entity)));
    hits.truncate(sweep.capacity);
    out.extend(hits);
}

/// Sightline: первая поверхность слоёв `mask` вдоль луча в пределах `max_distance`.
pub fn sightline(
    entries: impl Iterator<Item = ProxyEntry>,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    mask: u32,
    exclude: Option<Entity>,
) -> Option<SightlineHit> {
    let direction = direction.try_normalize()?;

    entries
        .filter(|entry| entry.matches(mask, exclude))
        .filter_map(|entry| {
            let t = entry.shape.ray_entry(entry.center, origin, direction, 0.0)?;
            (t <= max_distance).then_some(SightlineHit {
                entity: entry.entity,
                distance: t,
                point: origin + direction * t,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance).then(a.entity.cmp(&b.entity)))
}

/// Набор proxy вне ECS (unit-тесты, offline расчёты)
#[derive(Debug, Clone, Default)]
pub struct ProxySet {
    pub entries: Vec<ProxyEntry>,
}

impl SpatialQuery for ProxySet {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32, exclude: Option<Entity>, out: &mut Vec<Entity>) {
        overlap_sphere(self.entries.iter().copied(), center, radius, mask, exclude, out);
    }

    fn sweep_sphere(&self, sweep: &SphereSweep, out: &mut Vec<SweepHit>) {
        sweep_sphere(self.entries.iter().copied(), sweep, out);
    }

    fn sightline(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<SightlineHit> {
        sightline(self.entries.iter().copied(), origin, direction, max_distance, mask, exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::layers::*;
    use approx::assert_relative_eq;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn sphere_at(index: u32, center: Vec3, radius: f32, layers: u32) -> ProxyEntry {
        ProxyEntry {
            entity: entity(index),
            center,
            shape: ProxyShape::Sphere { radius },
            layers,
        }
    }

    fn wall_at(index: u32, center: Vec3, half_extents: Vec3) -> ProxyEntry {
        ProxyEntry {
            entity: entity(index),
            center,
            shape: ProxyShape::Cuboid { half_extents },
            layers: COLLISION_LAYER_ENVIRONMENT,
        }
    }

    fn sweep(origin: Vec3, direction: Vec3, distance: f32, capacity: usize) -> SphereSweep {
        SphereSweep {
            origin,
            radius: 0.5,
            direction,
            distance,
            mask: COLLISION_LAYER_TARGETS,
            exclude: None,
            capacity,
        }
    }

    #[test]
    fn test_disabled_proxy_is_skipped() {
        let mut proxy = SpatialProxy::sphere(0.5, COLLISION_LAYER_TARGETS);
        let transform = Transform::from_xyz(1.0, 0.0, 0.0);
        assert!(ProxyEntry::from_components(entity(1), &transform, &proxy).is_some());

        proxy.enabled = false;
        assert!(ProxyEntry::from_components(entity(1), &transform, &proxy).is_none());
    }

    #[test]
    fn test_overlap_filters_by_mask_and_sorts_by_distance() {
        let set = ProxySet {
            entries: vec![
                sphere_at(1, Vec3::new(6.0, 0.0, 0.0), 0.5, COLLISION_LAYER_TARGETS),
                sphere_at(2, Vec3::new(2.0, 0.0, 0.0), 0.5, COLLISION_LAYER_TARGETS),
                sphere_at(3, Vec3::new(1.0, 0.0, 0.0), 0.5, COLLISION_LAYER_ENEMIES),
                sphere_at(4, Vec3::new(20.0, 0.0, 0.0), 0.5, COLLISION_LAYER_TARGETS),
            ],
        };

        let mut out = Vec::new();
        set.overlap_sphere(Vec3::ZERO, 10.0, COLLISION_LAYER_TARGETS, None, &mut out);
        assert_eq!(out, vec![entity(2), entity(1)]);
    }

    #[test]
    fn test_sweep_reports_contact_distance_and_point() {
        let set = ProxySet {
            entries: vec![sphere_at(1, Vec3::new(0.0, 0.0, -3.0), 0.5, COLLISION_LAYER_TARGETS)],
        };

        let mut out = Vec::new();
        set.sweep_sphere(&sweep(Vec3::ZERO, Vec3::NEG_Z, 5.0, 10), &mut out);

        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].distance, 2.0, epsilon = 1e-5);
        assert_relative_eq!(out[0].point.z, -2.5, epsilon = 1e-5);
        assert_relative_eq!(out[0].normal.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sweep_too_short_misses() {
        let set = ProxySet {
            entries: vec![sphere_at(1, Vec3::new(0.0, 0.0, -3.0), 0.5, COLLISION_LAYER_TARGETS)],
        };

        let mut out = Vec::new();
        set.sweep_sphere(&sweep(Vec3::ZERO, Vec3::NEG_Z, 1.0, 10), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_zero_distance_sweep_reports_initial_overlap() {
        let set = ProxySet {
            entries: vec![sphere_at(1, Vec3::new(0.0, 0.0, -0.6), 0.5, COLLISION_LAYER_TARGETS)],
        };

        let mut out = Vec::new();
        set.sweep_sphere(&sweep(Vec3::ZERO, Vec3::NEG_Z, 0.0, 10), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].distance, 0.0);
    }

    #[test]
    fn test_sweep_capacity_drops_excess() {
        let entries = (0..15)
            .map(|i| sphere_at(i, Vec3::new(0.0, 0.0, -1.0 - i as f32 * 0.1), 0.5, COLLISION_LAYER_TARGETS))
            .collect();
        let set = ProxySet { entries };

        let mut out = Vec::new();
        set.sweep_sphere(&sweep(Vec3::ZERO, Vec3::NEG_Z, 10.0, 10), &mut out);
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].entity, entity(0));
    }

    #[test]
    fn test_sweep_excludes_self() {
        let mut sweep = sweep(Vec3::ZERO, Vec3::NEG_Z, 1.0, 10);
        sweep.exclude = Some(entity(7));
        let set = ProxySet {
            entries: vec![sphere_at(7, Vec3::ZERO, 0.5, COLLISION_LAYER_TARGETS)],
        };

        let mut out = Vec::new();
        set.sweep_sphere(&sweep, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sightline_blocked_by_wall() {
        let target = sphere_at(1, Vec3::new(0.0, 0.0, -8.0), 0.5, COLLISION_LAYER_TARGETS);
        let wall = wall_at(2, Vec3::new(0.0, 0.0, -4.0), Vec3::new(2.0, 2.0, 0.2));

        let open = ProxySet { entries: vec![target] };
        let blocked = ProxySet { entries: vec![target, wall] };

        let hit = open
            .sightline(Vec3::ZERO, Vec3::NEG_Z, 10.0, COLLISION_MASK_SIGHTLINE, None)
            .expect("clear sightline");
        assert_eq!(hit.entity, entity(1));

        let hit = blocked
            .sightline(Vec3::ZERO, Vec3::NEG_Z, 10.0, COLLISION_MASK_SIGHTLINE, None)
            .expect("wall hit");
        assert_eq!(hit.entity, entity(2));
        assert_relative_eq!(hit.distance, 3.8, epsilon = 1e-5);
    }

    #[test]
    fn test_sightline_respects_max_distance() {
        let set = ProxySet {
            entries: vec![sphere_at(1, Vec3::new(0.0, 0.0, -12.0), 0.5, COLLISION_LAYER_TARGETS)],
        };
        assert!(set
            .sightline(Vec3::ZERO, Vec3::NEG_Z, 10.0, COLLISION_LAYER_TARGETS, None)
            .is_none());
    }

    #[test]
    fn test_cuboid_ray_entry_parallel_outside_slab() {
        let shape = ProxyShape::Cuboid {
            half_extents: Vec3::ONE,
        };
        assert!(shape
            .ray_entry(Vec3::ZERO, Vec3::new(0.0, 5.0, 5.0), Vec3::NEG_Z, 0.0)
            .is_none());
        assert_eq!(shape.ray_entry(Vec3::ZERO, Vec3::ZERO, Vec3::NEG_Z, 0.0), Some(0.0));
    }
}

//! Spatial queries: overlap, sphere sweep, sightline.
//!
//! Геометрия мира скрыта за `SpatialQuery`. Два backend'а:
//! - `proxy`: brute-force по `SpatialProxy` компонентам (headless, тесты)
//! - `rapier`: query pipeline bevy_rapier3d
//!
//! Системы берут `SpatialQueries` (SystemParam), выбор backend'а через
//! `EnemyAiSettings::spatial_backend`.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::ReadRapierContext;
use serde::{Deserialize, Serialize};

pub mod layers;
pub mod proxy;
pub mod rapier;

pub use layers::*;
pub use proxy::{ProxyEntry, ProxySet, ProxyShape, SpatialProxy};
pub use rapier::RapierSpatial;

use crate::settings::EnemyAiSettings;

/// Попадание sphere sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub entity: Entity,
    /// Пройденное сферой расстояние до контакта (0 = пересекались с самого начала)
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Первая поверхность на луче
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightlineHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Параметры sphere sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSweep {
    pub origin: Vec3,
    pub radius: f32,
    pub direction: Vec3,
    /// 0 допустимо: только пересечения в стартовой позиции
    pub distance: f32,
    pub mask: u32,
    pub exclude: Option<Entity>,
    /// Лишние попадания отбрасываются молча
    pub capacity: usize,
}

/// Узкий интерфейс к геометрии мира
pub trait SpatialQuery {
    /// Все сущности слоёв `mask`, пересекающие шар
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32, exclude: Option<Entity>, out: &mut Vec<Entity>);

    /// Sphere sweep, не больше `sweep.capacity` результатов, порядок задаёт backend
    fn sweep_sphere(&self, sweep: &SphereSweep, out: &mut Vec<SweepHit>);

    /// Первая поверхность слоёв `mask` вдоль `direction` в пределах `max_distance`
    fn sightline(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<SightlineHit>;
}

/// Какой backend отвечает на запросы
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum SpatialBackend {
    #[default]
    Proxy,
    Rapier,
}

/// SystemParam: spatial queries через выбранный backend
#[derive(SystemParam)]
pub struct SpatialQueries<'w, 's> {
    settings: Res<'w, EnemyAiSettings>,
    proxies: Query<'w, 's, (Entity, &'static Transform, &'static SpatialProxy)>,
    rapier: ReadRapierContext<'w, 's>,
}

impl SpatialQueries<'_, '_> {
    fn proxy_entries(&self) -> impl Iterator<Item = ProxyEntry> + '_ {
        self.proxies
            .iter()
            .filter_map(|(entity, transform, proxy)| ProxyEntry::from_components(entity, transform, proxy))
    }

    /// Запрос к rapier; без RapierContext (плагин не подключён): пустой результат
    fn with_rapier<R>(&self, query: impl FnOnce(&RapierSpatial) -> R) -> Option<R> {
        let Ok(context) = self.rapier.single() else {
            crate::logger::log_warning("SpatialQueries: Rapier backend selected but no RapierContext found");
            return None;
        };
        Some(query(&RapierSpatial { context: &context }))
    }
}

impl SpatialQuery for SpatialQueries<'_, '_> {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32, exclude: Option<Entity>, out: &mut Vec<Entity>) {
        match self.settings.spatial_backend {
            SpatialBackend::Proxy => proxy::overlap_sphere(self.proxy_entries(), center, radius, mask, exclude, out),
            SpatialBackend::Rapier => {
                self.with_rapier(|rapier| rapier.overlap_sphere(center, radius, mask, exclude, out));
            }
        }
    }

    fn sweep_sphere(&self, sweep: &SphereSweep, out: &mut Vec<SweepHit>) {
        match self.settings.spatial_backend {
            SpatialBackend::Proxy => proxy::sweep_sphere(self.proxy_entries(), sweep, out),
            SpatialBackend::Rapier => {
                self.with_rapier(|rapier| rapier.sweep_sphere(sweep, out));
            }
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
        match self.settings.spatial_backend {
            SpatialBackend::Proxy => {
                proxy::sightline(self.proxy_entries(), origin, direction, max_distance, mask, exclude)
            }
            SpatialBackend::Rapier => self
                .with_rapier(|rapier| rapier.sightline(origin, direction, max_distance, mask, exclude))
                .flatten(),
        }
    }
}

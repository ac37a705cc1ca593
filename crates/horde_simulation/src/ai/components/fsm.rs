//! Enemy AI components (state machine, target, configs, perception task).

use bevy::prelude::*;

use crate::components::Health;
use crate::spatial::{COLLISION_MASK_ENEMY_TARGETS, COLLISION_MASK_SIGHTLINE};

/// Состояние врага
///
/// Patrol → Tracking → AttackBegin → Attacking → (Tracking | Patrol).
/// Dead: терминальное, из него переходов нет.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Бродим по случайным точкам, ищем цель
    #[default]
    Patrol,
    /// Бежим к цели на run speed
    Tracking,
    /// Замах: навигация остановлена, ждём EnableAttack от анимации
    AttackBegin,
    /// Активное окно удара, sweep каждый physics тик
    Attacking,
    Dead,
}

impl EnemyState {
    /// AttackBegin или Attacking (ориентация на цель, навигация стоит)
    pub fn is_attacking(&self) -> bool {
        matches!(self, EnemyState::AttackBegin | EnemyState::Attacking)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, EnemyState::Dead)
    }
}

/// Текущая цель (слабая ссылка).
///
/// Валидность не кэшируется: каждое чтение проверяет, что сущность жива
/// (despawned / без Health / dead → цели нет).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyTarget {
    pub entity: Option<Entity>,
}

impl EnemyTarget {
    /// Живая цель или None
    pub fn resolve(&self, healths: &Query<&Health>) -> Option<Entity> {
        self.entity
            .filter(|&target| healths.get(target).is_ok_and(Health::is_alive))
    }

    pub fn has_target(&self, healths: &Query<&Health>) -> bool {
        self.resolve(healths).is_some()
    }

    pub fn set(&mut self, target: Entity) {
        self.entity = Some(target);
    }

    pub fn clear(&mut self) {
        self.entity = None;
    }
}

/// Параметры зрения
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PerceptionConfig {
    /// Полный угол обзора (градусы), симметрично вокруг forward
    pub fov_degrees: f32,
    pub view_distance: f32,
    /// Глаза относительно Transform агента (local space)
    pub eye_offset: Vec3,
    pub eye_rotation: Quat,
    /// Слои, которые агент преследует
    pub target_mask: u32,
    /// Слои, которые участвуют в sightline (цели + препятствия)
    pub sightline_mask: u32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            view_distance: 10.0,
            eye_offset: Vec3::new(0.0, 1.6, 0.0),
            eye_rotation: Quat::IDENTITY,
            target_mask: COLLISION_MASK_ENEMY_TARGETS,
            sightline_mask: COLLISION_MASK_SIGHTLINE,
        }
    }
}

impl PerceptionConfig {
    /// (позиция глаз, forward глаз) в world space
    pub fn eye(&self, transform: &Transform) -> (Vec3, Vec3) {
        let origin = transform.transform_point(self.eye_offset);
        let forward = (transform.rotation * self.eye_rotation) * Vec3::NEG_Z;
        (origin, forward)
    }
}

/// Скорости и сглаживание поворота
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementConfig {
    pub run_speed: f32,
    pub patrol_speed: f32,
    /// Секунды, 0.01..=2.0
    pub turn_smooth_time: f32,
    /// Радиус выбора случайной patrol точки
    pub patrol_radius: f32,
    /// remaining_distance, при котором выбирается следующая patrol точка
    pub patrol_arrival_threshold: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            run_speed: 10.0,
            patrol_speed: 3.0,
            turn_smooth_time: 0.1,
            patrol_radius: 20.0,
            patrol_arrival_threshold: 1.0,
        }
    }
}

impl MovementConfig {
    pub const MIN_TURN_SMOOTH_TIME: f32 = 0.01;
    pub const MAX_TURN_SMOOTH_TIME: f32 = 2.0;

    pub fn with_turn_smooth_time(mut self, seconds: f32) -> Self {
        self.turn_smooth_time = seconds.clamp(Self::MIN_TURN_SMOOTH_TIME, Self::MAX_TURN_SMOOTH_TIME);
        self
    }
}

/// Скорость поворота для smooth damp (состояние между тиками)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TurnSmoothing {
    /// рад/сек
    pub velocity: f32,
}

/// Periodic perception task.
///
/// Countdown тикается FixedUpdate'ом; первая итерация на первом тике после
/// спавна. Останавливается только смертью агента.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PerceptionTask {
    /// Секунды до следующей итерации
    pub countdown: f32,
}

impl PerceptionTask {
    /// Float погрешность суммы fixed delta'ов (3 × 1/60 ≠ 0.05 ровно)
    const DEADLINE_TOLERANCE: f32 = 1e-4;

    /// Тикает countdown. `true`, если пора выполнять итерацию.
    ///
    /// На сработавшем тике countdown = period (delta не вычитается),
    /// пропущенные периоды не догоняются.
    pub fn tick(&mut self, delta: f32, period: f32) -> bool {
        self.countdown -= delta;
        if self.countdown > Self::DEADLINE_TOLERANCE {
            return false;
        }
        self.countdown = period;
        true
    }
}

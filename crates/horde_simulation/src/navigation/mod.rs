//! Navigation provider (headless).
//!
//! `NavigationAgent`: контракт, через который AI управляет движением:
//! destination, speed, is_stopped, enabled. Обратно AI читает
//! remaining_distance, velocity, desired_velocity.
//!
//! `steer_navigation_agents`: простой driver по прямой без pathfinding.
//! В игре его заменяет настоящий navmesh агент, который пишет те же поля.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::yaw_towards;
use crate::SimulationSet;

const ARRIVAL_EPSILON: f32 = 1e-4;

/// Navigation Plugin
///
/// `steer_navigation_agents` в FixedUpdate, между решениями AI и combat.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, steer_navigation_agents.in_set(SimulationSet::Navigation));
    }
}

/// Состояние навигационного агента
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    pub destination: Option<Vec3>,
    /// Максимальная скорость (м/с)
    pub speed: f32,
    pub is_stopped: bool,
    /// Агент останавливается на этом расстоянии от destination
    pub stopping_distance: f32,
    /// Радиус тела агента
    pub radius: f32,
    /// false после смерти, агент больше не двигается
    pub enabled: bool,
    /// Фактическая скорость за последний тик
    pub velocity: Vec3,
    /// Скорость, с которой агент хотел бы двигаться (для анимации)
    pub desired_velocity: Vec3,
    /// 0 без destination
    pub remaining_distance: f32,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl NavigationAgent {
    pub fn new(radius: f32) -> Self {
        Self {
            destination: None,
            speed: 3.5,
            is_stopped: false,
            stopping_distance: 0.0,
            radius,
            enabled: true,
            velocity: Vec3::ZERO,
            desired_velocity: Vec3::ZERO,
            remaining_distance: 0.0,
        }
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    /// Полное выключение (смерть)
    pub fn disable(&mut self) {
        self.enabled = false;
        self.is_stopped = true;
        self.destination = None;
        self.velocity = Vec3::ZERO;
        self.desired_velocity = Vec3::ZERO;
    }
}

/// Walkable область (XZ прямоугольник) для выбора patrol точек
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct WalkableArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl WalkableArea {
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

/// Случайная достижимая точка в радиусе `radius` от `center`.
///
/// С `WalkableArea` точка притягивается к ближайшей walkable; если та
/// дальше `radius` от выбранной, точки нет (`None`).
pub fn sample_patrol_point(
    rng: &mut impl Rng,
    center: Vec3,
    radius: f32,
    area: Option<&WalkableArea>,
) -> Option<Vec3> {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = radius * rng.gen::<f32>().sqrt();
    let sample = center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);

    let Some(area) = area else {
        return Some(sample);
    };

    let walkable = area.clamp(sample);
    (walkable.distance(sample) <= radius).then_some(walkable)
}

/// Система: движение агентов по прямой к destination
///
/// Обновляет remaining_distance / velocity / desired_velocity каждый тик.
/// Остановленный агент стоит, но desired_velocity продолжает считаться.
pub fn steer_navigation_agents(
    mut agents: Query<(&mut Transform, &mut NavigationAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in agents.iter_mut() {
        if !agent.enabled {
            agent.velocity = Vec3::ZERO;
            agent.desired_velocity = Vec3::ZERO;
            continue;
        }

        let Some(destination) = agent.destination else {
            agent.velocity = Vec3::ZERO;
            agent.desired_velocity = Vec3::ZERO;
            agent.remaining_distance = 0.0;
            continue;
        };

        let to_destination = Vec3::new(
            destination.x - transform.translation.x,
            0.0,
            destination.z - transform.translation.z,
        );
        let distance = to_destination.length();
        agent.remaining_distance = distance;

        let travel = distance - agent.stopping_distance;
        if travel <= ARRIVAL_EPSILON {
            agent.velocity = Vec3::ZERO;
            agent.desired_velocity = Vec3::ZERO;
            continue;
        }

        let direction = to_destination / distance;
        agent.desired_velocity = direction * agent.speed;

        if agent.is_stopped || delta <= 0.0 {
            agent.velocity = Vec3::ZERO;
            continue;
        }

        let step = (agent.speed * delta).min(travel);
        transform.translation += direction * step;
        agent.velocity = direction * (step / delta);
        agent.remaining_distance = distance - step;

        if let Some(yaw) = yaw_towards(direction) {
            transform.rotation = Quat::from_rotation_y(yaw);
        }
    }
}

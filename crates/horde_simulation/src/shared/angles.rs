//! Yaw / angle math.
//!
//! Bevy forward = -Z, yaw = поворот вокруг +Y (радианы).

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Минимальное smoothing time (деление на ноль в omega)
const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Yaw (радианы) текущего rotation
pub fn yaw_of(rotation: Quat) -> f32 {
    rotation.to_euler(EulerRot::YXZ).0
}

/// Yaw, при котором forward (-Z) смотрит вдоль горизонтальной проекции `direction`.
///
/// `None` для (почти) вертикального / нулевого вектора.
pub fn yaw_towards(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(f32::atan2(-flat.x, -flat.z))
}

/// Кратчайшая разница углов `target - current`, результат в (-PI, PI]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    delta
}

/// Critically damped smoothing угла (без overshoot).
///
/// `velocity`: состояние между вызовами (рад/сек), хранится у вызывающего.
/// Всегда берёт кратчайшую дугу к `target`.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    delta: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, delta)
}

/// Critically damped spring (аппроксимация exp через полином).
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    if delta <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * exp;

    let mut output = target + (change + temp) * exp;

    // Не проскакиваем цель
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / delta;
    }

    output
}

/// Угол между векторами в градусах (0 для нулевых векторов)
pub fn angle_between_degrees(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Field-of-view test: строго меньше половины угла обзора.
pub fn within_field_of_view(forward: Vec3, to_target: Vec3, fov_degrees: f32) -> bool {
    angle_between_degrees(forward, to_target) < fov_degrees * 0.5
}

/// Расстояние в горизонтальной плоскости (XZ)
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

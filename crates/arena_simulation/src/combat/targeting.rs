//! Геометрия попаданий: конус, круг, ближайший враг

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Знаковая разница углов `a - b`, нормализованная в (−π, π]
pub fn signed_angle_diff(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Точка внутри круга радиуса `radius` (граница включительно)
pub fn in_radius(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance(point) <= radius
}

/// Точка внутри конуса: дистанция ≤ range и |угол − facing| ≤ angle/2.
///
/// Точка в самой вершине конуса считается попаданием.
pub fn in_cone(origin: Vec2, facing: f32, angle: f32, range: f32, point: Vec2) -> bool {
    if !in_radius(origin, range, point) {
        return false;
    }
    let offset = point - origin;
    if offset.length_squared() <= f32::EPSILON {
        return true;
    }
    let bearing = offset.y.atan2(offset.x);
    signed_angle_diff(bearing, facing).abs() <= angle * 0.5
}

/// Ближайший кандидат в пределах `max_distance` (ничья → первый по порядку)
pub fn nearest_within(
    origin: Vec2,
    max_distance: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec2)>,
) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, position) in candidates {
        let distance = origin.distance(position);
        if distance > max_distance {
            continue;
        }
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((entity, distance)),
        }
    }
    best.map(|(entity, _)| entity)
}

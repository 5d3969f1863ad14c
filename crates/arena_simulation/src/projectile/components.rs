//! Projectile components
//!
//! Снаряд летит по прямой к точке, зафиксированной при спавне (без homing).
//! Живёт пока не попал во врага или не вылетел за пределы поля.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Position;

/// Что происходит при попадании
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum OnHit {
    /// Урон одной цели, снаряд исчезает
    Single,
    /// Урон цели + splash всем живым врагам в радиусе взрыва
    Explode { radius: f32, splash_factor: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum ProjectileKind {
    /// Авто-атака Wizard
    Magic,
    FireBolt,
    Fireball,
}

/// Таблица параметров по типу снаряда
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub radius: f32,
    pub on_hit: OnHit,
    /// Разброс точки прицеливания (±px по каждой оси)
    pub jitter: f32,
}

impl ProjectileKind {
    pub fn tuning(&self) -> ProjectileTuning {
        match self {
            ProjectileKind::Magic => ProjectileTuning {
                speed: 300.0,
                radius: 3.0,
                on_hit: OnHit::Single,
                jitter: 0.0,
            },
            ProjectileKind::FireBolt => ProjectileTuning {
                speed: 400.0,
                radius: 3.0,
                on_hit: OnHit::Single,
                jitter: 15.0,
            },
            ProjectileKind::Fireball => ProjectileTuning {
                speed: 250.0,
                radius: 8.0,
                on_hit: OnHit::Explode {
                    radius: 50.0,
                    splash_factor: 0.5,
                },
                jitter: 0.0,
            },
        }
    }
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub owner: Entity,
    pub kind: ProjectileKind,
    pub origin: Vec2,
    pub target_point: Vec2,
    /// Единичный вектор
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub on_hit: OnHit,
    /// Попал или вылетел: больше не сталкивается, удаляется на compaction
    pub expired: bool,
}

impl Projectile {
    /// Снаряд от `origin` к `target_point`.
    ///
    /// Если точки совпадают, летим по направлению взгляда владельца.
    pub fn new(
        owner: Entity,
        kind: ProjectileKind,
        origin: Vec2,
        target_point: Vec2,
        fallback_facing: f32,
        damage: f32,
    ) -> Self {
        let tuning = kind.tuning();
        let direction = (target_point - origin)
            .try_normalize()
            .unwrap_or_else(|| Vec2::from_angle(fallback_facing));

        Self {
            owner,
            kind,
            origin,
            target_point,
            direction,
            speed: tuning.speed,
            damage: crate::components::sanitize_amount(damage),
            radius: tuning.radius,
            on_hit: tuning.on_hit,
            expired: false,
        }
    }
}

/// Границы игрового поля [0, width] × [0, height]
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Playfield {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Спавнит снаряд (через Commands, появится после sync point)
pub fn spawn_projectile(
    commands: &mut Commands,
    owner: Entity,
    kind: ProjectileKind,
    origin: Vec2,
    target_point: Vec2,
    fallback_facing: f32,
    damage: f32,
) -> Entity {
    let projectile = Projectile::new(owner, kind, origin, target_point, fallback_facing, damage);
    commands.spawn((Position(origin), projectile)).id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_unit_towards_target() {
        let projectile = Projectile::new(
            Entity::from_raw(1),
            ProjectileKind::Magic,
            Vec2::ZERO,
            Vec2::new(30.0, 40.0),
            0.0,
            40.0,
        );
        assert!((projectile.direction - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert_eq!(projectile.speed, 300.0);
    }

    #[test]
    fn test_zero_aim_falls_back_to_facing() {
        let projectile = Projectile::new(
            Entity::from_raw(1),
            ProjectileKind::FireBolt,
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 10.0),
            std::f32::consts::FRAC_PI_2,
            28.0,
        );
        assert!((projectile.direction - Vec2::Y).length() < 1e-6);
        assert!(projectile.direction.is_finite());
    }

    #[test]
    fn test_playfield_contains_edges() {
        let field = Playfield::default();
        assert!(field.contains(Vec2::new(0.0, 0.0)));
        assert!(field.contains(Vec2::new(800.0, 600.0)));
        assert!(!field.contains(Vec2::new(800.1, 300.0)));
        assert!(!field.contains(Vec2::new(400.0, -0.1)));
    }
}

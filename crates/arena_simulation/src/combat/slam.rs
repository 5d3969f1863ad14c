//! High Orc ground slam
//!
//! Когда цель босса в радиусе 2 × attack range, slam бьёт всех ДРУГИХ живых
//! врагов в этом радиусе на 0.5 × base damage. Игрок получает урон только
//! от обычной атаки босса.

use bevy::prelude::*;

use crate::combat::damage::apply_damage;
use crate::combat::targeting::in_radius;
use crate::combat::Attacker;
use crate::components::{CombatTarget, Enemy, Health, LastHitBy, Position};
use crate::events::{AreaShape, EventLog, GameEvent};

/// Множитель урона slam от base damage
pub const SLAM_DAMAGE_FACTOR: f32 = 0.5;

/// Множитель радиуса slam от attack range
pub const SLAM_RANGE_FACTOR: f32 = 2.0;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct GroundSlam {
    pub cooldown: f32,
    pub timer: f32,
}

impl Default for GroundSlam {
    fn default() -> Self {
        Self {
            cooldown: 5.0,
            timer: 0.0,
        }
    }
}

/// System: ground slam (после обычной атаки врагов)
///
/// Пока таймер > 0 он только уменьшается, slam в этом тике не проверяется.
pub fn ground_slam(
    time: Res<Time>,
    mut log: ResMut<EventLog>,
    mut slammers: Query<(Entity, &Position, &Attacker, &CombatTarget, &mut GroundSlam)>,
    mut victims: Query<(Entity, &Position, &mut Health, &mut LastHitBy), With<Enemy>>,
    targets: Query<(&Position, &Health), Without<Enemy>>,
) {
    let delta = time.delta_secs();

    for (slammer, position, attacker, target, mut slam) in slammers.iter_mut() {
        let slammer_alive = victims
            .get(slammer)
            .is_ok_and(|(_, _, health, _)| health.is_alive());
        if !slammer_alive {
            continue;
        }

        if slam.timer > 0.0 {
            slam.timer = (slam.timer - delta).max(0.0);
            continue;
        }

        let radius = attacker.attack_range * SLAM_RANGE_FACTOR;
        let target_in_range = target
            .0
            .and_then(|target| targets.get(target).ok())
            .is_some_and(|(target_position, target_health)| {
                target_health.is_alive() && in_radius(position.0, radius, target_position.0)
            });
        if !target_in_range {
            continue;
        }

        let damage = attacker.base_damage * SLAM_DAMAGE_FACTOR;
        for (victim, victim_position, mut health, mut last_hit) in victims.iter_mut() {
            if victim == slammer || !health.is_alive() {
                continue;
            }
            if !in_radius(position.0, radius, victim_position.0) {
                continue;
            }
            apply_damage(
                &mut log,
                Some(slammer),
                victim,
                victim_position.0,
                &mut health,
                &mut last_hit,
                damage,
            );
        }

        log.push(GameEvent::AreaHit {
            center: position.0,
            radius,
            shape: AreaShape::Circle,
        });
        crate::log(&format!("🌋 High Orc {:?} ground slam (radius {})", slammer, radius));

        slam.timer = slam.cooldown;
    }
}

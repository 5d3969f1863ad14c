//! Projectile systems: полёт, столкновения, уборка

use bevy::prelude::*;

use crate::combat::{apply_damage, in_radius};
use crate::components::{Body, Enemy, Health, LastHitBy, Position};
use crate::events::{AreaShape, EventLog, GameEvent};
use crate::projectile::{OnHit, Playfield, Projectile};

/// System: двигаем снаряды, вылет за поле → expired
pub fn advance_projectiles(
    time: Res<Time>,
    playfield: Res<Playfield>,
    mut projectiles: Query<(&mut Position, &mut Projectile)>,
) {
    let delta = time.delta_secs();

    for (mut position, mut projectile) in projectiles.iter_mut() {
        if projectile.expired {
            continue;
        }
        position.0 += projectile.direction * projectile.speed * delta;
        if !playfield.contains(position.0) {
            projectile.expired = true;
        }
    }
}

/// System: столкновения снарядов с живыми врагами
///
/// Попадание = дистанция центров ≤ сумма радиусов. Снаряд бьёт ближайшего
/// из пересекающихся врагов и сразу становится expired (один hit на снаряд).
/// Explode дополнительно наносит splash всем живым врагам в радиусе взрыва.
pub fn resolve_projectile_collisions(
    mut log: ResMut<EventLog>,
    mut projectiles: Query<(&Position, &mut Projectile), Without<Enemy>>,
    mut enemies: Query<(Entity, &Position, &Body, &mut Health, &mut LastHitBy), With<Enemy>>,
) {
    for (projectile_position, mut projectile) in projectiles.iter_mut() {
        if projectile.expired {
            continue;
        }

        let mut struck: Option<(Entity, f32)> = None;
        for (enemy, enemy_position, body, health, _) in enemies.iter() {
            if !health.is_alive() {
                continue;
            }
            let distance = projectile_position.0.distance(enemy_position.0);
            if distance > body.radius + projectile.radius {
                continue;
            }
            if struck.is_none_or(|(_, best)| distance < best) {
                struck = Some((enemy, distance));
            }
        }
        let Some((target, _)) = struck else {
            continue;
        };

        projectile.expired = true;
        let owner = Some(projectile.owner);

        if let Ok((_, position, _, mut health, mut last_hit)) = enemies.get_mut(target) {
            apply_damage(
                &mut log,
                owner,
                target,
                position.0,
                &mut health,
                &mut last_hit,
                projectile.damage,
            );
        }

        if let OnHit::Explode {
            radius,
            splash_factor,
        } = projectile.on_hit
        {
            let center = projectile_position.0;
            let splash = projectile.damage * splash_factor;
            for (enemy, position, _, mut health, mut last_hit) in enemies.iter_mut() {
                if !health.is_alive() || !in_radius(center, radius, position.0) {
                    continue;
                }
                apply_damage(
                    &mut log,
                    owner,
                    enemy,
                    position.0,
                    &mut health,
                    &mut last_hit,
                    splash,
                );
            }
            log.push(GameEvent::AreaHit {
                center,
                radius,
                shape: AreaShape::Circle,
            });
            crate::log(&format!("💥 {:?} exploded at {:?}", projectile.kind, center));
        }
    }
}

/// System (compaction): удаляем expired снаряды
pub fn despawn_expired_projectiles(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile)>,
) {
    for (entity, projectile) in projectiles.iter() {
        if projectile.expired {
            commands.entity(entity).despawn();
        }
    }
}

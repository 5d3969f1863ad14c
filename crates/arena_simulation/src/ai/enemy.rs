//! Enemy AI: aggro на игрока, сближение, ближняя атака
//!
//! FSM здесь вырожденный: цель есть и далеко → идём, в радиусе → бьём.

use bevy::prelude::*;

use crate::combat::{apply_damage, Attacker};
use crate::components::{
    angle_towards, CombatTarget, Enemy, Facing, Health, LastHitBy, MovementCommand, Player,
    Position, ARRIVAL_EPSILON,
};
use crate::events::EventLog;

/// System: цель врага = живой игрок (мертвая/пропавшая цель сбрасывается)
pub fn acquire_enemy_targets(
    mut enemies: Query<(&Health, &mut CombatTarget), (With<Enemy>, Without<Player>)>,
    players: Query<(Entity, &Health), (With<Player>, Without<Enemy>)>,
) {
    let live_player = players
        .iter()
        .find(|(_, health)| health.is_alive())
        .map(|(entity, _)| entity);

    for (health, mut target) in enemies.iter_mut() {
        if !health.is_alive() {
            continue;
        }
        let target_alive = target
            .0
            .and_then(|current| players.get(current).ok())
            .is_some_and(|(_, target_health)| target_health.is_alive());
        if !target_alive {
            target.0 = live_player;
        }
    }
}

/// Точка на линии враг → цель, откуда цель уже в радиусе атаки.
///
/// Запас ARRIVAL_EPSILON: остановка "в пределах epsilon" всё ещё в радиусе.
fn approach_point(position: Vec2, target: Vec2, attack_range: f32) -> Vec2 {
    let stop_distance = (attack_range - ARRIVAL_EPSILON).max(0.0);
    match (position - target).try_normalize() {
        Some(away) => target + away * stop_distance,
        None => target,
    }
}

/// System: вне радиуса атаки → MoveToPosition к цели, иначе стоим
pub fn enemy_seek(
    mut enemies: Query<
        (&Position, &Health, &Attacker, &CombatTarget, &mut MovementCommand),
        (With<Enemy>, Without<Player>),
    >,
    targets: Query<&Position, (With<Player>, Without<Enemy>)>,
) {
    for (position, health, attacker, target, mut command) in enemies.iter_mut() {
        if !health.is_alive() {
            continue;
        }
        let target_position = target.0.and_then(|target| targets.get(target).ok());

        *command = match target_position {
            Some(target_position) if !attacker.in_range(position.0.distance(target_position.0)) => {
                MovementCommand::MoveToPosition {
                    target: approach_point(position.0, target_position.0, attacker.attack_range),
                }
            }
            _ => MovementCommand::Idle,
        };
    }
}

/// System: ближняя атака врага по цели в радиусе
pub fn enemy_attack(
    mut log: ResMut<EventLog>,
    mut enemies: Query<
        (Entity, &Position, &Health, &CombatTarget, &mut Attacker, &mut Facing),
        (With<Enemy>, Without<Player>),
    >,
    mut players: Query<(&Position, &mut Health, &mut LastHitBy), (With<Player>, Without<Enemy>)>,
) {
    for (enemy, position, health, target, mut attacker, mut facing) in enemies.iter_mut() {
        if !health.is_alive() {
            continue;
        }
        let Some(target) = target.0 else {
            continue;
        };
        let Ok((target_position, mut target_health, mut last_hit)) = players.get_mut(target) else {
            continue;
        };
        if !target_health.is_alive() {
            continue;
        }

        if !attacker.try_attack(position.0.distance(target_position.0)) {
            continue;
        }
        if let Some(angle) = angle_towards(position.0, target_position.0) {
            facing.0 = angle;
        }

        let killed = apply_damage(
            &mut log,
            Some(enemy),
            target,
            target_position.0,
            &mut target_health,
            &mut last_hit,
            attacker.base_damage,
        );
        if killed {
            crate::log_warning(&format!("☠️ Player {:?} was slain by {:?}", target, enemy));
        }
    }
}

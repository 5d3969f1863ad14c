//! Применение урона, смерть и начисление опыта за убийство
//!
//! Урон применяется синхронно там, где он возникает (атака, скилл, снаряд),
//! через один helper `apply_damage`, чтобы DamageDealt/Died/LastHitBy
//! обрабатывались одинаково.

use bevy::prelude::*;

use crate::combat::Attacker;
use crate::components::{
    sanitize_amount, Enemy, Health, LastHitBy, Player, Position, Progression, SkillPoints,
};
use crate::events::{EventLog, GameEvent};

/// Наносит урон цели и пишет события.
///
/// - мертвая цель: no-op (stale reference, без событий)
/// - отрицательный урон считается нулём
/// - переход в 0 hp → Died (ровно один раз)
///
/// Возвращает true если этот удар убил цель.
pub fn apply_damage(
    log: &mut EventLog,
    attacker: Option<Entity>,
    target: Entity,
    position: Vec2,
    health: &mut Health,
    last_hit: &mut LastHitBy,
    amount: f32,
) -> bool {
    if !health.is_alive() {
        return false;
    }

    let amount = sanitize_amount(amount);
    if attacker.is_some() {
        last_hit.0 = attacker;
    }
    let died = health.take_damage(amount);

    log.push(GameEvent::DamageDealt {
        attacker,
        target,
        amount,
        position,
    });

    if died {
        log.push(GameEvent::Died {
            entity: target,
            killer: last_hit.0,
            position,
        });
        crate::log_info(&format!(
            "💀 Entity {:?} killed by {:?}",
            target, last_hit.0
        ));
    }

    died
}

/// Лечение с событием Healed (0 hp / отрицательный хил, no-op)
pub fn apply_heal(
    log: &mut EventLog,
    target: Entity,
    position: Vec2,
    health: &mut Health,
    amount: f32,
) -> f32 {
    let healed = health.heal(amount);
    if healed > 0.0 {
        log.push(GameEvent::Healed {
            target,
            amount: healed,
            position,
        });
    }
    healed
}

/// Начисляет опыт и пишет ExpGained/LeveledUp события
pub fn grant_experience(
    log: &mut EventLog,
    entity: Entity,
    position: Vec2,
    amount: u32,
    progression: &mut Progression,
    health: &mut Health,
    skill_points: &mut SkillPoints,
    attacker: &mut Attacker,
) {
    log.push(GameEvent::ExpGained {
        entity,
        amount,
        position,
    });

    for level in progression.gain_exp(amount, health, skill_points, attacker) {
        log.push(GameEvent::LeveledUp {
            entity,
            level,
            position,
        });
        log.message(format!("Level up! You are now level {}!", level));
        crate::log_info(&format!("⭐ Entity {:?} reached level {}", entity, level));
    }
}

/// Система (compaction): убираем мертвых врагов и начисляем опыт убийце.
///
/// Убийца = LastHitBy, если он жив и умеет копить опыт (Progression).
/// Иначе (убил другой враг, неизвестно кто), опыт получает игрок.
pub fn award_kill_experience(
    mut commands: Commands,
    mut log: ResMut<EventLog>,
    dead: Query<(Entity, &Enemy, &Health, &LastHitBy), With<Enemy>>,
    mut recipients: Query<
        (
            Entity,
            &Position,
            &mut Progression,
            &mut Health,
            &mut SkillPoints,
            &mut Attacker,
        ),
        Without<Enemy>,
    >,
    players: Query<Entity, With<Player>>,
) {
    for (enemy_entity, enemy, health, last_hit) in dead.iter() {
        if health.is_alive() {
            continue;
        }

        let killer = last_hit.0.filter(|killer| {
            recipients
                .get(*killer)
                .is_ok_and(|(_, _, _, killer_health, _, _)| killer_health.is_alive())
        });
        let recipient = killer.or_else(|| players.iter().next());

        if let Some(recipient) = recipient {
            if let Ok((entity, position, mut progression, mut health, mut sp, mut attacker)) =
                recipients.get_mut(recipient)
            {
                if health.is_alive() {
                    grant_experience(
                        &mut log,
                        entity,
                        position.0,
                        enemy.exp_value,
                        &mut progression,
                        &mut health,
                        &mut sp,
                        &mut attacker,
                    );
                }
            }
        }

        commands.entity(enemy_entity).despawn();
    }
}

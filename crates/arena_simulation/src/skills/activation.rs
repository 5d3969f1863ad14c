//! Активация скилла: валидация, оплата, вход в каст, постановка hit'ов в расписание

use bevy::prelude::*;
use thiserror::Error;

use crate::combat::{nearest_within, Attacker};
use crate::components::{
    angle_towards, CombatTarget, Enemy, Facing, Health, MovementCommand, Position, SkillPoints,
};
use crate::events::{EventLog, GameEvent};
use crate::skills::{CastState, SkillSchedule, SkillSlots, Targeting};

/// Почему скилл не активировался. Display = текст для игрока.
///
/// Отказ ничего не меняет: SP, cooldown и каст остаются как были.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CastRejection {
    #[error("No skill in that slot!")]
    InvalidSlot,
    #[error("You are dead!")]
    CasterDead,
    #[error("Already casting a skill!")]
    AlreadyCasting,
    #[error("Skill is on cooldown!")]
    OnCooldown,
    #[error("Not enough SP!")]
    NotEnoughSp,
    #[error("No target!")]
    NoTarget,
}

/// Живой враг по Entity (stale id → None)
fn live_enemy_position(world: &World, entity: Entity) -> Option<Vec2> {
    let entity_ref = world.get_entity(entity).ok()?;
    if !entity_ref.contains::<Enemy>() {
        return None;
    }
    let health = entity_ref.get::<Health>()?;
    if !health.is_alive() {
        return None;
    }
    entity_ref.get::<Position>().map(|position| position.0)
}

/// Активирует скилл `slot` у `caster`.
///
/// `target` используется для Locked скиллов (иначе берётся текущая CombatTarget).
pub fn activate(
    world: &mut World,
    caster: Entity,
    slot: usize,
    target: Option<Entity>,
) -> Result<(), CastRejection> {
    let skill = world
        .get::<SkillSlots>(caster)
        .and_then(|slots| slots.get(slot).cloned())
        .ok_or(CastRejection::InvalidSlot)?;

    if !world.get::<Health>(caster).is_some_and(|health| health.is_alive()) {
        return Err(CastRejection::CasterDead);
    }
    if world.get::<CastState>(caster).is_some_and(|cast| cast.casting) {
        return Err(CastRejection::AlreadyCasting);
    }
    if !world.get::<SkillSlots>(caster).is_some_and(|slots| slots.is_ready(slot)) {
        return Err(CastRejection::OnCooldown);
    }
    if !world.get::<SkillPoints>(caster).is_some_and(|sp| sp.can_afford(skill.sp_cost)) {
        return Err(CastRejection::NotEnoughSp);
    }

    let caster_position = world
        .get::<Position>(caster)
        .map(|position| position.0)
        .unwrap_or_default();

    let resolved_target = match skill.targeting {
        Targeting::Locked => {
            let locked = target.or_else(|| world.get::<CombatTarget>(caster).and_then(|t| t.0));
            let locked = locked.ok_or(CastRejection::NoTarget)?;
            let position = live_enemy_position(world, locked).ok_or(CastRejection::NoTarget)?;
            Some((locked, position))
        }
        Targeting::NearestInRange => {
            let range = world
                .get::<Attacker>(caster)
                .map(|attacker| attacker.attack_range)
                .unwrap_or(0.0);
            let mut enemies = world.query_filtered::<(Entity, &Position, &Health), With<Enemy>>();
            let candidates: Vec<(Entity, Vec2)> = enemies
                .iter(world)
                .filter(|(_, _, health)| health.is_alive())
                .map(|(entity, position, _)| (entity, position.0))
                .collect();
            let nearest = nearest_within(caster_position, range, candidates)
                .ok_or(CastRejection::NoTarget)?;
            let position = live_enemy_position(world, nearest).ok_or(CastRejection::NoTarget)?;
            Some((nearest, position))
        }
        Targeting::Untargeted => None,
    };

    // Все проверки пройдены, дальше только мутации
    if let Some(mut sp) = world.get_mut::<SkillPoints>(caster) {
        sp.consume(skill.sp_cost);
    }
    if let Some(mut slots) = world.get_mut::<SkillSlots>(caster) {
        slots.start_cooldown(slot);
    }
    if let Some((_, target_position)) = resolved_target {
        if let Some(angle) = angle_towards(caster_position, target_position) {
            if let Some(mut facing) = world.get_mut::<Facing>(caster) {
                facing.0 = angle;
            }
        }
    }
    if let Some(mut cast) = world.get_mut::<CastState>(caster) {
        cast.begin(skill.cast_time);
    }
    if let Some(mut command) = world.get_mut::<MovementCommand>(caster) {
        *command = MovementCommand::Idle;
    }

    if let Some(mut log) = world.get_resource_mut::<EventLog>() {
        log.push(GameEvent::SkillCast {
            caster,
            skill: skill.name,
            position: caster_position,
        });
    }

    let target_entity = resolved_target.map(|(entity, _)| entity);
    if let Some(mut schedule) = world.get_resource_mut::<SkillSchedule>() {
        schedule.schedule_skill(caster, &skill, target_entity);
    }

    crate::log(&format!(
        "✨ {:?} casts {} (target: {:?}, cast {:.1}s)",
        caster, skill.name, target_entity, skill.cast_time
    ));

    Ok(())
}

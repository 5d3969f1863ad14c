//! Read-only снимок мира для render/UI слоя
//!
//! Entity id отдаются как `Entity::to_bits()`; снимок сериализуется через serde.

use bevy::prelude::*;
use serde::Serialize;

use crate::combat::Attacker;
use crate::components::{
    CombatTarget, Enemy, EnemyKind, Facing, Health, Player, PlayerClass, Position, Progression,
    SkillPoints,
};
use crate::projectile::{Projectile, ProjectileKind};
use crate::skills::{CastState, SkillSlots};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillView {
    pub name: &'static str,
    pub sp_cost: f32,
    pub cooldown_remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: u64,
    pub class: PlayerClass,
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub sp: f32,
    pub max_sp: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
    pub damage: f32,
    pub casting: bool,
    pub cast_progress: f32,
    pub target: Option<u64>,
    pub skills: Vec<SkillView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: u64,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: u64,
    pub kind: ProjectileKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub player: Option<PlayerView>,
    /// Отсортированы по id
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
}

type PlayerQueryData<'a> = (
    Entity,
    &'a Player,
    &'a Position,
    &'a Facing,
    &'a Health,
    &'a SkillPoints,
    &'a Progression,
    &'a Attacker,
    &'a CastState,
    &'a CombatTarget,
    &'a SkillSlots,
);

/// Собирает снимок текущего состояния
pub fn capture(world: &mut World) -> RenderSnapshot {
    let mut players = world.query::<PlayerQueryData>();
    let player = players.iter(world).next().map(|row| {
        let (
            entity,
            player,
            position,
            facing,
            health,
            sp,
            progression,
            attacker,
            cast,
            target,
            slots,
        ) = row;
        PlayerView {
            id: entity.to_bits(),
            class: player.class,
            x: position.0.x,
            y: position.0.y,
            facing: facing.0,
            hp: health.current,
            max_hp: health.max,
            sp: sp.current,
            max_sp: sp.max,
            level: progression.level,
            exp: progression.exp,
            exp_to_next_level: progression.exp_to_next_level,
            damage: attacker.base_damage,
            casting: cast.casting,
            cast_progress: cast.progress(),
            target: target.0.map(Entity::to_bits),
            skills: slots
                .skills
                .iter()
                .enumerate()
                .map(|(slot, skill)| SkillView {
                    name: skill.name,
                    sp_cost: skill.sp_cost,
                    cooldown_remaining: slots.cooldown(slot),
                })
                .collect(),
        }
    });

    let mut enemy_query = world.query::<(Entity, &Enemy, &Position, &Facing, &Health)>();
    let mut enemies: Vec<EnemyView> = enemy_query
        .iter(world)
        .filter(|(_, _, _, _, health)| health.is_alive())
        .map(|(entity, enemy, position, facing, health)| EnemyView {
            id: entity.to_bits(),
            kind: enemy.kind,
            x: position.0.x,
            y: position.0.y,
            facing: facing.0,
            hp: health.current,
            max_hp: health.max,
        })
        .collect();
    enemies.sort_by_key(|enemy| enemy.id);

    let mut projectile_query = world.query::<(Entity, &Projectile, &Position)>();
    let mut projectiles: Vec<ProjectileView> = projectile_query
        .iter(world)
        .filter(|(_, projectile, _)| !projectile.expired)
        .map(|(entity, projectile, position)| ProjectileView {
            id: entity.to_bits(),
            kind: projectile.kind,
            x: position.0.x,
            y: position.0.y,
            radius: projectile.radius,
        })
        .collect();
    projectiles.sort_by_key(|projectile| projectile.id);

    RenderSnapshot {
        player,
        enemies,
        projectiles,
    }
}

//! Per-character skill state: каст и cooldown'ы слотов

use bevy::prelude::*;

use crate::components::{Health, SkillPoints};
use crate::skills::Skill;

/// Состояние каста (Idle → Casting → Idle)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CastState {
    pub casting: bool,
    /// Сколько секунд каста осталось
    pub remaining: f32,
    /// Полная длительность текущего каста (для cast bar)
    pub total: f32,
}

impl CastState {
    pub fn begin(&mut self, cast_time: f32) {
        let cast_time = cast_time.max(0.0);
        self.casting = true;
        self.remaining = cast_time;
        self.total = cast_time;
    }

    /// Возвращает true если каст закончился в этом шаге
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.casting {
            return false;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.casting = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }

    /// Прогресс каста 0..1
    pub fn progress(&self) -> f32 {
        if !self.casting || self.total <= 0.0 {
            return 0.0;
        }
        (1.0 - self.remaining / self.total).clamp(0.0, 1.0)
    }
}

/// Скиллы игрока + оставшийся cooldown по слотам
#[derive(Component, Debug, Clone)]
pub struct SkillSlots {
    pub skills: Vec<Skill>,
    pub cooldowns: Vec<f32>,
}

impl SkillSlots {
    pub fn new(skills: Vec<Skill>) -> Self {
        let cooldowns = vec![0.0; skills.len()];
        Self { skills, cooldowns }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Skill> {
        self.skills.get(slot)
    }

    pub fn cooldown(&self, slot: usize) -> f32 {
        self.cooldowns.get(slot).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, slot: usize) -> bool {
        self.cooldown(slot) <= 0.0
    }

    pub fn start_cooldown(&mut self, slot: usize) {
        if let (Some(skill), Some(cooldown)) =
            (self.skills.get(slot), self.cooldowns.get_mut(slot))
        {
            *cooldown = skill.cooldown;
        }
    }

    /// Заменяет определение скилла в слоте, оставшийся cooldown сохраняется
    pub fn replace(&mut self, slot: usize, skill: Skill) -> bool {
        match self.skills.get_mut(slot) {
            Some(current) => {
                *current = skill;
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, delta: f32) {
        for cooldown in self.cooldowns.iter_mut() {
            *cooldown = (*cooldown - delta).max(0.0);
        }
    }
}

/// System: cooldown'ы скиллов
pub fn tick_skill_cooldowns(mut query: Query<&mut SkillSlots>, time: Res<Time>) {
    let delta = time.delta_secs();
    for mut slots in query.iter_mut() {
        slots.tick(delta);
    }
}

/// System: обновление каста
pub fn tick_cast_state(mut query: Query<(Entity, &mut CastState)>, time: Res<Time>) {
    let delta = time.delta_secs();
    for (entity, mut cast) in query.iter_mut() {
        if cast.tick(delta) {
            crate::logger::log_with_level(
                crate::logger::LogLevel::Debug,
                &format!("Entity {:?} finished casting", entity),
            );
        }
    }
}

/// System: регенерация SP (только живые)
pub fn regenerate_skill_points(mut query: Query<(&Health, &mut SkillPoints)>, time: Res<Time>) {
    let delta = time.delta_secs();
    for (health, mut sp) in query.iter_mut() {
        if health.is_alive() {
            sp.regenerate(delta);
        }
    }
}

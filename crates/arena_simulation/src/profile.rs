//! Class profiles: data-driven статы вместо иерархии Character → Knight/Wizard/Orc/HighOrc
//!
//! Профиль описывает только стартовые значения. Всё что меняется в рантайме
//! (hp, cooldown таймеры, уровень) живёт в компонентах.

use bevy::prelude::*;

use crate::combat::{AttackType, Attacker};
use crate::components::{
    Body, CombatTarget, EnemyKind, Facing, Health, LastHitBy, MovementCommand, MovementSpeed,
    PlayerClass, Position, SkillPoints,
};
use crate::skills::{self, CastState, Skill};

/// Стартовые характеристики персонажа
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProfile {
    pub max_hp: f32,
    pub max_sp: f32,
    pub base_damage: f32,
    pub attack_range: f32,
    /// Сколько секунд между атаками
    pub attack_cooldown: f32,
    /// Стартовое значение таймера (враги бьют не сразу после спавна)
    pub initial_attack_cooldown: f32,
    pub attack_type: AttackType,
    pub speed: f32,
    pub radius: f32,
}

impl CharacterProfile {
    pub fn knight() -> Self {
        Self {
            max_hp: 5000.0,
            max_sp: 500.0,
            base_damage: 70.0,
            attack_range: 60.0, // Копьё: чуть длиннее обычного melee
            attack_cooldown: 1.0,
            initial_attack_cooldown: 0.0,
            attack_type: AttackType::Melee,
            speed: 200.0,
            radius: 20.0,
        }
    }

    pub fn wizard() -> Self {
        Self {
            max_hp: 5000.0,
            max_sp: 500.0,
            base_damage: 40.0,
            attack_range: 300.0,
            attack_cooldown: 1.0,
            initial_attack_cooldown: 0.0,
            attack_type: AttackType::Ranged,
            speed: 200.0,
            radius: 20.0,
        }
    }

    pub fn orc() -> Self {
        Self {
            max_hp: 500.0,
            max_sp: 500.0,
            base_damage: 30.0,
            attack_range: 40.0,
            attack_cooldown: 2.0,
            initial_attack_cooldown: 2.0,
            attack_type: AttackType::Melee,
            speed: 37.5,
            radius: 15.0,
        }
    }

    pub fn high_orc() -> Self {
        Self {
            max_hp: 5000.0,
            max_sp: 500.0,
            base_damage: 100.0,
            attack_range: 60.0,
            attack_cooldown: 2.0,
            initial_attack_cooldown: 2.0,
            attack_type: AttackType::Melee,
            speed: 150.0,
            radius: 25.0,
        }
    }

    /// Компоненты общие для игрока и врагов
    pub fn character_bundle(&self, position: Vec2, sp_regen_rate: f32) -> impl Bundle {
        let mut skill_points = SkillPoints::new(self.max_sp);
        skill_points.regen_rate = sp_regen_rate;

        let mut attacker = Attacker::new(
            self.attack_type,
            self.base_damage,
            self.attack_range,
            self.attack_cooldown,
        );
        attacker.cooldown_timer = self.initial_attack_cooldown;

        (
            Position(position),
            Body {
                radius: self.radius,
            },
            MovementSpeed { speed: self.speed },
            Facing::default(),
            MovementCommand::Idle,
            Health::new(self.max_hp),
            skill_points,
            attacker,
            CombatTarget::default(),
            CastState::default(),
            LastHitBy::default(),
        )
    }
}

impl PlayerClass {
    pub fn profile(&self) -> CharacterProfile {
        match self {
            PlayerClass::Knight => CharacterProfile::knight(),
            PlayerClass::Wizard => CharacterProfile::wizard(),
        }
    }

    /// Скиллы класса (фиксированное число слотов)
    pub fn skills(&self, fire_bolt_count: u32) -> Vec<Skill> {
        match self {
            PlayerClass::Knight => {
                let range = self.profile().attack_range;
                vec![
                    skills::spiral_pierce(),
                    skills::brandish(range),
                    skills::magnum_break(),
                ]
            }
            PlayerClass::Wizard => vec![skills::fire_bolt(fire_bolt_count), skills::fireball()],
        }
    }
}

impl EnemyKind {
    pub fn profile(&self) -> CharacterProfile {
        match self {
            EnemyKind::Orc => CharacterProfile::orc(),
            EnemyKind::HighOrc => CharacterProfile::high_orc(),
        }
    }

    /// Опыт за убийство
    pub fn exp_value(&self) -> u32 {
        match self {
            EnemyKind::Orc => 150,
            EnemyKind::HighOrc => 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knight_is_melee_wizard_is_ranged() {
        assert_eq!(PlayerClass::Knight.profile().attack_type, AttackType::Melee);
        assert_eq!(PlayerClass::Wizard.profile().attack_type, AttackType::Ranged);
        assert!(CharacterProfile::wizard().attack_range > CharacterProfile::knight().attack_range);
    }

    #[test]
    fn test_skill_slot_counts() {
        assert_eq!(PlayerClass::Knight.skills(5).len(), 3);
        assert_eq!(PlayerClass::Wizard.skills(5).len(), 2);
    }

    #[test]
    fn test_enemies_start_on_cooldown() {
        let orc = EnemyKind::Orc.profile();
        assert_eq!(orc.initial_attack_cooldown, orc.attack_cooldown);
        assert_eq!(EnemyKind::HighOrc.exp_value(), 1000);
    }
}

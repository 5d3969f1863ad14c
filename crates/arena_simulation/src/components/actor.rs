//! Базовые компоненты персонажей: Player/Enemy маркеры, Health, SkillPoints, Progression

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::Attacker;

/// Класс игрока (выбирается при старте)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum PlayerClass {
    Knight,
    Wizard,
}

/// Тип врага
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum EnemyKind {
    Orc,
    HighOrc,
}

/// Маркер игрока (в симуляции ровно один)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player {
    pub class: PlayerClass,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            class: PlayerClass::Knight,
        }
    }
}

/// Маркер врага + награда за убийство
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub exp_value: u32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            kind: EnemyKind::Orc,
            exp_value: 150,
        }
    }
}

/// Отрицательный или NaN урон/хил считаем нулём
pub fn sanitize_amount(amount: f32) -> f32 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Здоровье персонажа
///
/// Инвариант: 0 ≤ current ≤ max (клампится в каждом методе).
/// current == 0, терминальное состояние (Dead).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Возвращает true только на переходе alive → dead (Died эмитится ровно один раз)
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        let amount = sanitize_amount(amount);
        self.current = (self.current - amount).clamp(0.0, self.max);
        was_alive && !self.is_alive()
    }

    /// Мертвых не лечим. Возвращает фактически восстановленное HP.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + sanitize_amount(amount)).clamp(0.0, self.max);
        self.current - before
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// SP: ресурс для скиллов
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Regen: 10 units/sec
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SkillPoints {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32, // units per second
}

impl Default for SkillPoints {
    fn default() -> Self {
        Self::new(500.0)
    }
}

impl SkillPoints {
    pub const DEFAULT_REGEN: f32 = 10.0;

    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            regen_rate: Self::DEFAULT_REGEN,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// All-or-nothing: при нехватке SP ничего не списываем
    pub fn consume(&mut self, cost: f32) -> bool {
        let cost = sanitize_amount(cost);
        if self.can_afford(cost) {
            self.current = (self.current - cost).clamp(0.0, self.max);
            true
        } else {
            false
        }
    }

    pub fn regenerate(&mut self, delta_time: f32) {
        if self.current < self.max {
            let gain = sanitize_amount(self.regen_rate * delta_time);
            self.current = (self.current + gain).clamp(0.0, self.max);
        }
    }
}

/// Уровень и опыт (есть только у игрока)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Progression {
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 20,
            exp: 0,
            exp_to_next_level: 1000,
        }
    }
}

impl Progression {
    /// Рост порога опыта за уровень
    pub const THRESHOLD_GROWTH: f32 = 1.2;
    /// Рост max HP / max SP / урона за уровень
    pub const STAT_GROWTH: f32 = 1.1;

    /// Начисляет опыт и проводит все level-up'ы, которые он покрывает.
    ///
    /// Большой опыт может перескочить несколько порогов, поэтому цикл, а не if.
    /// Каждый level-up: порог ×1.2, max HP/SP и урон ×1.1 (floor), полное восстановление.
    /// Возвращает список достигнутых уровней (по порядку).
    pub fn gain_exp(
        &mut self,
        amount: u32,
        health: &mut Health,
        skill_points: &mut SkillPoints,
        attacker: &mut Attacker,
    ) -> Vec<u32> {
        self.exp = self.exp.saturating_add(amount);

        let mut reached = Vec::new();
        while self.exp >= self.exp_to_next_level {
            self.exp -= self.exp_to_next_level;
            self.level += 1;
            self.exp_to_next_level =
                ((self.exp_to_next_level as f32 * Self::THRESHOLD_GROWTH).floor() as u32).max(1);

            health.max = (health.max * Self::STAT_GROWTH).floor();
            health.current = health.max;
            skill_points.max = (skill_points.max * Self::STAT_GROWTH).floor();
            skill_points.current = skill_points.max;
            attacker.base_damage = (attacker.base_damage * Self::STAT_GROWTH).floor();

            reached.push(self.level);
        }
        reached
    }
}

/// Кто последним нанёс урон (для начисления опыта за убийство)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LastHitBy(pub Option<Entity>);

#[cfg(test)]
mod tests {
    use super::*;

    fn knight_stats() -> (Health, SkillPoints, Attacker) {
        (
            Health::new(5000.0),
            SkillPoints::new(500.0),
            Attacker::melee(70.0, 60.0, 1.0),
        )
    }

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);

        assert!(!health.take_damage(30.0));
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        assert!(health.take_damage(100.0)); // Clamp к нулю
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());

        // Повторный урон по мертвому не даёт второго "died"
        assert!(!health.take_damage(10.0));
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(40.0);
        health.take_damage(-50.0);
        assert_eq!(health.current, 60.0);
        health.take_damage(f32::NAN);
        assert_eq!(health.current, 60.0);
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);

        assert_eq!(health.heal(30.0), 30.0);
        assert_eq!(health.current, 80.0);

        assert_eq!(health.heal(100.0), 20.0); // Clamped to max
        assert_eq!(health.current, 100.0);
        assert_eq!(health.heal(-10.0), 0.0);
    }

    #[test]
    fn test_health_stays_in_range_for_mixed_sequence() {
        let mut health = Health::new(250.0);
        let amounts = [10.0, -3.0, 400.0, 0.5, 1e9, -1e9, 77.7];
        for (i, amount) in amounts.iter().enumerate() {
            if i % 2 == 0 {
                health.take_damage(*amount);
            } else {
                health.heal(*amount);
            }
            assert!(health.current >= 0.0 && health.current <= health.max);
        }
    }

    #[test]
    fn test_skill_points_consume_all_or_nothing() {
        let mut sp = SkillPoints::new(100.0);
        sp.current = 20.0;

        assert!(!sp.consume(30.0));
        assert_eq!(sp.current, 20.0);

        assert!(sp.consume(20.0));
        assert_eq!(sp.current, 0.0);
    }

    #[test]
    fn test_skill_points_regenerate() {
        let mut sp = SkillPoints::new(100.0);
        sp.consume(50.0);

        sp.regenerate(2.0); // 2 sec × 10 units/sec = +20
        assert_eq!(sp.current, 70.0);

        sp.regenerate(10.0); // Clamp to max
        assert_eq!(sp.current, 100.0);
    }

    #[test]
    fn test_single_level_up() {
        let (mut health, mut sp, mut attacker) = knight_stats();
        health.take_damage(1000.0);
        let mut progression = Progression::default();

        let levels = progression.gain_exp(1150, &mut health, &mut sp, &mut attacker);

        assert_eq!(levels, vec![21]);
        assert_eq!(progression.exp, 150);
        assert_eq!(progression.exp_to_next_level, 1200);
        assert_eq!(health.max, 5500.0);
        assert_eq!(health.current, 5500.0);
        assert_eq!(sp.max, 550.0);
        assert_eq!(attacker.base_damage, 77.0);
    }

    #[test]
    fn test_multi_level_gain_matches_stepwise_gains() {
        let (mut bulk_health, mut bulk_sp, mut bulk_attacker) = knight_stats();
        let mut bulk = Progression::default();
        // 1000 + 1200 + 1440 = 3640 → три уровня и 60 сверху
        let levels = bulk.gain_exp(3700, &mut bulk_health, &mut bulk_sp, &mut bulk_attacker);
        assert_eq!(levels, vec![21, 22, 23]);

        let (mut step_health, mut step_sp, mut step_attacker) = knight_stats();
        let mut stepwise = Progression::default();
        for amount in [1000, 1200, 1440, 60] {
            stepwise.gain_exp(amount, &mut step_health, &mut step_sp, &mut step_attacker);
        }

        assert_eq!(bulk, stepwise);
        assert_eq!(bulk.exp, 60);
        assert_eq!(bulk_health.max, step_health.max);
        assert_eq!(bulk_sp.max, step_sp.max);
        assert_eq!(bulk_attacker.base_damage, step_attacker.base_damage);
    }
}

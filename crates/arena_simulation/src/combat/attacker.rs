//! Attacker component: характеристики авто-атаки персонажа
//!
//! Melee и ranged отличаются только дальностью/cooldown константами и тем,
//! что ranged вместо мгновенного урона спавнит Projectile.

use bevy::prelude::*;

use crate::combat::damage::apply_damage;
use crate::components::{
    angle_towards, CombatTarget, Enemy, Facing, Health, LastHitBy, Player, Position,
};
use crate::events::EventLog;
use crate::projectile::{spawn_projectile, ProjectileKind};
use crate::skills::CastState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AttackType {
    #[default]
    Melee,
    Ranged,
}

/// Attacker, компонент для персонажей которые могут атаковать
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Базовый урон (растёт с уровнем)
    pub base_damage: f32,

    /// Cooldown между атаками (секунды, константа класса)
    pub attack_cooldown: f32,

    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,

    /// Дальность атаки (центр-центр, px)
    pub attack_range: f32,

    pub attack_type: AttackType,
}

impl Default for Attacker {
    fn default() -> Self {
        Self::melee(50.0, 50.0, 1.0)
    }
}

impl Attacker {
    pub fn new(
        attack_type: AttackType,
        base_damage: f32,
        attack_range: f32,
        attack_cooldown: f32,
    ) -> Self {
        Self {
            base_damage,
            attack_cooldown,
            cooldown_timer: 0.0,
            attack_range,
            attack_type,
        }
    }

    pub fn melee(base_damage: f32, attack_range: f32, attack_cooldown: f32) -> Self {
        Self::new(AttackType::Melee, base_damage, attack_range, attack_cooldown)
    }

    pub fn ranged(base_damage: f32, attack_range: f32, attack_cooldown: f32) -> Self {
        Self::new(AttackType::Ranged, base_damage, attack_range, attack_cooldown)
    }

    /// Может ли атаковать (cooldown == 0)
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.attack_range
    }

    /// Начать атаку (сбросить cooldown)
    pub fn start_attack(&mut self) {
        self.cooldown_timer = self.attack_cooldown;
    }

    /// Атака проходит только при готовом cooldown и цели в радиусе.
    /// При успехе cooldown сбрасывается на константу класса.
    pub fn try_attack(&mut self, distance: f32) -> bool {
        if !self.can_attack() || !self.in_range(distance) {
            return false;
        }
        self.start_attack();
        true
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// System: обновление attack cooldown таймеров
pub fn tick_attack_cooldowns(mut query: Query<&mut Attacker>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut attacker in query.iter_mut() {
        attacker.tick(delta);
    }
}

/// System: авто-атака игрока по выбранной цели
///
/// Атакуем только живую цель в радиусе, не во время каста.
/// Melee → мгновенный урон, Ranged → Magic projectile в текущую позицию цели.
pub fn player_auto_attack(
    mut commands: Commands,
    mut log: ResMut<EventLog>,
    mut players: Query<
        (
            Entity,
            &Position,
            &Health,
            &CastState,
            &CombatTarget,
            &mut Attacker,
            &mut Facing,
        ),
        With<Player>,
    >,
    mut enemies: Query<(&Position, &mut Health, &mut LastHitBy), (With<Enemy>, Without<Player>)>,
) {
    for (player, position, health, cast, target, mut attacker, mut facing) in players.iter_mut() {
        if !health.is_alive() || cast.casting {
            continue;
        }
        let Some(target) = target.0 else {
            continue;
        };
        let Ok((target_position, mut target_health, mut last_hit)) = enemies.get_mut(target) else {
            continue;
        };
        if !target_health.is_alive() {
            continue;
        }

        let distance = position.0.distance(target_position.0);
        if !attacker.try_attack(distance) {
            continue;
        }

        if let Some(angle) = angle_towards(position.0, target_position.0) {
            facing.0 = angle;
        }

        match attacker.attack_type {
            AttackType::Melee => {
                apply_damage(
                    &mut log,
                    Some(player),
                    target,
                    target_position.0,
                    &mut target_health,
                    &mut last_hit,
                    attacker.base_damage,
                );
            }
            AttackType::Ranged => {
                spawn_projectile(
                    &mut commands,
                    player,
                    ProjectileKind::Magic,
                    position.0,
                    target_position.0,
                    facing.0,
                    attacker.base_damage,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attacker_cooldown() {
        let mut attacker = Attacker::melee(70.0, 60.0, 1.0);
        assert!(attacker.can_attack());

        attacker.start_attack();
        assert!(!attacker.can_attack());
        assert_eq!(attacker.cooldown_timer, 1.0);

        attacker.tick(0.5);
        assert!(!attacker.can_attack());

        attacker.tick(0.7); // Floor at 0
        assert_eq!(attacker.cooldown_timer, 0.0);
        assert!(attacker.can_attack());
    }

    #[test]
    fn test_try_attack_requires_range() {
        let mut attacker = Attacker::melee(70.0, 60.0, 1.0);

        assert!(!attacker.try_attack(61.0));
        // Промах по дальности не тратит cooldown
        assert!(attacker.can_attack());

        assert!(attacker.try_attack(40.0));
        assert_eq!(attacker.cooldown_timer, 1.0);
        assert!(!attacker.try_attack(40.0));
    }
}

//! Skill definitions: неизменяемые описания скиллов
//!
//! Один executor интерпретирует `SkillEffect`, поэтому новый скилл это новая
//! запись данных, а не новый код.

use std::f32::consts::PI;

use crate::projectile::ProjectileKind;

/// Минимум/максимум болтов у Fire Bolt
pub const FIRE_BOLT_MIN: u32 = 1;
pub const FIRE_BOLT_MAX: u32 = 10;
pub const FIRE_BOLT_DEFAULT: u32 = 5;

/// Как скилл выбирает цель при активации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    /// Нужна живая выбранная цель (переданная или текущая)
    Locked,
    /// Ближайший живой враг в attack range
    NearestInRange,
    /// Без цели (AoE вокруг/перед кастером)
    Untargeted,
}

/// Что делает каждый hit скилла
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// `hits` ударов по цели с интервалом `hit_interval`
    SingleTarget {
        multiplier: f32,
        hits: u32,
        hit_interval: f32,
    },
    /// Конус перед кастером
    Cone {
        multiplier: f32,
        angle: f32,
        range: f32,
    },
    /// Круг вокруг кастера
    Area { multiplier: f32, radius: f32 },
    /// `count` снарядов в цель с интервалом `interval`
    ProjectileBurst {
        multiplier: f32,
        count: u32,
        interval: f32,
        kind: ProjectileKind,
    },
}

impl SkillEffect {
    pub fn multiplier(&self) -> f32 {
        match *self {
            SkillEffect::SingleTarget { multiplier, .. }
            | SkillEffect::Cone { multiplier, .. }
            | SkillEffect::Area { multiplier, .. }
            | SkillEffect::ProjectileBurst { multiplier, .. } => multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: &'static str,
    pub sp_cost: f32,
    /// Cooldown после активации (секунды)
    pub cooldown: f32,
    pub cast_time: f32,
    pub targeting: Targeting,
    pub effect: SkillEffect,
}

impl Skill {
    /// Смещения hit'ов от момента активации (секунды), по возрастанию.
    ///
    /// Первый hit ровно в конце каста, дальше `+ i × interval`.
    pub fn hit_offsets(&self) -> Vec<f32> {
        let (count, interval) = match self.effect {
            SkillEffect::SingleTarget {
                hits, hit_interval, ..
            } => (hits, hit_interval),
            SkillEffect::ProjectileBurst {
                count, interval, ..
            } => (count, interval),
            SkillEffect::Cone { .. } | SkillEffect::Area { .. } => (1, 0.0),
        };

        (0..count)
            .map(|i| self.cast_time + i as f32 * interval)
            .collect()
    }
}

pub fn spiral_pierce() -> Skill {
    Skill {
        name: "Spiral Pierce",
        sp_cost: 30.0,
        cooldown: 5.0,
        cast_time: 0.5,
        targeting: Targeting::Locked,
        effect: SkillEffect::SingleTarget {
            multiplier: 1.2,
            hits: 3,
            hit_interval: 0.2,
        },
    }
}

/// Brandish: конус 60° на двойную дальность атаки
pub fn brandish(attack_range: f32) -> Skill {
    Skill {
        name: "Brandish",
        sp_cost: 50.0,
        cooldown: 10.0,
        cast_time: 1.0,
        targeting: Targeting::Untargeted,
        effect: SkillEffect::Cone {
            multiplier: 1.5,
            angle: PI / 3.0,
            range: attack_range * 2.0,
        },
    }
}

/// Magnum Break: круговой удар вокруг Knight (цифры радиального Brandish, каст 0.8 s)
pub fn magnum_break() -> Skill {
    Skill {
        name: "Magnum Break",
        sp_cost: 100.0,
        cooldown: 10.0,
        cast_time: 0.8,
        targeting: Targeting::Untargeted,
        effect: SkillEffect::Area {
            multiplier: 2.0,
            radius: 100.0,
        },
    }
}

/// Fire Bolt: стоимость и каст растут с числом болтов (8 SP / 0.2 s на болт)
pub fn fire_bolt(count: u32) -> Skill {
    let count = count.clamp(FIRE_BOLT_MIN, FIRE_BOLT_MAX);
    Skill {
        name: "Fire Bolt",
        sp_cost: 8.0 * count as f32,
        cooldown: 3.0,
        cast_time: 0.2 * count as f32,
        targeting: Targeting::Locked,
        effect: SkillEffect::ProjectileBurst {
            multiplier: 0.7,
            count,
            interval: 0.2,
            kind: ProjectileKind::FireBolt,
        },
    }
}

pub fn fireball() -> Skill {
    Skill {
        name: "Fireball",
        sp_cost: 60.0,
        cooldown: 8.0,
        cast_time: 1.5,
        targeting: Targeting::NearestInRange,
        effect: SkillEffect::ProjectileBurst {
            multiplier: 2.0,
            count: 1,
            interval: 0.0,
            kind: ProjectileKind::Fireball,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spiral_pierce_offsets() {
        let offsets = spiral_pierce().hit_offsets();
        assert_eq!(offsets.len(), 3);
        assert!((offsets[0] - 0.5).abs() < 1e-6);
        assert!((offsets[1] - 0.7).abs() < 1e-6);
        assert!((offsets[2] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_area_skills_hit_once_at_cast_end() {
        assert_eq!(brandish(60.0).hit_offsets(), vec![1.0]);
        assert_eq!(magnum_break().hit_offsets(), vec![0.8]);
        assert_eq!(fireball().hit_offsets(), vec![1.5]);
    }

    #[test]
    fn test_brandish_range_is_double_attack_range() {
        match brandish(60.0).effect {
            SkillEffect::Cone { range, angle, .. } => {
                assert_eq!(range, 120.0);
                assert!((angle - PI / 3.0).abs() < 1e-6);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_fire_bolt_scales_with_count() {
        let bolt = fire_bolt(5);
        assert_eq!(bolt.sp_cost, 40.0);
        assert!((bolt.cast_time - 1.0).abs() < 1e-6);
        assert_eq!(bolt.hit_offsets().len(), 5);

        // Вне диапазона 1..=10 зажимается
        assert_eq!(fire_bolt(0).sp_cost, 8.0);
        assert_eq!(fire_bolt(25).sp_cost, 80.0);
    }
}

//! SkillSchedule: отложенные hit'ы скиллов на часах симуляции
//!
//! Каждый hit хранит смещение от активации и накопленное время.
//! Таймеры не используются: пауза драйвера = пауза расписания,
//! а длинный кадр выстреливает все созревшие hit'ы сразу, по порядку.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{apply_damage, in_cone, in_radius, Attacker};
use crate::components::{Enemy, Facing, Health, LastHitBy, Position};
use crate::events::{AreaShape, EventLog, GameEvent};
use crate::projectile::spawn_projectile;
use crate::skills::{Skill, SkillEffect};
use crate::DeterministicRng;

/// Один запланированный hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledHit {
    pub caster: Entity,
    pub skill: &'static str,
    pub effect: SkillEffect,
    /// Цель зафиксирована в момент активации (None для AoE)
    pub target: Option<Entity>,
    /// Когда стрелять (секунды от активации)
    pub offset: f32,
    /// Сколько времени прошло с активации
    pub elapsed: f32,
}

/// Допуск сравнения elapsed/offset (секунды).
///
/// delta каждого тика проходит через `Duration` (целые наносекунды), поэтому
/// 30 кадров по 1/60 s накапливают чуть меньше 0.5 s.
pub const HIT_TIME_EPSILON: f32 = 1e-4;

impl ScheduledHit {
    pub fn is_due(&self) -> bool {
        self.elapsed + HIT_TIME_EPSILON >= self.offset
    }
}

#[derive(Resource, Debug, Default)]
pub struct SkillSchedule {
    entries: Vec<ScheduledHit>,
}

impl SkillSchedule {
    /// Ставит по одному hit'у на каждое смещение скилла
    pub fn schedule_skill(&mut self, caster: Entity, skill: &Skill, target: Option<Entity>) {
        for offset in skill.hit_offsets() {
            self.entries.push(ScheduledHit {
                caster,
                skill: skill.name,
                effect: skill.effect,
                target,
                offset,
                elapsed: 0.0,
            });
        }
    }

    pub fn advance(&mut self, delta: f32) {
        for entry in self.entries.iter_mut() {
            entry.elapsed += delta;
        }
    }

    /// Забирает созревшие hit'ы в порядке срабатывания
    /// (раньше созревший → раньше в списке, ничья → порядок постановки).
    pub fn take_due(&mut self) -> Vec<ScheduledHit> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(ScheduledHit::is_due);
        self.entries = pending;

        due.sort_by(|a, b| {
            let a_overdue = a.elapsed - a.offset;
            let b_overdue = b.elapsed - b.offset;
            b_overdue.total_cmp(&a_overdue)
        });
        due
    }

    /// Снимает все hit'ы кастера (кастер умер или исчез)
    pub fn cancel_caster(&mut self, caster: Entity) {
        self.entries.retain(|entry| entry.caster != caster);
    }

    pub fn retain(&mut self, keep: impl FnMut(&ScheduledHit) -> bool) {
        self.entries.retain(keep);
    }

    pub fn pending(&self) -> &[ScheduledHit] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// System: продвигает расписание и применяет созревшие hit'ы
///
/// Позиция/facing/урон кастера берутся в момент hit'а, не активации.
pub fn resolve_scheduled_hits(
    mut commands: Commands,
    time: Res<Time>,
    mut schedule: ResMut<SkillSchedule>,
    mut log: ResMut<EventLog>,
    mut rng: ResMut<DeterministicRng>,
    casters: Query<(&Position, &Facing, &Attacker, &Health), Without<Enemy>>,
    mut victims: Query<(Entity, &Position, &mut Health, &mut LastHitBy), With<Enemy>>,
) {
    // Мертвый кастер аннулирует свои hit'ы
    schedule.retain(|entry| {
        casters
            .get(entry.caster)
            .is_ok_and(|(_, _, _, health)| health.is_alive())
    });
    if schedule.is_empty() {
        return;
    }

    schedule.advance(time.delta_secs());

    for hit in schedule.take_due() {
        let Ok((caster_position, facing, attacker, _)) = casters.get(hit.caster) else {
            continue;
        };
        let damage = attacker.base_damage * hit.effect.multiplier();

        match hit.effect {
            SkillEffect::SingleTarget { .. } => {
                let Some(target) = hit.target else {
                    continue;
                };
                // Цель умерла/исчезла между активацией и hit'ом → тихо пропускаем
                if let Ok((_, position, mut health, mut last_hit)) = victims.get_mut(target) {
                    apply_damage(
                        &mut log,
                        Some(hit.caster),
                        target,
                        position.0,
                        &mut health,
                        &mut last_hit,
                        damage,
                    );
                }
            }
            SkillEffect::Cone { angle, range, .. } => {
                for (victim, position, mut health, mut last_hit) in victims.iter_mut() {
                    if !health.is_alive()
                        || !in_cone(caster_position.0, facing.0, angle, range, position.0)
                    {
                        continue;
                    }
                    apply_damage(
                        &mut log,
                        Some(hit.caster),
                        victim,
                        position.0,
                        &mut health,
                        &mut last_hit,
                        damage,
                    );
                }
                log.push(GameEvent::AreaHit {
                    center: caster_position.0,
                    radius: range,
                    shape: AreaShape::Cone {
                        facing: facing.0,
                        angle,
                    },
                });
            }
            SkillEffect::Area { radius, .. } => {
                for (victim, position, mut health, mut last_hit) in victims.iter_mut() {
                    if !health.is_alive() || !in_radius(caster_position.0, radius, position.0) {
                        continue;
                    }
                    apply_damage(
                        &mut log,
                        Some(hit.caster),
                        victim,
                        position.0,
                        &mut health,
                        &mut last_hit,
                        damage,
                    );
                }
                log.push(GameEvent::AreaHit {
                    center: caster_position.0,
                    radius,
                    shape: AreaShape::Circle,
                });
            }
            SkillEffect::ProjectileBurst { kind, .. } => {
                let Some(target) = hit.target else {
                    continue;
                };
                let Ok((_, target_position, health, _)) = victims.get(target) else {
                    continue;
                };
                if !health.is_alive() {
                    continue;
                }

                let jitter = kind.tuning().jitter;
                let mut aim = target_position.0;
                if jitter > 0.0 {
                    aim.x += rng.rng.gen_range(-jitter..=jitter);
                    aim.y += rng.rng.gen_range(-jitter..=jitter);
                }

                spawn_projectile(
                    &mut commands,
                    hit.caster,
                    kind,
                    caster_position.0,
                    aim,
                    facing.0,
                    damage,
                );
            }
        }

        crate::logger::log_with_level(
            crate::logger::LogLevel::Debug,
            &format!("{} hit fired at +{:.2}s", hit.skill, hit.offset),
        );
    }
}

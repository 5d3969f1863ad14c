//! Skill engine
//!
//! - definition: неизменяемые Skill записи (cost, cooldown, cast time, effect)
//! - state: CastState + SkillSlots, тики cooldown'ов и регенерации SP
//! - activation: `activate` (валидация → оплата → каст → расписание)
//! - schedule: SkillSchedule, отложенные hit'ы на часах симуляции

use bevy::prelude::*;

pub mod activation;
pub mod definition;
pub mod schedule;
pub mod state;

pub use activation::{activate, CastRejection};
pub use definition::{
    brandish, fire_bolt, fireball, magnum_break, spiral_pierce, Skill, SkillEffect, Targeting,
    FIRE_BOLT_DEFAULT, FIRE_BOLT_MAX, FIRE_BOLT_MIN,
};
pub use schedule::{resolve_scheduled_hits, ScheduledHit, SkillSchedule, HIT_TIME_EPSILON};
pub use state::{
    regenerate_skill_points, tick_cast_state, tick_skill_cooldowns, CastState, SkillSlots,
};

use crate::{SimulationTick, TickSet};

/// Skill Plugin
///
/// Timers: cooldown'ы, каст, регенерация SP.
/// Skills: созревшие hit'ы (после движения и атак этого тика).
pub struct SkillPlugin;

impl Plugin for SkillPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CastState>()
            .init_resource::<SkillSchedule>();

        app.add_systems(
            SimulationTick,
            (
                (tick_skill_cooldowns, tick_cast_state, regenerate_skill_points)
                    .chain()
                    .in_set(TickSet::Timers),
                resolve_scheduled_hits.in_set(TickSet::Skills),
            ),
        );
    }
}

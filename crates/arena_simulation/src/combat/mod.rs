//! Combat system module
//!
//! ECS ответственность:
//! - Attacker stats, auto-attack (melee instant / ranged projectile)
//! - Damage application: DamageDealt, Died, LastHitBy
//! - Compaction: exp за убийство + despawn мертвых врагов
//! - High Orc ground slam
//!
//! Урон пишется в `EventLog` синхронно, отдельного damage event queue нет.

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod slam;
pub mod targeting;

// Re-export основных типов
pub use attacker::{player_auto_attack, tick_attack_cooldowns, AttackType, Attacker};
pub use damage::{apply_damage, apply_heal, award_kill_experience, grant_experience};
pub use slam::{ground_slam, GroundSlam};
pub use targeting::{in_cone, in_radius, nearest_within, signed_angle_diff};

use crate::{SimulationTick, TickSet};

/// Combat Plugin
///
/// Порядок выполнения (внутри SimulationTick):
/// 1. tick_attack_cooldowns: Timers
/// 2. player_auto_attack: PlayerAttack (после движения игрока)
/// 3. ground_slam: EnemySpecials (после обычной атаки врагов)
/// 4. award_kill_experience: Cleanup (compaction)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Attacker>()
            .register_type::<GroundSlam>();

        app.add_systems(
            SimulationTick,
            (
                tick_attack_cooldowns.in_set(TickSet::Timers),
                player_auto_attack.in_set(TickSet::PlayerAttack),
                ground_slam.in_set(TickSet::EnemySpecials),
                award_kill_experience.in_set(TickSet::Cleanup),
            ),
        );
    }
}

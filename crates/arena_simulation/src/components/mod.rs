//! ECS Components для персонажей
//!
//! Организация по доменам:
//! - actor: маркеры Player/Enemy, Health, SkillPoints, Progression, LastHitBy
//! - combat: CombatTarget
//! - movement: Position, Body, MovementSpeed, Facing, MovementCommand
//!
//! Attacker живёт в `combat`, CastState/SkillSlots в `skills`, Projectile в `projectile`.

pub mod actor;
pub mod combat;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use combat::*;
pub use movement::*;

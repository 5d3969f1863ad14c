//! Projectile domain: снаряды авто-атаки Wizard и скиллов
//!
//! Содержит:
//! - ProjectileKind + tuning table (скорость, радиус, on-hit)
//! - Projectile component, Playfield resource (границы поля)
//! - Системы полёта, столкновений и уборки

use bevy::prelude::*;

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::*;

use crate::{SimulationTick, TickSet};

/// Projectile Plugin
///
/// Projectiles: advance_projectiles
/// Collisions: resolve_projectile_collisions
/// Cleanup: despawn_expired_projectiles
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Projectile>()
            .init_resource::<Playfield>();

        app.add_systems(
            SimulationTick,
            (
                advance_projectiles.in_set(TickSet::Projectiles),
                resolve_projectile_collisions.in_set(TickSet::Collisions),
                despawn_expired_projectiles.in_set(TickSet::Cleanup),
            ),
        );
    }
}

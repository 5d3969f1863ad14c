//! AI decision-making module
//!
//! Aggro AI врагов: выбор цели → сближение → движение → атака.
//! Ground slam High Orc'а живёт в `combat::slam` (фаза EnemySpecials).

use bevy::prelude::*;

pub mod enemy;

pub use enemy::{acquire_enemy_targets, enemy_attack, enemy_seek};

use crate::components::{Enemy, Player};
use crate::movement::{apply_movement, update_facing};
use crate::{SimulationTick, TickSet};

/// AI Plugin
///
/// Порядок выполнения (TickSet::Enemies):
/// 1. acquire_enemy_targets: цель = живой игрок
/// 2. enemy_seek: MoveToPosition / Idle
/// 3. apply_movement: шаг к цели
/// 4. update_facing: взгляд на цель
/// 5. enemy_attack: удар если в радиусе и cooldown готов
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimulationTick,
            (
                acquire_enemy_targets,
                enemy_seek,
                apply_movement::<(With<Enemy>, Without<Player>)>,
                update_facing::<(With<Enemy>, Without<Player>)>,
                enemy_attack,
            )
                // Последовательное выполнение для детерминизма
                .chain()
                .in_set(TickSet::Enemies),
        );
    }
}

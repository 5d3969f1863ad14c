//! Movement systems: straight-line seek и направление взгляда
//!
//! Компоненты (Position, MovementCommand, ...) живут в `components::movement`.
//! Системы generic по query filter: игрок и враги двигаются в разных фазах тика.

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

use crate::components::{
    angle_towards, step_towards, CombatTarget, Enemy, Facing, Health, MovementCommand,
    MovementSpeed, Player, Position,
};
use crate::skills::CastState;
use crate::{SimulationTick, TickSet};

/// System: двигаем персонажей с MoveToPosition
///
/// Мертвые и кастующие стоят на месте. Дошли → Idle.
pub fn apply_movement<F: QueryFilter + 'static>(
    time: Res<Time>,
    mut query: Query<
        (
            &mut Position,
            &MovementSpeed,
            &mut MovementCommand,
            &Health,
            &CastState,
        ),
        F,
    >,
) {
    let delta = time.delta_secs();

    for (mut position, speed, mut command, health, cast) in query.iter_mut() {
        if !health.is_alive() || cast.casting {
            continue;
        }
        let MovementCommand::MoveToPosition { target } = *command else {
            continue;
        };

        let step = step_towards(position.0, target, speed.speed, delta);
        position.0 = step.position;
        if step.arrived {
            *command = MovementCommand::Idle;
        }
    }
}

/// System: facing → на живую цель атаки, иначе по направлению движения
pub fn update_facing<F: QueryFilter + 'static>(
    mut query: Query<(&Position, &MovementCommand, &CombatTarget, &Health, &mut Facing), F>,
    targets: Query<(&Position, &Health)>,
) {
    for (position, command, target, health, mut facing) in query.iter_mut() {
        if !health.is_alive() {
            continue;
        }

        let target_position = target
            .0
            .and_then(|target| targets.get(target).ok())
            .filter(|(_, target_health)| target_health.is_alive())
            .map(|(target_position, _)| target_position.0);

        let look_at = match (target_position, *command) {
            (Some(target_position), _) => Some(target_position),
            (None, MovementCommand::MoveToPosition { target }) => Some(target),
            (None, MovementCommand::Idle) => None,
        };

        if let Some(angle) = look_at.and_then(|point| angle_towards(position.0, point)) {
            facing.0 = angle;
        }
    }
}

/// Movement Plugin
///
/// PlayerMovement: apply_movement → update_facing (игрок).
/// Движение врагов регистрирует AIPlugin (после решения AI).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimulationTick,
            (
                apply_movement::<(With<Player>, Without<Enemy>)>,
                update_facing::<(With<Player>, Without<Enemy>)>,
            )
                .chain()
                .in_set(TickSet::PlayerMovement),
        );
    }
}

use bevy::prelude::*;

/// Текущая цель атаки (слабая ссылка по Entity id)
///
/// Цель может умереть между тиками, поэтому каждый потребитель перепроверяет её живость.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatTarget(pub Option<Entity>);

//! Movement компоненты: позиция, скорость, команды перемещения (2D, пиксели)

use bevy::prelude::*;

/// Дистанция, на которой считаем что дошли до цели (px)
pub const ARRIVAL_EPSILON: f32 = 5.0;

/// Позиция центра на игровом поле (px)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Position(pub Vec2);

/// Коллайдер: круг радиуса `radius`
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Body {
    pub radius: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self { radius: 20.0 }
    }
}

/// Скорость движения (px/sec)
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 200.0 }
    }
}

/// Направление взгляда (радианы, 0 = вправо)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub f32);

/// Команда движения персонажа (straight-line seek, без pathfinding)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции
    MoveToPosition { target: Vec2 },
}

impl MovementCommand {
    pub fn is_moving(&self) -> bool {
        matches!(self, MovementCommand::MoveToPosition { .. })
    }
}

/// Результат одного шага движения
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub position: Vec2,
    /// Направление шага (None если не двигались)
    pub direction: Option<Vec2>,
    pub arrived: bool,
}

/// Шаг к цели со скоростью `speed` за `delta` секунд.
///
/// Не перескакивает цель; в радиусе `ARRIVAL_EPSILON` считаем что дошли.
pub fn step_towards(position: Vec2, target: Vec2, speed: f32, delta: f32) -> MovementStep {
    let offset = target - position;
    let distance = offset.length();

    if distance <= ARRIVAL_EPSILON {
        return MovementStep {
            position,
            direction: None,
            arrived: true,
        };
    }

    let direction = offset / distance;
    let travel = (speed.max(0.0) * delta.max(0.0)).min(distance);
    let next = position + direction * travel;

    MovementStep {
        position: next,
        direction: Some(direction),
        arrived: distance - travel <= ARRIVAL_EPSILON,
    }
}

/// atan2 угол от `from` к `to` (None если точки совпадают)
pub fn angle_towards(from: Vec2, to: Vec2) -> Option<f32> {
    let offset = to - from;
    if offset.length_squared() <= f32::EPSILON {
        None
    } else {
        Some(offset.y.atan2(offset.x))
    }
}

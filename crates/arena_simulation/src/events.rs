//! GameEvent log: единственное что пересекает границу симуляция → render/UI
//!
//! Системы пушат события в `EventLog` в порядке возникновения.
//! `Simulation::tick` забирает весь буфер и очищает его.
//! События из intent-вызовов между тиками уходят вместе со следующим тиком.

use bevy::prelude::*;

/// Форма AoE (для визуала вспышки)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaShape {
    Circle,
    Cone { facing: f32, angle: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Урон нанесён (floating number + hit flash)
    DamageDealt {
        attacker: Option<Entity>,
        target: Entity,
        amount: f32,
        position: Vec2,
    },
    Healed {
        target: Entity,
        amount: f32,
        position: Vec2,
    },
    ExpGained {
        entity: Entity,
        amount: u32,
        position: Vec2,
    },
    LeveledUp {
        entity: Entity,
        level: u32,
        position: Vec2,
    },
    SkillCast {
        caster: Entity,
        skill: &'static str,
        position: Vec2,
    },
    /// hp дошло до 0 (ровно один раз на персонажа)
    Died {
        entity: Entity,
        killer: Option<Entity>,
        position: Vec2,
    },
    AreaHit {
        center: Vec2,
        radius: f32,
        shape: AreaShape,
    },
    /// Сообщение для игрока ("Not enough SP!", "A High Orc has appeared!")
    Message { text: String },
}

/// Буфер событий текущего тика
#[derive(Resource, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn message(&mut self, text: impl Into<String>) {
        self.events.push(GameEvent::Message { text: text.into() });
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Забрать все события (буфер очищается)
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

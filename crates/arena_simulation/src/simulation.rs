//! Simulation facade: владеет Bevy App и даёт intent API для драйвера
//!
//! Драйвер (render loop, тест, headless bin) вызывает `tick(delta_ms)` каждый
//! кадр и intent-методы между тиками. Всё остальное внутри ECS.

use std::time::Duration;

use bevy::prelude::*;

use crate::combat::{self, Attacker};
use crate::components::{
    CombatTarget, Enemy, Health, MovementCommand, Player, PlayerClass, Position,
};
use crate::config::{ConfigError, SimulationConfig};
use crate::events::{EventLog, GameEvent};
use crate::projectile::Playfield;
use crate::skills::{self, CastState, SkillSlots, FIRE_BOLT_MAX, FIRE_BOLT_MIN};
use crate::snapshot::{self, RenderSnapshot};
use crate::spawn;
use crate::{create_headless_app, SimulationPlugin, SimulationTick};

/// Потолок одного тика (секунды). Длинный кадр дальше не растягивается.
pub const MAX_TICK_SECS: f32 = 60.0;

pub struct Simulation {
    app: App,
    player: Entity,
}

impl Simulation {
    /// Создаёт мир: игрок в центре поля + стартовая волна орков
    pub fn new(config: SimulationConfig, class: PlayerClass) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut app = create_headless_app(config.seed);
        let initial_wave = config.initial_wave;
        let center = Vec2::new(config.playfield_width * 0.5, config.playfield_height * 0.5);

        app.insert_resource(config).add_plugins(SimulationPlugin);
        app.finish();
        app.cleanup();

        let player = spawn::spawn_player(app.world_mut(), class, center);
        spawn::spawn_wave(app.world_mut(), initial_wave);

        crate::log_info(&format!("🎮 Simulation started: {:?}, {} orcs", class, initial_wave));

        Ok(Self { app, player })
    }

    /// Продвигает симуляцию на `delta_ms` миллисекунд.
    ///
    /// Отрицательный/NaN delta считается нулём, больше `MAX_TICK_SECS` режется.
    /// Возвращает все события, накопленные с прошлого тика (включая события
    /// intent-вызовов).
    pub fn tick(&mut self, delta_ms: f32) -> Vec<GameEvent> {
        let delta_secs = if delta_ms.is_finite() && delta_ms > 0.0 {
            (delta_ms / 1000.0).min(MAX_TICK_SECS)
        } else {
            0.0
        };

        let world = self.app.world_mut();
        if let Some(mut time) = world.get_resource_mut::<Time>() {
            let delta = Duration::try_from_secs_f32(delta_secs).unwrap_or(Duration::ZERO);
            // elapsed копится без предела: при переполнении время стоит
            if time.elapsed().checked_add(delta).is_some() {
                time.advance_by(delta);
            } else {
                crate::log_warning("⏱️ Simulation clock overflow, tick skipped");
            }
        }
        if let Err(error) = world.try_run_schedule(SimulationTick) {
            crate::log_error(&format!("SimulationTick schedule missing: {}", error));
        }

        world
            .get_resource_mut::<EventLog>()
            .map(|mut log| log.drain())
            .unwrap_or_default()
    }

    fn push_message(&mut self, text: String) {
        if let Some(mut log) = self.app.world_mut().get_resource_mut::<EventLog>() {
            log.message(text);
        }
    }

    fn player_can_act(&self) -> bool {
        let world = self.app.world();
        let alive = world
            .get::<Health>(self.player)
            .is_some_and(|health| health.is_alive());
        let casting = world
            .get::<CastState>(self.player)
            .is_some_and(|cast| cast.casting);
        alive && !casting
    }

    fn live_enemy_position(&self, entity: Entity) -> Option<Vec2> {
        let world = self.app.world();
        let entity_ref = world.get_entity(entity).ok()?;
        if !entity_ref.contains::<Enemy>() {
            return None;
        }
        if !entity_ref.get::<Health>()?.is_alive() {
            return None;
        }
        entity_ref.get::<Position>().map(|position| position.0)
    }

    /// Двигаться к точке. Отклоняется во время каста и после смерти.
    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() || !self.player_can_act() {
            crate::logger::log_with_level(
                crate::LogLevel::Debug,
                &format!("move_to({}, {}) rejected", x, y),
            );
            return false;
        }

        match self.app.world_mut().get_mut::<MovementCommand>(self.player) {
            Some(mut command) => {
                *command = MovementCommand::MoveToPosition {
                    target: Vec2::new(x, y),
                };
                true
            }
            None => false,
        }
    }

    /// Выбрать цель авто-атаки (None = сбросить). Цель должна быть живым врагом.
    pub fn set_attack_target(&mut self, target: Option<Entity>) -> bool {
        if let Some(entity) = target {
            if self.live_enemy_position(entity).is_none() {
                return false;
            }
        }
        match self.app.world_mut().get_mut::<CombatTarget>(self.player) {
            Some(mut combat_target) => {
                combat_target.0 = target;
                true
            }
            None => false,
        }
    }

    /// Клик по врагу: выбрать целью и подойти, если он вне дальности атаки
    pub fn engage(&mut self, enemy: Entity) -> bool {
        let Some(enemy_position) = self.live_enemy_position(enemy) else {
            return false;
        };
        if !self.set_attack_target(Some(enemy)) {
            return false;
        }

        let world = self.app.world();
        let player_position = world.get::<Position>(self.player).map(|p| p.0);
        let range = world.get::<Attacker>(self.player).map(|a| a.attack_range);
        if let (Some(player_position), Some(range)) = (player_position, range) {
            if player_position.distance(enemy_position) > range {
                self.move_to(enemy_position.x, enemy_position.y);
            }
        }
        true
    }

    /// Использовать скилл из слота. Отказ → false + Message с причиной.
    pub fn use_skill(&mut self, slot: usize) -> bool {
        self.use_skill_on(slot, None)
    }

    /// То же, но Locked скилл берёт `target` вместо текущей цели атаки
    pub fn use_skill_on(&mut self, slot: usize, target: Option<Entity>) -> bool {
        match skills::activate(self.app.world_mut(), self.player, slot, target) {
            Ok(()) => true,
            Err(rejection) => {
                crate::log(&format!("🚫 Skill slot {} rejected: {}", slot, rejection));
                self.push_message(rejection.to_string());
                false
            }
        }
    }

    /// Число болтов Fire Bolt (зажимается в 1..=10). Только для Wizard.
    pub fn set_fire_bolt_count(&mut self, count: u32) -> bool {
        let count = count.clamp(FIRE_BOLT_MIN, FIRE_BOLT_MAX);
        let player = self.player;
        let world = self.app.world_mut();

        let is_wizard = world
            .get::<Player>(player)
            .is_some_and(|p| p.class == PlayerClass::Wizard);
        if !is_wizard {
            return false;
        }

        if let Some(mut config) = world.get_resource_mut::<SimulationConfig>() {
            config.fire_bolt_count = count;
        }
        match world.get_mut::<SkillSlots>(player) {
            Some(mut slots) => slots.replace(0, skills::fire_bolt(count)),
            None => false,
        }
    }

    /// Лечит живого персонажа (игрока или врага). Возвращает восстановленное HP.
    ///
    /// Hook для внешних источников лечения (зелья, отладка): ядро само не лечит.
    pub fn heal(&mut self, entity: Entity, amount: f32) -> f32 {
        let mut pending = EventLog::default();
        let healed = {
            let Ok(mut entity_ref) = self.app.world_mut().get_entity_mut(entity) else {
                return 0.0;
            };
            let Some(position) = entity_ref.get::<Position>().map(|position| position.0) else {
                return 0.0;
            };
            let Some(mut health) = entity_ref.get_mut::<Health>() else {
                return 0.0;
            };
            combat::apply_heal(&mut pending, entity, position, &mut health, amount)
        };
        self.push_events(pending);
        healed
    }

    fn push_events(&mut self, mut pending: EventLog) {
        if let Some(mut log) = self.app.world_mut().get_resource_mut::<EventLog>() {
            for event in pending.drain() {
                log.push(event);
            }
        }
    }

    /// Новые размеры поля (снаряды за пределами expire'ятся со следующего тика)
    pub fn set_bounds(&mut self, width: f32, height: f32) -> bool {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return false;
        }

        let world = self.app.world_mut();
        if let Some(mut playfield) = world.get_resource_mut::<Playfield>() {
            playfield.width = width;
            playfield.height = height;
        }
        if let Some(mut config) = world.get_resource_mut::<SimulationConfig>() {
            config.playfield_width = width;
            config.playfield_height = height;
        }
        true
    }

    pub fn spawn_wave(&mut self, count: u32) -> Vec<Entity> {
        spawn::spawn_wave(self.app.world_mut(), count)
    }

    pub fn spawn_boss(&mut self) -> Entity {
        spawn::spawn_boss(self.app.world_mut())
    }

    pub fn snapshot(&mut self) -> RenderSnapshot {
        snapshot::capture(self.app.world_mut())
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn is_player_alive(&self) -> bool {
        self.app
            .world()
            .get::<Health>(self.player)
            .is_some_and(|health| health.is_alive())
    }

    /// Живые враги (в порядке id)
    pub fn enemies(&mut self) -> Vec<Entity> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(Entity, &Health), With<Enemy>>();
        let mut enemies: Vec<Entity> = query
            .iter(world)
            .filter(|(_, health)| health.is_alive())
            .map(|(entity, _)| entity)
            .collect();
        enemies.sort_by_key(|entity| entity.to_bits());
        enemies
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

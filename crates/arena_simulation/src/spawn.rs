//! Spawning: игрок, волны орков, High Orc
//!
//! Позиции случайные (DeterministicRng), но не ближе `min_distance` к игроку.
//! Rejection sampling ограничен по попыткам: на крошечном поле берём последний sample.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::GroundSlam;
use crate::components::{Enemy, EnemyKind, Player, PlayerClass, Position, Progression};
use crate::config::SimulationConfig;
use crate::events::EventLog;
use crate::projectile::Playfield;
use crate::skills::SkillSlots;
use crate::{DeterministicRng, SimulationTick, TickSet};

/// Таймер появления босса на часах симуляции
#[derive(Resource, Debug, Clone, Default)]
pub struct BossTimer {
    /// Сколько секунд осталось (None = не запланирован)
    pub remaining: Option<f32>,
}

impl BossTimer {
    pub fn new(delay: Option<f32>) -> Self {
        Self { remaining: delay }
    }

    /// Возвращает true ровно один раз, когда таймер истёк
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining -= delta;
        if *remaining <= 0.0 {
            self.remaining = None;
            return true;
        }
        false
    }
}

/// Случайная точка на поле не ближе `min_distance` к `avoid`
pub fn pick_spawn_point(
    rng: &mut impl Rng,
    playfield: &Playfield,
    avoid: Vec2,
    min_distance: f32,
    max_attempts: u32,
) -> Vec2 {
    let mut sample = playfield.center();
    for _ in 0..max_attempts.max(1) {
        sample = Vec2::new(
            rng.gen_range(0.0..=playfield.width),
            rng.gen_range(0.0..=playfield.height),
        );
        if sample.distance(avoid) >= min_distance {
            return sample;
        }
    }
    sample
}

/// Спавнит игрока выбранного класса
pub fn spawn_player(world: &mut World, class: PlayerClass, position: Vec2) -> Entity {
    let (fire_bolt_count, sp_regen_rate) = world
        .get_resource::<SimulationConfig>()
        .map(|config| (config.fire_bolt_count, config.sp_regen_rate))
        .unwrap_or((crate::skills::FIRE_BOLT_DEFAULT, 10.0));

    let profile = class.profile();
    let entity = world
        .spawn((
            profile.character_bundle(position, sp_regen_rate),
            Player { class },
            Progression::default(),
            SkillSlots::new(class.skills(fire_bolt_count)),
        ))
        .id();

    crate::log(&format!("🛡️ Spawned {:?} player {:?} at {:?}", class, entity, position));
    entity
}

/// Спавнит врага в заданной точке (High Orc получает GroundSlam)
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, position: Vec2) -> Entity {
    let sp_regen_rate = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.sp_regen_rate)
        .unwrap_or(10.0);

    let profile = kind.profile();
    let mut entity = world.spawn((
        profile.character_bundle(position, sp_regen_rate),
        Enemy {
            kind,
            exp_value: kind.exp_value(),
        },
    ));
    if kind == EnemyKind::HighOrc {
        entity.insert(GroundSlam::default());
    }
    entity.id()
}

fn player_position(world: &mut World) -> Vec2 {
    let mut players = world.query_filtered::<&Position, With<Player>>();
    let found = players.iter(world).next().map(|position| position.0);
    found.unwrap_or_else(|| {
        world
            .get_resource::<Playfield>()
            .copied()
            .unwrap_or_default()
            .center()
    })
}

fn spawn_point(world: &mut World, min_distance: f32) -> Vec2 {
    let avoid = player_position(world);
    let playfield = world.get_resource::<Playfield>().copied().unwrap_or_default();
    let max_attempts = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.spawn_max_attempts)
        .unwrap_or(64);

    match world.get_resource_mut::<DeterministicRng>() {
        Some(mut rng) => pick_spawn_point(
            &mut rng.rng,
            &playfield,
            avoid,
            min_distance,
            max_attempts,
        ),
        None => playfield.center(),
    }
}

/// Волна из `count` орков вдали от игрока
pub fn spawn_wave(world: &mut World, count: u32) -> Vec<Entity> {
    let min_distance = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.wave_min_distance)
        .unwrap_or(200.0);

    let spawned: Vec<Entity> = (0..count)
        .map(|_| {
            let position = spawn_point(world, min_distance);
            spawn_enemy(world, EnemyKind::Orc, position)
        })
        .collect();

    crate::log_info(&format!("🧌 Spawned wave of {} orcs", spawned.len()));
    spawned
}

/// High Orc вдали от игрока + сообщение
pub fn spawn_boss(world: &mut World) -> Entity {
    let min_distance = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.boss_min_distance)
        .unwrap_or(300.0);

    let position = spawn_point(world, min_distance);
    let boss = spawn_enemy(world, EnemyKind::HighOrc, position);

    if let Some(mut log) = world.get_resource_mut::<EventLog>() {
        log.message("A High Orc has appeared!");
    }
    crate::log_warning(&format!("👹 High Orc {:?} appeared at {:?}", boss, position));
    boss
}

/// Exclusive system: отсчёт таймера босса
pub fn tick_boss_timer(world: &mut World) {
    let delta = world
        .get_resource::<Time>()
        .map(|time| time.delta_secs())
        .unwrap_or(0.0);
    let due = world
        .get_resource_mut::<BossTimer>()
        .is_some_and(|mut timer| timer.tick(delta));
    if due {
        spawn_boss(world);
    }
}

/// Spawn Plugin: таймер босса в конце тика (после compaction)
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BossTimer>();
        app.add_systems(SimulationTick, tick_boss_timer.in_set(TickSet::Spawning));
    }
}

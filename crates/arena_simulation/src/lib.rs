//! ARENA Simulation Core
//!
//! Real-time arena skirmish на Bevy 0.16 ECS (headless).
//! Игрок (Knight / Wizard) против орков и High Orc босса.
//!
//! Симуляция ничего не рисует и не читает ввод напрямую:
//! - вход: intent-методы `Simulation` (move_to, engage, use_skill, ...)
//! - выход: список `GameEvent` из каждого `tick()` + `snapshot()`
//!
//! Тик = один синхронный прогон расписания `SimulationTick`; порядок фаз
//! фиксирован через `TickSet`, поэтому при одном seed результат детерминирован.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod events;
pub mod logger;
pub mod movement;
pub mod profile;
pub mod projectile;
pub mod simulation;
pub mod skills;
pub mod snapshot;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::AIPlugin;
pub use combat::{AttackType, Attacker, CombatPlugin, GroundSlam};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use events::{AreaShape, EventLog, GameEvent};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use movement::MovementPlugin;
pub use profile::CharacterProfile;
pub use projectile::{Playfield, Projectile, ProjectileKind, ProjectilePlugin};
pub use simulation::{Simulation, MAX_TICK_SECS};
pub use skills::{CastRejection, CastState, Skill, SkillPlugin, SkillSchedule, SkillSlots};
pub use snapshot::RenderSnapshot;
pub use spawn::{BossTimer, SpawnPlugin};

/// Расписание одного тика симуляции (запускается вручную из `Simulation::tick`)
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationTick;

/// Фазы тика (строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Cooldown'ы, каст, регенерация SP
    Timers,
    /// Движение и facing игрока
    PlayerMovement,
    /// Авто-атака игрока
    PlayerAttack,
    /// AI врагов: цель → движение → атака
    Enemies,
    /// Ground slam
    EnemySpecials,
    /// Созревшие hit'ы скиллов
    Skills,
    Projectiles,
    Collisions,
    /// Compaction: опыт за убийства, удаление мертвых и expired
    Cleanup,
    /// Таймер босса
    Spawning,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Ресурсы, вставленные до плагина (SimulationConfig, DeterministicRng,
/// Playfield, BossTimer), не перезаписываются.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }
        if !app.world().contains_resource::<Playfield>() {
            app.insert_resource(Playfield {
                width: config.playfield_width,
                height: config.playfield_height,
            });
        }
        if !app.world().contains_resource::<BossTimer>() {
            app.insert_resource(BossTimer::new(config.boss_spawn_delay));
        }

        app.insert_resource(config)
            .init_resource::<Time>()
            .init_resource::<EventLog>()
            .init_schedule(SimulationTick)
            .configure_sets(
                SimulationTick,
                (
                    TickSet::Timers,
                    TickSet::PlayerMovement,
                    TickSet::PlayerAttack,
                    TickSet::Enemies,
                    TickSet::EnemySpecials,
                    TickSet::Skills,
                    TickSet::Projectiles,
                    TickSet::Collisions,
                    TickSet::Cleanup,
                    TickSet::Spawning,
                )
                    .chain(),
            );

        app.register_type::<Position>()
            .register_type::<Health>()
            .register_type::<SkillPoints>()
            .register_type::<Progression>();

        // Подсистемы
        app.add_plugins((
            CombatPlugin,
            SkillPlugin,
            MovementPlugin,
            AIPlugin,
            ProjectilePlugin,
            SpawnPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Без MinimalPlugins: время двигает только `Simulation::tick`.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.insert_resource(DeterministicRng::new(seed))
        .init_resource::<Time>();

    app
}

/// Snapshot мира для сравнения детерминизма
/// (Debug-представление компонентов, отсортированное по Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity для детерминизма
    entities.sort_by_key(|(entity, _)| entity.to_bits());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.to_bits().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

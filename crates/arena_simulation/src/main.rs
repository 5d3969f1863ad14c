//! Headless симуляция ARENA
//!
//! Запускает симуляцию без рендера со scripted игроком.
//! Использование: arena_simulation [config.ron] [knight|wizard]

use arena_simulation::{
    log_error, log_info, GameEvent, PlayerClass, Simulation, SimulationConfig,
};

const TICK_MS: f32 = 1000.0 / 60.0;
const TICK_COUNT: u32 = 60 * 90;

fn main() {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Failed to load config: {}", error);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    let class = match args.next().as_deref() {
        Some("wizard") => PlayerClass::Wizard,
        _ => PlayerClass::Knight,
    };

    println!("Starting ARENA headless simulation (seed: {}, class: {:?})", config.seed, class);

    let mut sim = match Simulation::new(config, class) {
        Ok(sim) => sim,
        Err(error) => {
            log_error(&format!("Invalid config: {}", error));
            std::process::exit(1);
        }
    };

    let mut kills = 0;
    let mut damage_dealt = 0.0;

    for tick in 0..TICK_COUNT {
        // Scripted игрок: цель = первый живой враг, скиллы по кругу
        if tick % 30 == 0 && sim.is_player_alive() {
            if let Some(enemy) = sim.enemies().first().copied() {
                sim.engage(enemy);
            }
            let slot = (tick / 30) as usize % 3;
            sim.use_skill(slot);
        }

        for event in sim.tick(TICK_MS) {
            match event {
                GameEvent::Died { entity, .. } if entity != sim.player() => kills += 1,
                GameEvent::DamageDealt {
                    attacker: Some(attacker),
                    amount,
                    ..
                } if attacker == sim.player() => damage_dealt += amount,
                GameEvent::Message { text } => log_info(&format!("💬 {}", text)),
                _ => {}
            }
        }

        if tick % 600 == 0 {
            let snapshot = sim.snapshot();
            println!(
                "Tick {}: {} enemies, {} projectiles, player {:?}",
                tick,
                snapshot.enemies.len(),
                snapshot.projectiles.len(),
                snapshot.player.map(|p| (p.level, p.hp as u32))
            );
        }

        if !sim.is_player_alive() {
            println!("Player died at tick {}", tick);
            break;
        }
    }

    println!(
        "Simulation complete! kills: {}, damage dealt by player: {:.0}",
        kills, damage_dealt
    );
}

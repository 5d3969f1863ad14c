//! Skills integration test
//!
//! Активация (отказы и оплата), расписание hit'ов при разной нарезке кадров,
//! конус / круг / взрыв Fireball, аннулирование hit'ов мертвого кастера.

use arena_simulation::spawn::spawn_enemy;
use arena_simulation::*;
use bevy::prelude::*;

fn quiet_arena(class: PlayerClass) -> Simulation {
    let config = SimulationConfig {
        initial_wave: 0,
        boss_spawn_delay: None,
        ..Default::default()
    };
    Simulation::new(config, class).unwrap()
}

fn place(sim: &mut Simulation, entity: Entity, x: f32, y: f32) {
    sim.world_mut().get_mut::<Position>(entity).unwrap().0 = Vec2::new(x, y);
}

fn hp(sim: &Simulation, entity: Entity) -> f32 {
    sim.world().get::<Health>(entity).unwrap().current
}

fn sp(sim: &Simulation) -> f32 {
    sim.world().get::<SkillPoints>(sim.player()).unwrap().current
}

/// Авто-атака игрока не мешает считать урон скиллов
fn suppress_auto_attack(sim: &mut Simulation) {
    let player = sim.player();
    sim.world_mut().get_mut::<Attacker>(player).unwrap().cooldown_timer = 1000.0;
}

fn messages(events: &[GameEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Message { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn hits_by(events: &[GameEvent], attacker: Entity) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::DamageDealt { attacker: Some(a), .. } if *a == attacker))
        .count()
}

/// Knight (400,300) + Orc вплотную, Spiral Pierce по орку
fn spiral_pierce_setup() -> (Simulation, Entity) {
    let mut sim = quiet_arena(PlayerClass::Knight);
    let player = sim.player();
    place(&mut sim, player, 400.0, 300.0);
    suppress_auto_attack(&mut sim);
    let orc = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(440.0, 300.0));

    assert!(sim.set_attack_target(Some(orc)));
    assert!(sim.use_skill(0));
    (sim, orc)
}

/// Test: Wizard с 20 SP, Fireball и Fire Bolt отклоняются, ничего не меняется
#[test]
fn test_not_enough_sp_rejects_without_side_effects() {
    let mut sim = quiet_arena(PlayerClass::Wizard);
    let player = sim.player();
    let orc = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(500.0, 300.0));
    sim.world_mut().get_mut::<SkillPoints>(player).unwrap().current = 20.0;

    assert!(!sim.use_skill(1));
    assert!(!sim.use_skill_on(0, Some(orc)));

    let events = sim.tick(0.0);
    assert_eq!(
        messages(&events),
        vec!["Not enough SP!".to_string(), "Not enough SP!".to_string()]
    );
    assert_eq!(sp(&sim), 20.0);
    assert!(!sim.world().get::<CastState>(player).unwrap().casting);
    assert!(sim.world().resource::<SkillSchedule>().is_empty());

    let snapshot = sim.snapshot();
    assert!(snapshot.projectiles.is_empty());
    let skills = snapshot.player.unwrap().skills;
    assert!(skills.iter().all(|skill| skill.cooldown_remaining == 0.0));
}

/// Test: отказы с причиной в Message, порядок проверок
#[test]
fn test_rejection_messages() {
    let mut sim = quiet_arena(PlayerClass::Knight);

    // Slot вне списка
    assert!(!sim.use_skill(5));
    // Locked скилл без цели
    assert!(!sim.use_skill(0));
    let events = sim.tick(0.0);
    assert_eq!(
        messages(&events),
        vec!["No skill in that slot!".to_string(), "No target!".to_string()]
    );
    assert_eq!(sp(&sim), 500.0);

    // Magnum Break → каст 0.8s, повторная активация во время каста
    assert!(sim.use_skill(2));
    assert!(!sim.use_skill(1));
    let events = sim.tick(0.0);
    assert_eq!(messages(&events), vec!["Already casting a skill!".to_string()]);
    assert_eq!(sp(&sim), 400.0);

    // Каст закончился, cooldown 10s ещё идёт
    sim.tick(1000.0);
    assert!(!sim.use_skill(2));
    let events = sim.tick(0.0);
    assert_eq!(messages(&events), vec!["Skill is on cooldown!".to_string()]);
}

/// Test: успешная активация платит SP, ставит cooldown и каст, шлёт SkillCast
#[test]
fn test_activation_pays_and_starts_cast() {
    let (mut sim, _orc) = spiral_pierce_setup();
    let player = sim.player();

    assert_eq!(sp(&sim), 470.0);
    let cast = *sim.world().get::<CastState>(player).unwrap();
    assert!(cast.casting);
    assert_eq!(cast.total, 0.5);
    assert_eq!(sim.world().get::<SkillSlots>(player).unwrap().cooldown(0), 5.0);
    assert_eq!(sim.world().resource::<SkillSchedule>().len(), 3);

    let events = sim.tick(0.0);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::SkillCast { caster, skill: "Spiral Pierce", .. } if *caster == player
    )));

    // Во время каста игрок не двигается
    assert!(!sim.move_to(100.0, 100.0));
}

/// Test: число hit'ов не зависит от нарезки кадров
#[test]
fn test_spiral_pierce_frame_slicing() {
    for (ticks, delta_ms) in [(1, 1000.0), (8, 125.0), (16, 62.5)] {
        let (mut sim, orc) = spiral_pierce_setup();
        let player = sim.player();

        let mut hits = 0;
        for _ in 0..ticks {
            hits += hits_by(&sim.tick(delta_ms), player);
        }

        assert_eq!(hits, 3, "{} × {}ms", ticks, delta_ms);
        assert!((hp(&sim, orc) - (500.0 - 3.0 * 84.0)).abs() < 1e-3);
        assert!(sim.world().resource::<SkillSchedule>().is_empty());
    }
}

/// Test: к концу каста (0.5s) сработал ровно первый hit
#[test]
fn test_spiral_pierce_first_hit_at_cast_end() {
    let (mut sim, orc) = spiral_pierce_setup();
    let player = sim.player();

    let events = sim.tick(500.0);
    assert_eq!(hits_by(&events, player), 1);
    assert!((hp(&sim, orc) - 416.0).abs() < 1e-3);
    assert_eq!(sim.world().resource::<SkillSchedule>().len(), 2);
}

/// Test: при 60 fps первый hit Spiral Pierce (0.5s) приходится ровно на 30-й кадр
#[test]
fn test_spiral_pierce_first_hit_on_frame_30_at_60_fps() {
    let (mut sim, _orc) = spiral_pierce_setup();
    let player = sim.player();

    let first_hit_frame = (1..=60).find(|_| hits_by(&sim.tick(1000.0 / 60.0), player) > 0);
    assert_eq!(first_hit_frame, Some(30));
}

/// Test: Brandish бьёт конус перед Knight, за спиной, нет
#[test]
fn test_brandish_cone() {
    let mut sim = quiet_arena(PlayerClass::Knight);
    let player = sim.player();
    place(&mut sim, player, 400.0, 300.0);
    sim.world_mut().get_mut::<Facing>(player).unwrap().0 = 0.0;
    suppress_auto_attack(&mut sim);

    let front = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(460.0, 300.0));
    let behind = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(340.0, 300.0));

    assert!(sim.use_skill(1));
    let events = sim.tick(1000.0);

    assert!((hp(&sim, front) - 395.0).abs() < 1e-3);
    assert_eq!(hp(&sim, behind), 500.0);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::AreaHit { shape: AreaShape::Cone { .. }, radius, .. } if *radius == 120.0
    )));
}

/// Test: Magnum Break бьёт всех в радиусе 100 вокруг Knight
#[test]
fn test_magnum_break_area() {
    let mut sim = quiet_arena(PlayerClass::Knight);
    let player = sim.player();
    place(&mut sim, player, 400.0, 300.0);
    suppress_auto_attack(&mut sim);

    let near = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(480.0, 300.0));
    let far = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(400.0, 500.0));

    assert!(sim.use_skill(2));
    let events = sim.tick(1000.0);

    assert!((hp(&sim, near) - 360.0).abs() < 1e-3);
    assert_eq!(hp(&sim, far), 500.0);
    assert!((sp(&sim) - 410.0).abs() < 1e-3);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::AreaHit { shape: AreaShape::Circle, radius, .. } if *radius == 100.0
    )));
}

/// Test: Fireball, прямое попадание + splash соседу
#[test]
fn test_fireball_explosion_splash() {
    let mut sim = quiet_arena(PlayerClass::Wizard);
    let player = sim.player();
    place(&mut sim, player, 100.0, 300.0);

    let struck = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(300.0, 300.0));
    let neighbour = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(300.0, 310.0));

    // NearestInRange: цель выбирается сама
    assert!(sim.use_skill(1));

    let mut explosions = 0;
    for _ in 0..60 {
        explosions += sim
            .tick(50.0)
            .iter()
            .filter(|e| matches!(e, GameEvent::AreaHit { radius, .. } if *radius == 50.0))
            .count();
    }

    assert_eq!(explosions, 1);
    // 80 прямой + 40 splash
    assert!((hp(&sim, struck) - 380.0).abs() < 1e-3);
    assert!((hp(&sim, neighbour) - 460.0).abs() < 1e-3);
    assert!(sim.snapshot().projectiles.is_empty());
}

/// Test: Fireball без врага в радиусе атаки → No target!
#[test]
fn test_fireball_needs_enemy_in_range() {
    let mut sim = quiet_arena(PlayerClass::Wizard);
    let player = sim.player();
    place(&mut sim, player, 100.0, 300.0);
    spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(700.0, 300.0));

    assert!(!sim.use_skill(1));
    let events = sim.tick(0.0);
    assert_eq!(messages(&events), vec!["No target!".to_string()]);
    assert_eq!(sp(&sim), 500.0);
}

/// Test: мертвый кастер, hit'ы аннулируются
#[test]
fn test_dead_caster_voids_pending_hits() {
    let (mut sim, orc) = spiral_pierce_setup();
    let player = sim.player();

    sim.world_mut().get_mut::<Health>(player).unwrap().current = 0.0;
    let events = sim.tick(1000.0);

    assert_eq!(hits_by(&events, player), 0);
    assert_eq!(hp(&sim, orc), 500.0);
    assert!(sim.world().resource::<SkillSchedule>().is_empty());
}

/// Test: цель умерла до hit'а, оставшиеся hit'ы тихо пропадают
#[test]
fn test_hits_on_dead_target_are_skipped() {
    let (mut sim, orc) = spiral_pierce_setup();
    let player = sim.player();
    sim.world_mut().get_mut::<Health>(orc).unwrap().current = 50.0;

    let events = sim.tick(1000.0);
    assert_eq!(hits_by(&events, player), 1);
    let died = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Died { entity, .. } if *entity == orc))
        .count();
    assert_eq!(died, 1);
}

/// Test: число болтов Fire Bolt меняется только у Wizard
#[test]
fn test_set_fire_bolt_count() {
    let mut sim = quiet_arena(PlayerClass::Wizard);
    let player = sim.player();

    assert!(sim.set_fire_bolt_count(3));
    let bolt = sim.world().get::<SkillSlots>(player).unwrap().get(0).cloned().unwrap();
    assert_eq!(bolt.sp_cost, 24.0);
    assert_eq!(bolt.hit_offsets().len(), 3);

    // Зажимается в 1..=10
    assert!(sim.set_fire_bolt_count(50));
    let bolt = sim.world().get::<SkillSlots>(player).unwrap().get(0).cloned().unwrap();
    assert_eq!(bolt.sp_cost, 80.0);
    assert_eq!(sim.world().resource::<SimulationConfig>().fire_bolt_count, 10);

    let mut knight = quiet_arena(PlayerClass::Knight);
    assert!(!knight.set_fire_bolt_count(3));
}

/// Test: Fire Bolt ставит по hit'у на болт, болты вылетают после каста
#[test]
fn test_fire_bolt_schedules_one_hit_per_bolt() {
    let mut sim = quiet_arena(PlayerClass::Wizard);
    let player = sim.player();
    place(&mut sim, player, 400.0, 300.0);
    suppress_auto_attack(&mut sim);
    let orc = spawn_enemy(sim.world_mut(), EnemyKind::Orc, Vec2::new(600.0, 300.0));

    assert!(sim.set_fire_bolt_count(3));
    assert!(sim.use_skill_on(0, Some(orc)));
    assert_eq!(sim.world().resource::<SkillSchedule>().len(), 3);
    assert_eq!(sp(&sim), 476.0);

    // До конца каста (0.6s) болтов нет
    sim.tick(500.0);
    assert!(sim.snapshot().projectiles.is_empty());

    // 0.65s: первый болт уже в полёте, второй (0.8s) ещё нет
    sim.tick(150.0);
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.projectiles.len(), 1);
    assert_eq!(snapshot.projectiles[0].kind, ProjectileKind::FireBolt);
    assert_eq!(sim.world().resource::<SkillSchedule>().len(), 2);
}

//! Integration coverage driving the world through full command sequences.

use std::time::Duration;

use bug_battle_core::{
    AbilityRejection, AllyKind, Command, EnemyKind, Event, MatchState, RemovalCause,
    SpawnRejection, TowerSide, UnitId,
};
use bug_battle_world::{apply, query, Config, UnitTemplate, World};

const BASE_TICK: Duration = Duration::from_micros(16_667);

fn apply_one(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    apply_one(world, Command::Tick { dt })
}

fn spawned_id(events: &[Event]) -> UnitId {
    events
        .iter()
        .find_map(|event| match event {
            Event::UnitSpawned { id, .. } => Some(*id),
            _ => None,
        })
        .expect("spawn was accepted")
}

fn templated(
    config: &mut Config,
    ally: UnitTemplate,
    enemy: UnitTemplate,
) {
    config.ally_templates = AllyKind::ALL.iter().map(|kind| (*kind, ally)).collect();
    config.enemy_templates = EnemyKind::ALL.iter().map(|kind| (*kind, enemy)).collect();
}

/// Both populations parked out of collision range, abilities observable in
/// isolation.
fn stationary_world() -> World {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 0.0,
        },
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 0.0,
        },
    );
    World::new(config).expect("complete template table")
}

#[test]
fn combat_resolves_the_worked_damage_numbers() {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 15,
            defense: 12,
            speed: 2.0,
        },
        UnitTemplate {
            hp: 400,
            attack: 15,
            defense: 10,
            speed: 1.5,
        },
    );
    let mut world = World::new(config).expect("complete template table");
    let _ = apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Rhinoceros,
        },
    );
    let _ = apply_one(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    );

    let mut first_exchange = None;
    for _ in 0..600 {
        let events = tick(&mut world, Duration::from_millis(100));
        if let Some((to_ally, to_enemy)) = events.iter().find_map(|event| match event {
            Event::CombatResolved {
                damage_to_ally,
                damage_to_enemy,
                ..
            } => Some((*damage_to_ally, *damage_to_enemy)),
            _ => None,
        }) {
            first_exchange = Some((to_ally, to_enemy));
            break;
        }
    }

    // Ally attack 15 vs defense 10 deals 5; enemy attack 15 vs defense 12
    // deals 3, both in the same pass.
    assert_eq!(first_exchange, Some((3, 5)));
}

#[test]
fn combat_death_is_graceful_and_bounded_at_zero() {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 200,
            defense: 15,
            speed: 2.0,
        },
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 1.5,
        },
    );
    let mut world = World::new(config).expect("complete template table");
    let _ = apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Rhinoceros,
        },
    );
    let enemy = spawned_id(&apply_one(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    ));

    let mut removal = None;
    for _ in 0..600 {
        let events = tick(&mut world, Duration::from_millis(100));
        if let Some(found) = events.iter().find_map(|event| match event {
            Event::UnitRemoved { id, cause } => Some((*id, *cause)),
            _ => None,
        }) {
            removal = Some(found);
            break;
        }
        // During the dying grace period the corpse stays visible at zero hp
        // but no longer counts against the population cap.
        if let Some(snapshot) = query::enemy_view(&world).iter().find(|unit| unit.dying) {
            assert_eq!(snapshot.hp, 0);
            assert_eq!(query::live_enemy_count(&world), 0);
        }
    }

    assert_eq!(removal, Some((enemy, RemovalCause::CombatDeath)));
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::live_ally_count(&world), 1);
}

#[test]
fn tower_countdown_ends_the_match_exactly_once() {
    let mut config = Config::default();
    config.tower_impact_damage = 3;
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 0.0,
        },
        // Fast enough to cross the lane in a single base tick.
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 700.0,
        },
    );
    let mut world = World::new(config).expect("complete template table");

    let mut hp_changes = 0;
    let mut endings = Vec::new();
    for _ in 0..34 {
        let _ = apply_one(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Mantis,
            },
        );
        for event in tick(&mut world, BASE_TICK) {
            match event {
                Event::TowerHpChanged {
                    side: TowerSide::Player,
                    ..
                } => hp_changes += 1,
                Event::MatchEnded { winner } => endings.push(winner),
                _ => {}
            }
        }
    }

    // Tower hp 100 at 3 per impact: the 34th hit lands the zero.
    assert_eq!(hp_changes, 34);
    assert_eq!(endings, vec![TowerSide::Enemy]);
    assert_eq!(query::match_state(&world), MatchState::PlayerLoss);
    assert_eq!(query::tower(&world, TowerSide::Player).hp, 0);

    // Terminal: every command except reset is ignored outright.
    assert!(apply_one(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    )
    .is_empty());
    assert!(tick(&mut world, Duration::from_secs(1)).is_empty());
    assert_eq!(query::tower(&world, TowerSide::Player).hp, 0);

    let events = apply_one(&mut world, Command::Reset);
    assert_eq!(events, vec![Event::MatchReset]);
    assert_eq!(query::match_state(&world), MatchState::Active);
    assert_eq!(query::tower(&world, TowerSide::Player).hp, 100);
}

#[test]
fn felling_the_enemy_tower_wins_the_match() {
    let mut config = Config::default();
    config.tower_impact_damage = 100;
    templated(
        &mut config,
        // Crosses roughly a third of the lane per base tick at the level-1
        // ally multiplier.
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 450.0,
        },
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 0.0,
        },
    );
    let mut world = World::new(config).expect("complete template table");
    let ally = spawned_id(&apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Caucasus,
        },
    ));

    let mut events = Vec::new();
    for _ in 0..3 {
        events.extend(tick(&mut world, BASE_TICK));
    }

    assert!(events.contains(&Event::UnitRemoved {
        id: ally,
        cause: RemovalCause::TowerImpact,
    }));
    assert!(events.contains(&Event::MatchEnded {
        winner: TowerSide::Player,
    }));
    assert_eq!(query::match_state(&world), MatchState::PlayerWin);
    assert_eq!(query::tower(&world, TowerSide::Enemy).hp, 0);
}

#[test]
fn ability_reuse_waits_out_the_full_cooldown() {
    let mut world = stationary_world();
    let ally = spawned_id(&apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Rhinoceros,
        },
    ));

    // No live enemy: the cast still lands and still consumes the cooldown.
    assert_eq!(
        apply_one(&mut world, Command::UseAbility { ally }),
        vec![Event::AbilityUsed { ally }]
    );
    assert_eq!(
        apply_one(&mut world, Command::UseAbility { ally }),
        vec![Event::AbilityRejected {
            ally,
            reason: AbilityRejection::CoolingDown,
        }]
    );

    let _ = tick(&mut world, Duration::from_secs(10));
    assert_eq!(
        apply_one(&mut world, Command::UseAbility { ally }),
        vec![Event::AbilityUsed { ally }]
    );
}

#[test]
fn unknown_caster_is_rejected_informationally() {
    let mut world = stationary_world();
    let ghost = UnitId::new(777);
    assert_eq!(
        apply_one(&mut world, Command::UseAbility { ally: ghost }),
        vec![Event::AbilityRejected {
            ally: ghost,
            reason: AbilityRejection::UnknownCaster,
        }]
    );
}

#[test]
fn horn_charge_slows_the_target_and_boosts_then_reverts_defense() {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 0.0,
        },
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 0.1,
        },
    );
    let mut world = World::new(config).expect("complete template table");
    let ally = spawned_id(&apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Rhinoceros,
        },
    ));
    let _ = apply_one(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    );

    let _ = apply_one(&mut world, Command::UseAbility { ally });
    let boosted = query::ally_view(&world).into_vec()[0];
    assert_eq!(boosted.defense, 25);
    let slowed = query::enemy_view(&world).into_vec()[0];
    assert!((slowed.speed - 0.05).abs() < 1e-6);

    // The boost lapses after five seconds; the slow is permanent.
    let _ = tick(&mut world, Duration::from_secs(5));
    let reverted = query::ally_view(&world).into_vec()[0];
    assert_eq!(reverted.defense, 15);
    let still_slowed = query::enemy_view(&world).into_vec()[0];
    assert!((still_slowed.speed - 0.05).abs() < 1e-6);
}

#[test]
fn venom_pinch_poison_fells_a_weak_enemy_before_expiry() {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 0.0,
        },
        UnitTemplate {
            hp: 8,
            attack: 8,
            defense: 4,
            speed: 0.0,
        },
    );
    let mut world = World::new(config).expect("complete template table");
    let ally = spawned_id(&apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Stag,
        },
    ));
    let enemy = spawned_id(&apply_one(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    ));

    let _ = apply_one(&mut world, Command::UseAbility { ally });
    let pinched = query::enemy_view(&world).into_vec()[0];
    assert_eq!(pinched.defense, 2);

    // Two points per tick against eight hp: dead after four half-second
    // ticks, removed once the grace period lapses.
    let mut removal = None;
    for _ in 0..20 {
        let events = tick(&mut world, Duration::from_millis(500));
        if let Some(found) = events.iter().find_map(|event| match event {
            Event::UnitRemoved { id, cause } => Some((*id, *cause)),
            _ => None,
        }) {
            removal = Some(found);
            break;
        }
    }
    assert_eq!(removal, Some((enemy, RemovalCause::PoisonDeath)));
}

#[test]
fn ally_population_cap_rejects_the_ninth_reinforcement() {
    let mut world = stationary_world();

    // Requests spaced past the rate limit: the first eight fill the cap.
    let mut rejections = Vec::new();
    for request in 0..10 {
        let kind = AllyKind::ALL[request % AllyKind::ALL.len()];
        for event in apply_one(&mut world, Command::SpawnAlly { kind }) {
            if let Event::SpawnRejected { side, reason } = event {
                rejections.push((side, reason));
            }
        }
        let _ = tick(&mut world, Duration::from_secs(2));
    }

    assert_eq!(query::live_ally_count(&world), 8);
    assert_eq!(
        rejections,
        vec![
            (TowerSide::Player, SpawnRejection::PopulationCap),
            (TowerSide::Player, SpawnRejection::PopulationCap),
        ]
    );
}

#[test]
fn runaway_enemy_is_cleaned_up_out_of_bounds() {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 0.0,
        },
        // Overshoots the whole lane and the cleanup margin in one base tick.
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 900.0,
        },
    );
    let mut world = World::new(config).expect("complete template table");
    let enemy = spawned_id(&apply_one(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    ));

    let events = tick(&mut world, BASE_TICK);

    assert!(events.contains(&Event::UnitRemoved {
        id: enemy,
        cause: RemovalCause::OutOfBounds,
    }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::TowerHpChanged { .. })));
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::tower(&world, TowerSide::Player).hp, 100);
}

#[test]
fn ally_requests_are_accepted_again_after_the_interval() {
    let mut world = stationary_world();
    let _ = apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Rhinoceros,
        },
    );
    assert!(apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Stag,
        },
    )
    .contains(&Event::SpawnRejected {
        side: TowerSide::Player,
        reason: SpawnRejection::RateLimited,
    }));

    let _ = tick(&mut world, Duration::from_secs(1));
    let events = apply_one(
        &mut world,
        Command::SpawnAlly {
            kind: AllyKind::Stag,
        },
    );
    assert!(matches!(events.as_slice(), [Event::UnitSpawned { .. }]));
    assert_eq!(query::live_ally_count(&world), 2);
}

#[test]
fn level_ups_speed_up_the_enemy_advance() {
    let mut config = Config::default();
    templated(
        &mut config,
        UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 0.0,
        },
        UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 10.0,
        },
    );
    let mut config_world = World::new(config).expect("complete template table");

    let _ = apply_one(
        &mut config_world,
        Command::SpawnEnemy {
            kind: EnemyKind::Beetle,
        },
    );
    let _ = tick(&mut config_world, BASE_TICK);
    let level_one_position = query::enemy_view(&config_world).into_vec()[0].position;

    // Push the same world to level five and compare one tick of travel.
    for _ in 0..40 {
        let _ = apply_one(&mut config_world, Command::RecordCorrectAnswer);
    }
    assert_eq!(query::level(&config_world), 5);
    let before = query::enemy_view(&config_world).into_vec()[0].position;
    let _ = tick(&mut config_world, BASE_TICK);
    let after = query::enemy_view(&config_world).into_vec()[0].position;

    let level_one_step = level_one_position - 150.0;
    let level_five_step = after - before;
    assert!(level_five_step > level_one_step);
    assert!((level_five_step / level_one_step - 2.0).abs() < 1e-3);
}

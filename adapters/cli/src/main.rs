#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted headless Bug Battle match.

use std::time::Duration;

use anyhow::Context;
use bug_battle_core::{AllyKind, Event, TowerSide};
use bug_battle_cli::Session;
use bug_battle_system_spawning::Config as SpawnConfig;
use bug_battle_world::{query, Config};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bug-battle", about = "Runs a scripted headless Bug Battle match")]
struct Args {
    /// Simulated match length in seconds.
    #[arg(long, default_value_t = 120)]
    seconds: u64,

    /// Tick length in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Seed for the enemy spawn scheduler.
    #[arg(long, default_value_t = 0x4275_6742_6174_746c)]
    seed: u64,

    /// Seconds between scripted ally reinforcements.
    #[arg(long, default_value_t = 3)]
    ally_cadence: u64,

    /// Seconds between scripted correct quiz answers.
    #[arg(long, default_value_t = 2)]
    answer_cadence: u64,
}

/// Entry point for the Bug Battle command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.tick_ms > 0, "tick length must be positive");

    let spawn_config = SpawnConfig::new(Duration::from_secs(5), args.seed);
    let mut session = Session::new(Config::default(), spawn_config)
        .context("failed to start the battle session")?;

    let dt = Duration::from_millis(args.tick_ms);
    let total = Duration::from_secs(args.seconds);
    let ally_cadence = Duration::from_secs(args.ally_cadence.max(1));
    let answer_cadence = Duration::from_secs(args.answer_cadence.max(1));

    let mut elapsed = Duration::ZERO;
    let mut next_ally = Duration::ZERO;
    let mut next_answer = answer_cadence;
    let mut ally_rotation = AllyKind::ALL.iter().cycle();
    let mut winner = None;

    while elapsed < total && winner.is_none() {
        if elapsed >= next_ally {
            if let Some(kind) = ally_rotation.next() {
                let _ = session.request_ally_spawn(*kind);
            }
            next_ally += ally_cadence;
        }
        if elapsed >= next_answer {
            let _ = session.record_correct_answer();
            next_answer += answer_cadence;
        }
        for cooldown in query::ability_cooldowns(session.world()) {
            if cooldown.ready_in.is_zero() {
                let _ = session.use_ability(cooldown.ally);
            }
        }

        for event in session.tick(dt) {
            match event {
                Event::TowerHpChanged { side, hp, max_hp } => {
                    println!("[{elapsed:>7.1?}] {side:?} tower at {hp}/{max_hp}");
                }
                Event::LevelChanged { level } => {
                    println!("[{elapsed:>7.1?}] difficulty raised to level {level}");
                }
                Event::MatchEnded { winner: side } => winner = Some(side),
                _ => {}
            }
        }
        elapsed += dt;
    }

    let world = session.world();
    match winner {
        Some(TowerSide::Player) => println!("player wins: the enemy tower has fallen"),
        Some(TowerSide::Enemy) => println!("player loses: the player tower has fallen"),
        None => println!("time expired with both towers standing"),
    }
    println!(
        "clock {:?}, level {}, allies {}, enemies {}",
        query::clock(world),
        query::level(world),
        query::live_ally_count(world),
        query::live_enemy_count(world),
    );
    Ok(())
}

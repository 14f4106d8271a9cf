#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy spawn scheduling for the battle lane.
//!
//! The system accumulates simulated time from [`Event::TimeAdvanced`] and
//! attempts one spawn per elapsed interval. An attempt is dropped when the
//! enemy population already sits at its cap or when the seeded probability
//! roll fails; accepted attempts pick a uniformly random enemy kind and emit
//! [`Command::SpawnEnemy`] for the world to execute. Ally spawning is
//! request-driven and rate-limited by the world itself, so it never appears
//! here.

use std::time::Duration;

use bug_battle_core::{Command, Difficulty, EnemyKind, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fraction of the difficulty's spawn probability that survives damping.
const SPAWN_DAMPING: f32 = 0.7;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 0x4275_6742_6174_746c)
    }
}

/// Pure system that deterministically emits enemy spawn commands.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes tick events and emits spawn commands for elapsed intervals.
    ///
    /// `live_enemies` and `enemy_cap` describe the enemy population at the
    /// moment of the call; commands emitted earlier in the same call count
    /// against the cap so a single burst of accumulated time can never
    /// overshoot it.
    pub fn handle(
        &mut self,
        events: &[Event],
        difficulty: Difficulty,
        live_enemies: usize,
        enemy_cap: usize,
        out: &mut Vec<Command>,
    ) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let mut pending = live_enemies;

        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;

            if pending >= enemy_cap {
                continue;
            }
            if !self.roll_spawn(difficulty.enemy_spawn_probability) {
                continue;
            }

            let kind = self.select_kind();
            out.push(Command::SpawnEnemy { kind });
            pending += 1;
        }
    }

    fn roll_spawn(&mut self, probability: f32) -> bool {
        let threshold = probability * SPAWN_DAMPING;
        if threshold <= 0.0 {
            return false;
        }
        self.rng.gen::<f32>() < threshold
    }

    fn select_kind(&mut self) -> EnemyKind {
        let index = self.rng.gen_range(0..EnemyKind::ALL.len());
        EnemyKind::ALL[index]
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

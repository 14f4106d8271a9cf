#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration for headless Bug Battle matches.
//!
//! A [`Session`] owns the authoritative world and the enemy spawn scheduler
//! and drives them in a fixed order each tick: the world executes
//! `Command::Tick` first, then the tick events feed the scheduler, and any
//! spawn commands it emits are applied before the tick returns. Player-facing
//! operations forward single commands and hand back the raised events.

use std::time::Duration;

use bug_battle_core::{AllyKind, Command, Event, UnitId};
use bug_battle_system_spawning::{Config as SpawnConfig, Spawning};
use bug_battle_world::{apply, query, Config, ConfigError, World};

/// Drives one battle: world state plus the enemy spawn scheduler.
#[derive(Debug)]
pub struct Session {
    world: World,
    spawning: Spawning,
    spawn_config: SpawnConfig,
    enemy_cap: usize,
}

impl Session {
    /// Starts a session from a world configuration and a spawn schedule.
    pub fn new(config: Config, spawn_config: SpawnConfig) -> Result<Self, ConfigError> {
        let enemy_cap = config.max_enemies;
        Ok(Self {
            world: World::new(config)?,
            spawning: Spawning::new(spawn_config),
            spawn_config,
            enemy_cap,
        })
    }

    /// Advances the simulation by `dt` and returns every event raised,
    /// including those caused by scheduled enemy spawns.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut spawn_commands = Vec::new();
        self.spawning.handle(
            &events,
            query::difficulty(&self.world),
            query::live_enemy_count(&self.world),
            self.enemy_cap,
            &mut spawn_commands,
        );
        for command in spawn_commands {
            apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Requests one ally reinforcement of the given kind.
    pub fn request_ally_spawn(&mut self, kind: AllyKind) -> Vec<Event> {
        self.apply_one(Command::SpawnAlly { kind })
    }

    /// Invokes the ability bound to the given ally.
    pub fn use_ability(&mut self, ally: UnitId) -> Vec<Event> {
        self.apply_one(Command::UseAbility { ally })
    }

    /// Records one correct quiz answer toward the next difficulty level.
    pub fn record_correct_answer(&mut self) -> Vec<Event> {
        self.apply_one(Command::RecordCorrectAnswer)
    }

    /// Restarts the match: world state and the spawn schedule both return
    /// to their initial configuration, so a replay is deterministic.
    pub fn reset(&mut self) -> Vec<Event> {
        self.spawning = Spawning::new(self.spawn_config);
        self.apply_one(Command::Reset)
    }

    /// Read-only access to the underlying world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn apply_one(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        events
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state management for Bug Battle.
//!
//! The world owns the single entity arena for both populations, the two
//! tower health pools, the match state machine, and the difficulty
//! progression. Adapters mutate it exclusively through [`apply`], which
//! executes one [`Command`] and broadcasts the resulting [`Event`] values.
//! Within one tick the pipeline runs in a fixed stage order: movement,
//! tower collisions, unit combat, status-effect expiry, and finally the
//! scheduled-removal queue, so no stage ever observes a partially updated
//! later stage.

mod combat;
mod difficulty;
mod status;
mod towers;

use std::time::Duration;

use bug_battle_core::{
    AbilityKind, AbilityRejection, AllyKind, Command, Difficulty, EnemyKind, Event, MatchState,
    RemovalCause, SpawnRejection, StatChange, StatPatch, StatusKind, TowerSide, UnitId, UnitKind,
    UnitSnapshot,
};
use thiserror::Error;

use crate::difficulty::LevelProgression;
use crate::status::StatusEffect;
use crate::towers::Towers;

/// Lane coordinate of the enemy tower's facing edge; allies at or past it
/// resolve as tower hits.
pub const ENEMY_TOWER_EDGE: f32 = 100.0;
/// Lane coordinate of the player tower's facing edge; enemies at or past it
/// resolve as tower hits.
pub const PLAYER_TOWER_EDGE: f32 = 900.0;
/// Lane coordinate where newly spawned allies enter.
pub const ALLY_SPAWN_POSITION: f32 = 800.0;
/// Lane coordinate where newly spawned enemies enter.
pub const ENEMY_SPAWN_POSITION: f32 = 150.0;

// Cleanup margins sit well past the towers; crossing one is a safeguard
// against runaway entities, not a game event.
const ALLY_CLEANUP_BOUND: f32 = -200.0;
const ENEMY_CLEANUP_BOUND: f32 = 1_200.0;

// Movement speeds are tuned against a 60 Hz tick; other tick durations
// scale linearly so wall-clock pacing stays constant.
const BASE_TICK: Duration = Duration::from_micros(16_667);

// Window between a unit's death and its removal from the arena, during
// which the presentation layer plays the despawn animation.
const DESPAWN_GRACE: Duration = Duration::from_millis(300);

/// Stat template shared by every unit of one kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitTemplate {
    /// Hit points the unit spawns with.
    pub hp: i32,
    /// Attack stat used in combat exchanges.
    pub attack: i32,
    /// Defense stat used in combat exchanges.
    pub defense: i32,
    /// Base movement speed before difficulty multipliers.
    pub speed: f32,
}

/// Tuning surface required to construct a world.
///
/// Every ally and enemy kind must carry a template; [`World::new`] rejects
/// an incomplete table so a misconfigured match fails at startup instead of
/// mid-tick.
#[derive(Clone, Debug)]
pub struct Config {
    /// Hit points of each tower at match start.
    pub tower_hp: i32,
    /// Fixed damage one unit inflicts when it reaches the opposing tower.
    pub tower_impact_damage: i32,
    /// Maximum simultaneous live allies.
    pub max_allies: usize,
    /// Maximum simultaneous live enemies.
    pub max_enemies: usize,
    /// Minimum interval between accepted ally spawn requests.
    pub min_ally_spawn_interval: Duration,
    /// Correct answers required to advance one difficulty level.
    pub level_up_threshold: u32,
    /// Stat templates for each ally kind.
    pub ally_templates: Vec<(AllyKind, UnitTemplate)>,
    /// Stat templates for each enemy kind.
    pub enemy_templates: Vec<(EnemyKind, UnitTemplate)>,
}

impl Default for Config {
    fn default() -> Self {
        let ally_template = UnitTemplate {
            hp: 120,
            attack: 12,
            defense: 15,
            speed: 2.0,
        };
        let enemy_template = UnitTemplate {
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 1.5,
        };
        Self {
            tower_hp: 100,
            tower_impact_damage: 10,
            max_allies: 8,
            max_enemies: 5,
            min_ally_spawn_interval: Duration::from_secs(1),
            level_up_threshold: 10,
            ally_templates: AllyKind::ALL
                .iter()
                .map(|kind| (*kind, ally_template))
                .collect(),
            enemy_templates: EnemyKind::ALL
                .iter()
                .map(|kind| (*kind, enemy_template))
                .collect(),
        }
    }
}

/// Startup configuration failures that prevent a match from beginning.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An ally kind is missing its stat template.
    #[error("no template configured for ally kind {0:?}")]
    MissingAllyTemplate(AllyKind),
    /// An enemy kind is missing its stat template.
    #[error("no template configured for enemy kind {0:?}")]
    MissingEnemyTemplate(EnemyKind),
}

#[derive(Clone, Copy, Debug)]
struct ResolvedTemplates {
    allies: [UnitTemplate; 4],
    enemies: [UnitTemplate; 3],
}

impl ResolvedTemplates {
    fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut allies = [UnitTemplate {
            hp: 0,
            attack: 0,
            defense: 0,
            speed: 0.0,
        }; 4];
        for (slot, kind) in AllyKind::ALL.iter().enumerate() {
            let Some((_, template)) = config
                .ally_templates
                .iter()
                .find(|(candidate, _)| candidate == kind)
            else {
                return Err(ConfigError::MissingAllyTemplate(*kind));
            };
            allies[slot] = *template;
        }

        let mut enemies = [UnitTemplate {
            hp: 0,
            attack: 0,
            defense: 0,
            speed: 0.0,
        }; 3];
        for (slot, kind) in EnemyKind::ALL.iter().enumerate() {
            let Some((_, template)) = config
                .enemy_templates
                .iter()
                .find(|(candidate, _)| candidate == kind)
            else {
                return Err(ConfigError::MissingEnemyTemplate(*kind));
            };
            enemies[slot] = *template;
        }

        Ok(Self { allies, enemies })
    }

    fn ally(&self, kind: AllyKind) -> UnitTemplate {
        let slot = match kind {
            AllyKind::Rhinoceros => 0,
            AllyKind::Stag => 1,
            AllyKind::FiveHorned => 2,
            AllyKind::Caucasus => 3,
        };
        self.allies[slot]
    }

    fn enemy(&self, kind: EnemyKind) -> UnitTemplate {
        let slot = match kind {
            EnemyKind::Beetle => 0,
            EnemyKind::Stag => 1,
            EnemyKind::Mantis => 2,
        };
        self.enemies[slot]
    }
}

#[derive(Clone, Copy, Debug)]
struct AbilityState {
    kind: AbilityKind,
    last_used: Option<Duration>,
}

#[derive(Clone, Debug)]
struct Unit {
    id: UnitId,
    kind: UnitKind,
    position: f32,
    speed: f32,
    hp: i32,
    max_hp: i32,
    attack: i32,
    defense: i32,
    base_defense: i32,
    statuses: Vec<StatusEffect>,
    ability: Option<AbilityState>,
    dying: bool,
}

impl Unit {
    fn ally(id: UnitId, kind: AllyKind, template: UnitTemplate) -> Self {
        Self {
            id,
            kind: UnitKind::Ally(kind),
            position: ALLY_SPAWN_POSITION,
            speed: template.speed,
            hp: template.hp,
            max_hp: template.hp,
            attack: template.attack,
            defense: template.defense,
            base_defense: template.defense,
            statuses: Vec::new(),
            ability: Some(AbilityState {
                kind: kind.ability(),
                last_used: None,
            }),
            dying: false,
        }
    }

    fn enemy(id: UnitId, kind: EnemyKind, template: UnitTemplate) -> Self {
        Self {
            id,
            kind: UnitKind::Enemy(kind),
            position: ENEMY_SPAWN_POSITION,
            speed: template.speed,
            hp: template.hp,
            max_hp: template.hp,
            attack: template.attack,
            defense: template.defense,
            base_defense: template.defense,
            statuses: Vec::new(),
            ability: None,
            dying: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ScheduledRemoval {
    unit: UnitId,
    at: Duration,
    cause: RemovalCause,
}

/// Represents the authoritative Bug Battle world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    templates: ResolvedTemplates,
    allies: Vec<Unit>,
    enemies: Vec<Unit>,
    towers: Towers,
    match_state: MatchState,
    progression: LevelProgression,
    clock: Duration,
    next_unit_id: u32,
    last_ally_spawn: Option<Duration>,
    removals: Vec<ScheduledRemoval>,
}

impl World {
    /// Creates a new battle world ready for simulation.
    ///
    /// Fails when the configuration leaves any unit kind without a stat
    /// template.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let templates = ResolvedTemplates::from_config(&config)?;
        let towers = Towers::new(config.tower_hp);
        Ok(Self {
            config,
            templates,
            allies: Vec::new(),
            enemies: Vec::new(),
            towers,
            match_state: MatchState::Active,
            progression: LevelProgression::new(),
            clock: Duration::ZERO,
            next_unit_id: 0,
            last_ally_spawn: None,
            removals: Vec::new(),
        })
    }

    fn reset(&mut self) {
        self.allies.clear();
        self.enemies.clear();
        self.towers = Towers::new(self.config.tower_hp);
        self.match_state = MatchState::Active;
        self.progression = LevelProgression::new();
        self.clock = Duration::ZERO;
        self.next_unit_id = 0;
        self.last_ally_spawn = None;
        self.removals.clear();
    }

    fn allocate_id(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    fn live_count(units: &[Unit]) -> usize {
        units.iter().filter(|unit| !unit.dying).count()
    }

    fn spawn_ally(&mut self, kind: AllyKind, out_events: &mut Vec<Event>) {
        if Self::live_count(&self.allies) >= self.config.max_allies {
            out_events.push(Event::SpawnRejected {
                side: TowerSide::Player,
                reason: SpawnRejection::PopulationCap,
            });
            return;
        }
        if let Some(last) = self.last_ally_spawn {
            if self.clock.saturating_sub(last) < self.config.min_ally_spawn_interval {
                out_events.push(Event::SpawnRejected {
                    side: TowerSide::Player,
                    reason: SpawnRejection::RateLimited,
                });
                return;
            }
        }

        let template = self.templates.ally(kind);
        let id = self.allocate_id();
        self.allies.push(Unit::ally(id, kind, template));
        self.last_ally_spawn = Some(self.clock);
        out_events.push(Event::UnitSpawned {
            id,
            kind: UnitKind::Ally(kind),
            position: ALLY_SPAWN_POSITION,
        });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if Self::live_count(&self.enemies) >= self.config.max_enemies {
            out_events.push(Event::SpawnRejected {
                side: TowerSide::Enemy,
                reason: SpawnRejection::PopulationCap,
            });
            return;
        }

        let template = self.templates.enemy(kind);
        let id = self.allocate_id();
        self.enemies.push(Unit::enemy(id, kind, template));
        out_events.push(Event::UnitSpawned {
            id,
            kind: UnitKind::Enemy(kind),
            position: ENEMY_SPAWN_POSITION,
        });
    }

    fn use_ability(&mut self, ally: UnitId, out_events: &mut Vec<Event>) {
        let Some(index) = self
            .allies
            .iter()
            .position(|unit| unit.id == ally && !unit.dying)
        else {
            out_events.push(Event::AbilityRejected {
                ally,
                reason: AbilityRejection::UnknownCaster,
            });
            return;
        };
        let Some(state) = self.allies[index].ability else {
            out_events.push(Event::AbilityRejected {
                ally,
                reason: AbilityRejection::UnknownCaster,
            });
            return;
        };
        if let Some(last) = state.last_used {
            if self.clock.saturating_sub(last) < state.kind.cooldown() {
                out_events.push(Event::AbilityRejected {
                    ally,
                    reason: AbilityRejection::CoolingDown,
                });
                return;
            }
        }

        self.allies[index].ability = Some(AbilityState {
            kind: state.kind,
            last_used: Some(self.clock),
        });

        let caster = unit_snapshot(&self.allies[index]);
        let enemies: Vec<UnitSnapshot> = self.enemies.iter().map(unit_snapshot).collect();
        let mut patches = Vec::new();
        bug_battle_system_abilities::resolve(state.kind, &caster, &enemies, &mut patches);
        self.apply_patches(&patches);
        out_events.push(Event::AbilityUsed { ally });
    }

    fn apply_patches(&mut self, patches: &[StatPatch]) {
        let clock = self.clock;
        for patch in patches {
            let Some(unit) = self.unit_mut(patch.target) else {
                continue;
            };
            match patch.change {
                StatChange::ScaleSpeed(factor) => unit.speed *= factor,
                StatChange::ScaleAttack(factor) => {
                    unit.attack = combat::scale_stat(unit.attack, factor);
                }
                StatChange::ScaleDefense(factor) => {
                    unit.defense = combat::scale_stat(unit.defense, factor);
                    unit.base_defense = combat::scale_stat(unit.base_defense, factor);
                }
                StatChange::Poison {
                    magnitude,
                    duration,
                } => {
                    status::attach(
                        &mut unit.statuses,
                        StatusEffect {
                            kind: StatusKind::Poison,
                            expires_at: clock.saturating_add(duration),
                            magnitude,
                        },
                    );
                }
                StatChange::BoostDefense { amount, duration } => {
                    unit.defense = unit.base_defense + amount;
                    status::attach(
                        &mut unit.statuses,
                        StatusEffect {
                            kind: StatusKind::DefenseBoost,
                            expires_at: clock.saturating_add(duration),
                            magnitude: amount,
                        },
                    );
                }
            }
        }
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.allies
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|unit| unit.id == id && !unit.dying)
    }

    fn stage_movement(&mut self, dt_scale: f32, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        for ally in &mut self.allies {
            if ally.dying {
                continue;
            }
            ally.position -= ally.speed * difficulty.ally_speed_multiplier * dt_scale;
        }
        for enemy in &mut self.enemies {
            if enemy.dying {
                continue;
            }
            enemy.position += enemy.speed * difficulty.enemy_speed_multiplier * dt_scale;
        }

        cleanup_out_of_bounds(
            &mut self.allies,
            |position| position < ALLY_CLEANUP_BOUND,
            out_events,
        );
        cleanup_out_of_bounds(
            &mut self.enemies,
            |position| position > ENEMY_CLEANUP_BOUND,
            out_events,
        );
    }

    fn stage_tower_collisions(&mut self, out_events: &mut Vec<Event>) -> bool {
        // The enemy tower resolves first so a simultaneous double zero
        // settles in the player's favour.
        if self.resolve_tower_hits(TowerSide::Enemy, out_events) {
            return true;
        }
        self.resolve_tower_hits(TowerSide::Player, out_events)
    }

    fn resolve_tower_hits(&mut self, tower: TowerSide, out_events: &mut Vec<Event>) -> bool {
        let mut index = 0;
        loop {
            let units = match tower {
                TowerSide::Enemy => &mut self.allies,
                TowerSide::Player => &mut self.enemies,
            };
            if index >= units.len() {
                return false;
            }
            let reached = !units[index].dying
                && match tower {
                    TowerSide::Enemy => units[index].position <= ENEMY_TOWER_EDGE,
                    TowerSide::Player => units[index].position >= PLAYER_TOWER_EDGE,
                };
            if !reached {
                index += 1;
                continue;
            }

            let unit = units.remove(index);
            let hp = self.towers.damage(tower, self.config.tower_impact_damage);
            out_events.push(Event::TowerHpChanged {
                side: tower,
                hp,
                max_hp: self.towers.get(tower).max_hp(),
            });
            out_events.push(Event::UnitRemoved {
                id: unit.id,
                cause: RemovalCause::TowerImpact,
            });

            if let Some(winner) = self.towers.fallen_winner() {
                self.match_state = match winner {
                    TowerSide::Player => MatchState::PlayerWin,
                    TowerSide::Enemy => MatchState::PlayerLoss,
                };
                out_events.push(Event::MatchEnded { winner });
                return true;
            }
        }
    }

    fn stage_unit_combat(&mut self, out_events: &mut Vec<Event>) {
        let clock = self.clock;
        let Self {
            allies,
            enemies,
            removals,
            ..
        } = self;

        for ally_index in 0..allies.len() {
            for enemy_index in 0..enemies.len() {
                // A unit felled earlier in this stage is already absent for
                // later pairs.
                if allies[ally_index].dying {
                    break;
                }
                if enemies[enemy_index].dying {
                    continue;
                }

                let overlapping = {
                    let ally = &allies[ally_index];
                    let enemy = &enemies[enemy_index];
                    combat::collides(
                        ally.position,
                        ally.kind.collision_radius(),
                        enemy.position,
                        enemy.kind.collision_radius(),
                    )
                };
                if !overlapping {
                    continue;
                }

                let damage_to_enemy =
                    combat::damage(allies[ally_index].attack, enemies[enemy_index].defense);
                let damage_to_ally =
                    combat::damage(enemies[enemy_index].attack, allies[ally_index].defense);

                // Simultaneous resolution: both sides absorb their hit in
                // the same pass.
                allies[ally_index].hp = (allies[ally_index].hp - damage_to_ally).max(0);
                enemies[enemy_index].hp = (enemies[enemy_index].hp - damage_to_enemy).max(0);

                out_events.push(Event::CombatResolved {
                    ally: allies[ally_index].id,
                    enemy: enemies[enemy_index].id,
                    damage_to_ally,
                    damage_to_enemy,
                });

                if allies[ally_index].hp == 0 {
                    mark_dying(
                        &mut allies[ally_index],
                        removals,
                        clock,
                        RemovalCause::CombatDeath,
                    );
                }
                if enemies[enemy_index].hp == 0 {
                    mark_dying(
                        &mut enemies[enemy_index],
                        removals,
                        clock,
                        RemovalCause::CombatDeath,
                    );
                }
            }
        }
    }

    fn stage_status_effects(&mut self) {
        let clock = self.clock;
        let Self {
            allies,
            enemies,
            removals,
            ..
        } = self;

        for unit in allies.iter_mut().chain(enemies.iter_mut()) {
            if unit.dying {
                continue;
            }
            let outcome = status::tick(&mut unit.statuses, clock);
            if outcome.boost_expired {
                unit.defense = unit.base_defense;
            }
            if outcome.poison_damage > 0 {
                unit.hp = (unit.hp - outcome.poison_damage).max(0);
                if unit.hp == 0 {
                    mark_dying(unit, removals, clock, RemovalCause::PoisonDeath);
                }
            }
        }
    }

    fn drain_scheduled_removals(&mut self, out_events: &mut Vec<Event>) {
        let clock = self.clock;
        let mut index = 0;
        while index < self.removals.len() {
            if self.removals[index].at > clock {
                index += 1;
                continue;
            }
            let removal = self.removals.remove(index);
            if !remove_unit(&mut self.allies, removal.unit) {
                let _ = remove_unit(&mut self.enemies, removal.unit);
            }
            out_events.push(Event::UnitRemoved {
                id: removal.unit,
                cause: removal.cause,
            });
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let difficulty = self.progression.difficulty();
        let dt_scale = dt.as_secs_f32() / BASE_TICK.as_secs_f32();

        self.stage_movement(dt_scale, difficulty, out_events);
        if self.stage_tower_collisions(out_events) {
            return;
        }
        self.stage_unit_combat(out_events);
        self.stage_status_effects();
        self.drain_scheduled_removals(out_events);
    }
}

fn mark_dying(
    unit: &mut Unit,
    removals: &mut Vec<ScheduledRemoval>,
    clock: Duration,
    cause: RemovalCause,
) {
    unit.dying = true;
    removals.push(ScheduledRemoval {
        unit: unit.id,
        at: clock.saturating_add(DESPAWN_GRACE),
        cause,
    });
}

fn remove_unit(units: &mut Vec<Unit>, id: UnitId) -> bool {
    if let Some(index) = units.iter().position(|unit| unit.id == id) {
        let _ = units.remove(index);
        true
    } else {
        false
    }
}

fn cleanup_out_of_bounds(
    units: &mut Vec<Unit>,
    escaped: impl Fn(f32) -> bool,
    out_events: &mut Vec<Event>,
) {
    let mut index = 0;
    while index < units.len() {
        if !units[index].dying && escaped(units[index].position) {
            let unit = units.remove(index);
            out_events.push(Event::UnitRemoved {
                id: unit.id,
                cause: RemovalCause::OutOfBounds,
            });
        } else {
            index += 1;
        }
    }
}

fn unit_snapshot(unit: &Unit) -> UnitSnapshot {
    UnitSnapshot {
        id: unit.id,
        kind: unit.kind,
        position: unit.position,
        speed: unit.speed,
        hp: unit.hp,
        max_hp: unit.max_hp,
        attack: unit.attack,
        defense: unit.defense,
        dying: unit.dying,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A terminal world ignores every command except [`Command::Reset`]; terminal
/// states have no outgoing transitions, so nothing can mutate units or towers
/// after the match ends.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.match_state.is_terminal() && !matches!(command, Command::Reset) {
        return;
    }

    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnAlly { kind } => world.spawn_ally(kind, out_events),
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::UseAbility { ally } => world.use_ability(ally, out_events),
        Command::RecordCorrectAnswer => {
            if let Some(level) = world
                .progression
                .record_correct(world.config.level_up_threshold)
            {
                out_events.push(Event::LevelChanged { level });
            }
        }
        Command::Reset => {
            world.reset();
            out_events.push(Event::MatchReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use bug_battle_core::{AbilityKind, Difficulty, MatchState, TowerSide, UnitId, UnitView};

    use super::{unit_snapshot, World};

    /// Current lifecycle state of the match.
    #[must_use]
    pub fn match_state(world: &World) -> MatchState {
        world.match_state
    }

    /// Simulated time accumulated since match start.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Active difficulty level in `1..=5`.
    #[must_use]
    pub fn level(world: &World) -> u8 {
        world.progression.level()
    }

    /// Active difficulty tuning record.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.progression.difficulty()
    }

    /// Captures a read-only view of the allied population.
    #[must_use]
    pub fn ally_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.allies.iter().map(unit_snapshot).collect())
    }

    /// Captures a read-only view of the enemy population.
    #[must_use]
    pub fn enemy_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.enemies.iter().map(unit_snapshot).collect())
    }

    /// Number of allies that count against the population cap.
    #[must_use]
    pub fn live_ally_count(world: &World) -> usize {
        World::live_count(&world.allies)
    }

    /// Number of enemies that count against the population cap.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        World::live_count(&world.enemies)
    }

    /// Captures the current state of one tower.
    #[must_use]
    pub fn tower(world: &World, side: TowerSide) -> TowerSnapshot {
        let tower = world.towers.get(side);
        TowerSnapshot {
            side,
            hp: tower.hp(),
            max_hp: tower.max_hp(),
        }
    }

    /// Captures cooldown progress for every live ally ability.
    #[must_use]
    pub fn ability_cooldowns(world: &World) -> Vec<AbilityCooldownSnapshot> {
        let mut snapshots: Vec<AbilityCooldownSnapshot> = world
            .allies
            .iter()
            .filter(|unit| !unit.dying)
            .filter_map(|unit| {
                unit.ability.map(|state| AbilityCooldownSnapshot {
                    ally: unit.id,
                    kind: state.kind,
                    ready_in: match state.last_used {
                        None => Duration::ZERO,
                        Some(last) => state
                            .kind
                            .cooldown()
                            .saturating_sub(world.clock.saturating_sub(last)),
                    },
                })
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.ally);
        snapshots
    }

    /// Immutable representation of one tower's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TowerSnapshot {
        /// Side the tower guards.
        pub side: TowerSide,
        /// Remaining hit points.
        pub hp: i32,
        /// Maximum hit points.
        pub max_hp: i32,
    }

    /// Cooldown progress of one ally's ability.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AbilityCooldownSnapshot {
        /// Ally the ability belongs to.
        pub ally: UnitId,
        /// Ability bound to the ally's kind.
        pub kind: AbilityKind,
        /// Time remaining until the ability is ready; zero when usable.
        pub ready_in: Duration,
    }
}

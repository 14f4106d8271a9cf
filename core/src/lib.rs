#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bug Battle simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for collaborators
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new ally of the given kind join the battle lane.
    SpawnAlly {
        /// Kind of ally to create.
        kind: AllyKind,
    },
    /// Requests that a new enemy of the given kind join the battle lane.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
    },
    /// Requests that the identified ally trigger its special ability.
    UseAbility {
        /// Identifier of the ally attempting to act.
        ally: UnitId,
    },
    /// Records one correct quiz answer toward difficulty progression.
    RecordCorrectAnswer,
    /// Discards all live entities and restores the initial match state.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a unit entered the battle lane.
    UnitSpawned {
        /// Identifier assigned to the new unit.
        id: UnitId,
        /// Kind of unit that was created.
        kind: UnitKind,
        /// Lane coordinate the unit occupies after spawning.
        position: f32,
    },
    /// Confirms that a unit left the battle lane.
    UnitRemoved {
        /// Identifier of the removed unit.
        id: UnitId,
        /// Reason the unit was removed.
        cause: RemovalCause,
    },
    /// Reports one resolved ally-versus-enemy combat exchange.
    CombatResolved {
        /// Ally participating in the exchange.
        ally: UnitId,
        /// Enemy participating in the exchange.
        enemy: UnitId,
        /// Damage applied to the ally during the exchange.
        damage_to_ally: i32,
        /// Damage applied to the enemy during the exchange.
        damage_to_enemy: i32,
    },
    /// Announces that a tower absorbed damage.
    TowerHpChanged {
        /// Side whose tower was hit.
        side: TowerSide,
        /// Remaining hit points after the hit.
        hp: i32,
        /// Maximum hit points of the tower.
        max_hp: i32,
    },
    /// Announces that the match reached a terminal state.
    MatchEnded {
        /// Side that won the match.
        winner: TowerSide,
    },
    /// Announces that the difficulty level increased.
    LevelChanged {
        /// Level that became active.
        level: u8,
    },
    /// Confirms that an ally triggered its ability.
    AbilityUsed {
        /// Ally that acted.
        ally: UnitId,
    },
    /// Reports that an ability invocation was ignored.
    AbilityRejected {
        /// Ally named in the invocation.
        ally: UnitId,
        /// Specific reason the invocation was ignored.
        reason: AbilityRejection,
    },
    /// Reports that a spawn request was ignored.
    SpawnRejected {
        /// Side the request targeted.
        side: TowerSide,
        /// Specific reason the request was ignored.
        reason: SpawnRejection,
    },
    /// Confirms that the match was reinitialised.
    MatchReset,
}

/// Unique identifier assigned to a battle unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// The two opposing sides of the battle lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerSide {
    /// The player's side; its units are allies.
    Player,
    /// The opposing side; its units are enemies.
    Enemy,
}

/// Kinds of allied beetles the player can field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllyKind {
    /// Rhinoceros beetle, the baseline fighter.
    Rhinoceros,
    /// Stag beetle with venomous pincers.
    Stag,
    /// Five-horned beetle specialised in disarming foes.
    FiveHorned,
    /// Caucasus beetle, the top-tier area controller.
    Caucasus,
}

impl AllyKind {
    /// All ally kinds in their canonical order.
    pub const ALL: [AllyKind; 4] = [
        AllyKind::Rhinoceros,
        AllyKind::Stag,
        AllyKind::FiveHorned,
        AllyKind::Caucasus,
    ];

    /// Returns the special ability bound to the kind.
    #[must_use]
    pub const fn ability(self) -> AbilityKind {
        match self {
            Self::Rhinoceros => AbilityKind::HornCharge,
            Self::Stag => AbilityKind::VenomPinch,
            Self::FiveHorned => AbilityKind::HornDrill,
            Self::Caucasus => AbilityKind::KingsPresence,
        }
    }

    /// Collision radius of the kind measured in lane units.
    #[must_use]
    pub const fn collision_radius(self) -> f32 {
        match self {
            Self::Rhinoceros | Self::Stag | Self::FiveHorned => 50.0,
            Self::Caucasus => 55.0,
        }
    }
}

/// Kinds of enemy insects that assault the player's tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Generic beetle grunt.
    Beetle,
    /// Stag beetle raider.
    Stag,
    /// Mantis skirmisher.
    Mantis,
}

impl EnemyKind {
    /// All enemy kinds in their canonical order.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Beetle, EnemyKind::Stag, EnemyKind::Mantis];

    /// Collision radius of the kind measured in lane units.
    #[must_use]
    pub const fn collision_radius(self) -> f32 {
        match self {
            Self::Beetle | Self::Stag => 50.0,
            Self::Mantis => 45.0,
        }
    }
}

/// Kind of a unit together with its side-specific template selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Allied unit advancing toward the enemy tower.
    Ally(AllyKind),
    /// Enemy unit advancing toward the player tower.
    Enemy(EnemyKind),
}

impl UnitKind {
    /// Side the kind fights for.
    #[must_use]
    pub const fn side(self) -> TowerSide {
        match self {
            Self::Ally(_) => TowerSide::Player,
            Self::Enemy(_) => TowerSide::Enemy,
        }
    }

    /// Collision radius of the kind measured in lane units.
    #[must_use]
    pub const fn collision_radius(self) -> f32 {
        match self {
            Self::Ally(kind) => kind.collision_radius(),
            Self::Enemy(kind) => kind.collision_radius(),
        }
    }
}

/// Special abilities available to ally kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Charge that slows the nearest enemy and hardens the caster's shell.
    HornCharge,
    /// Pinch that weakens the nearest enemy's defense and poisons it.
    VenomPinch,
    /// Drill that blunts the nearest enemy's attack.
    HornDrill,
    /// Royal presence that weakens every enemy near the caster.
    KingsPresence,
}

impl AbilityKind {
    /// Duration that must elapse between successive invocations.
    #[must_use]
    pub const fn cooldown(self) -> Duration {
        match self {
            Self::HornCharge => Duration::from_secs(10),
            Self::VenomPinch => Duration::from_secs(15),
            Self::HornDrill => Duration::from_secs(20),
            Self::KingsPresence => Duration::from_secs(25),
        }
    }
}

/// Timed modifier kinds that can attach to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Periodic damage applied once per tick until expiry.
    Poison,
    /// Temporary defense increase reverted on expiry.
    DefenseBoost,
}

/// Reasons a unit may leave the battle lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Hit points reached zero through a combat exchange.
    CombatDeath,
    /// Hit points reached zero through poison damage.
    PoisonDeath,
    /// The unit reached the opposing tower and was consumed by the impact.
    TowerImpact,
    /// The unit drifted past the lane's cleanup margin.
    OutOfBounds,
}

/// Reasons an ability invocation may be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityRejection {
    /// The cooldown window since the previous invocation has not elapsed.
    CoolingDown,
    /// No live ally carries the provided identifier.
    UnknownCaster,
}

/// Reasons a spawn request may be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The side already fields its maximum number of live units.
    PopulationCap,
    /// The minimum interval since the previous accepted request has not elapsed.
    RateLimited,
}

/// Lifecycle of a match from first tick to terminal outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// Both towers stand and the simulation is ticking.
    Active,
    /// The enemy tower fell first.
    PlayerWin,
    /// The player tower fell first.
    PlayerLoss,
}

impl MatchState {
    /// Reports whether the state has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Derived tuning record for one difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Level the record belongs to, in `1..=5`.
    pub level: u8,
    /// Factor applied to ally speed during movement.
    pub ally_speed_multiplier: f32,
    /// Factor applied to enemy speed during movement.
    pub enemy_speed_multiplier: f32,
    /// Probability that a scheduled enemy spawn attempt succeeds.
    pub enemy_spawn_probability: f32,
    /// Factor applied to score awards at this level.
    pub score_multiplier: f32,
}

const DIFFICULTY_LEVELS: [Difficulty; 5] = [
    Difficulty {
        level: 1,
        ally_speed_multiplier: 0.67,
        enemy_speed_multiplier: 1.2,
        enemy_spawn_probability: 0.9,
        score_multiplier: 1.0,
    },
    Difficulty {
        level: 2,
        ally_speed_multiplier: 0.83,
        enemy_speed_multiplier: 1.5,
        enemy_spawn_probability: 0.95,
        score_multiplier: 1.2,
    },
    Difficulty {
        level: 3,
        ally_speed_multiplier: 1.0,
        enemy_speed_multiplier: 1.8,
        enemy_spawn_probability: 0.98,
        score_multiplier: 1.5,
    },
    Difficulty {
        level: 4,
        ally_speed_multiplier: 1.17,
        enemy_speed_multiplier: 2.1,
        enemy_spawn_probability: 0.99,
        score_multiplier: 2.0,
    },
    Difficulty {
        level: 5,
        ally_speed_multiplier: 1.33,
        enemy_speed_multiplier: 2.4,
        enemy_spawn_probability: 1.0,
        score_multiplier: 2.5,
    },
];

impl Difficulty {
    /// Highest level the tuning table defines.
    pub const MAX_LEVEL: u8 = 5;

    /// Retrieves the tuning record for the provided level.
    ///
    /// Levels above [`Difficulty::MAX_LEVEL`] clamp to the final record and
    /// level zero clamps to the first, so callers never observe an
    /// unconfigured difficulty.
    #[must_use]
    pub fn for_level(level: u8) -> Self {
        let clamped = level.clamp(1, Self::MAX_LEVEL);
        DIFFICULTY_LEVELS[usize::from(clamped) - 1]
    }
}

/// Single stat mutation produced by an ability effect.
///
/// Effects never mutate units directly; they describe changes as patches that
/// the world applies centrally, keeping a single writer per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatChange {
    /// Multiplies the target's speed by the provided factor.
    ScaleSpeed(f32),
    /// Multiplies the target's attack by the provided factor.
    ScaleAttack(f32),
    /// Multiplies the target's defense by the provided factor.
    ScaleDefense(f32),
    /// Attaches a poison status dealing `magnitude` damage per tick.
    Poison {
        /// Damage subtracted from the host each tick.
        magnitude: i32,
        /// Time the status remains active.
        duration: Duration,
    },
    /// Attaches a reverting defense boost to the target.
    BoostDefense {
        /// Amount added on top of the target's base defense.
        amount: i32,
        /// Time the boost remains active.
        duration: Duration,
    },
}

/// Stat mutation addressed to a specific unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatPatch {
    /// Unit the change applies to.
    pub target: UnitId,
    /// Change to apply.
    pub change: StatChange,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Kind of the unit.
    pub kind: UnitKind,
    /// Lane coordinate currently occupied by the unit.
    pub position: f32,
    /// Base movement speed before difficulty multipliers.
    pub speed: f32,
    /// Remaining hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Attack stat used in combat exchanges.
    pub attack: i32,
    /// Defense stat used in combat exchanges.
    pub defense: i32,
    /// Indicates whether the unit awaits graceful removal.
    pub dying: bool,
}

/// Read-only snapshot describing one side's units in deterministic order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

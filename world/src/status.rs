//! Timed status effects attached to live units.

use std::time::Duration;

use bug_battle_core::StatusKind;

/// One timed modifier hosted by a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StatusEffect {
    pub(crate) kind: StatusKind,
    pub(crate) expires_at: Duration,
    pub(crate) magnitude: i32,
}

/// Aggregate result of advancing a unit's status set by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TickOutcome {
    /// Total poison damage to subtract from the host this tick.
    pub(crate) poison_damage: i32,
    /// Indicates that a defense boost lapsed and defense must revert.
    pub(crate) boost_expired: bool,
}

/// Advances every status by one tick, dropping the expired ones.
///
/// Unexpired poison contributes its magnitude once per call; an expired
/// defense boost is reported so the caller can restore base defense.
pub(crate) fn tick(statuses: &mut Vec<StatusEffect>, now: Duration) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    statuses.retain(|status| {
        let expired = now >= status.expires_at;
        match status.kind {
            StatusKind::Poison => {
                if !expired {
                    outcome.poison_damage += status.magnitude;
                }
            }
            StatusKind::DefenseBoost => {
                if expired {
                    outcome.boost_expired = true;
                }
            }
        }
        !expired
    });
    outcome
}

/// Attaches a status, refreshing any existing effect of the same kind.
pub(crate) fn attach(statuses: &mut Vec<StatusEffect>, effect: StatusEffect) {
    statuses.retain(|status| status.kind != effect.kind);
    statuses.push(effect);
}

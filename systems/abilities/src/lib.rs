#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure ability effect table for allied beetles.
//!
//! Effects never touch live entities. Each invocation receives immutable
//! snapshots of the caster and the enemy population and answers with
//! [`StatPatch`] values that the world applies centrally. This keeps every
//! effect independently testable and preserves single-writer discipline
//! within a tick.

use std::time::Duration;

use bug_battle_core::{AbilityKind, StatChange, StatPatch, UnitSnapshot};

/// Radius of the Caucasus area debuff measured in lane units.
pub const PRESENCE_RADIUS: f32 = 250.0;

const SINGLE_TARGET_FACTOR: f32 = 0.5;
const PRESENCE_FACTOR: f32 = 0.5;
const POISON_MAGNITUDE: i32 = 2;
const POISON_DURATION: Duration = Duration::from_secs(5);
const SHELL_BOOST_AMOUNT: i32 = 10;
const SHELL_BOOST_DURATION: Duration = Duration::from_secs(5);

/// Computes the stat patches produced by one ability invocation.
///
/// Enemies already awaiting removal are never targeted. Single-target
/// abilities with no live enemy in the lane produce no patches, which the
/// caller treats as a successful no-op rather than an error.
pub fn resolve(
    kind: AbilityKind,
    caster: &UnitSnapshot,
    enemies: &[UnitSnapshot],
    out: &mut Vec<StatPatch>,
) {
    match kind {
        AbilityKind::HornCharge => {
            if let Some(target) = nearest_enemy(caster, enemies) {
                out.push(StatPatch {
                    target: target.id,
                    change: StatChange::ScaleSpeed(SINGLE_TARGET_FACTOR),
                });
                out.push(StatPatch {
                    target: caster.id,
                    change: StatChange::BoostDefense {
                        amount: SHELL_BOOST_AMOUNT,
                        duration: SHELL_BOOST_DURATION,
                    },
                });
            }
        }
        AbilityKind::VenomPinch => {
            if let Some(target) = nearest_enemy(caster, enemies) {
                out.push(StatPatch {
                    target: target.id,
                    change: StatChange::ScaleDefense(SINGLE_TARGET_FACTOR),
                });
                out.push(StatPatch {
                    target: target.id,
                    change: StatChange::Poison {
                        magnitude: POISON_MAGNITUDE,
                        duration: POISON_DURATION,
                    },
                });
            }
        }
        AbilityKind::HornDrill => {
            if let Some(target) = nearest_enemy(caster, enemies) {
                out.push(StatPatch {
                    target: target.id,
                    change: StatChange::ScaleAttack(SINGLE_TARGET_FACTOR),
                });
            }
        }
        AbilityKind::KingsPresence => {
            for enemy in enemies {
                if enemy.dying {
                    continue;
                }
                if distance(caster, enemy) < PRESENCE_RADIUS {
                    out.push(StatPatch {
                        target: enemy.id,
                        change: StatChange::ScaleAttack(PRESENCE_FACTOR),
                    });
                    out.push(StatPatch {
                        target: enemy.id,
                        change: StatChange::ScaleDefense(PRESENCE_FACTOR),
                    });
                    out.push(StatPatch {
                        target: enemy.id,
                        change: StatChange::ScaleSpeed(PRESENCE_FACTOR),
                    });
                }
            }
        }
    }
}

fn nearest_enemy<'a>(
    caster: &UnitSnapshot,
    enemies: &'a [UnitSnapshot],
) -> Option<&'a UnitSnapshot> {
    let mut nearest: Option<(&UnitSnapshot, f32)> = None;
    for enemy in enemies {
        if enemy.dying {
            continue;
        }
        let separation = distance(caster, enemy);
        let closer = match nearest {
            None => true,
            // Ties break toward the lower identifier for determinism.
            Some((current, best)) => {
                separation < best || (separation == best && enemy.id < current.id)
            }
        };
        if closer {
            nearest = Some((enemy, separation));
        }
    }
    nearest.map(|(enemy, _)| enemy)
}

// The lane is one-dimensional today; keeping the Euclidean form means the
// targeting math survives a move to divergent 2-D lanes unchanged.
fn distance(a: &UnitSnapshot, b: &UnitSnapshot) -> f32 {
    let dx = a.position - b.position;
    (dx * dx).sqrt()
}

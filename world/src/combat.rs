//! Collision geometry and damage arithmetic.

/// Factor widening the collision threshold beyond the summed radii.
const COLLISION_SLACK: f32 = 1.2;

/// Damage inflicted by one combatant on another; always at least one point.
pub(crate) fn damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(1)
}

/// Reports whether two units overlap on the lane.
///
/// Positions are one-dimensional today, yet the test is phrased as a
/// Euclidean distance so the geometry generalises if lanes ever diverge
/// vertically.
pub(crate) fn collides(a_position: f32, a_radius: f32, b_position: f32, b_radius: f32) -> bool {
    let dx = a_position - b_position;
    let distance = (dx * dx).sqrt();
    distance < (a_radius + b_radius) * COLLISION_SLACK
}

/// Scales an integer stat by a debuff factor, never below zero.
pub(crate) fn scale_stat(stat: i32, factor: f32) -> i32 {
    ((stat as f32) * factor).round() as i32
}

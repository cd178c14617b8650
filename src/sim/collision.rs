//! Collision detection between the entity and the obstacle pair
//!
//! Axis-aligned and one-dimensional: the obstacle is only tested while its
//! left edge sits inside the trigger zone, and then only the entity's top
//! edge is compared against the two closed segment intervals.

use super::state::{Entity, Obstacle, Segment};
use crate::between;
use crate::tuning::Tuning;

/// Which segment the entity hits, if any. Pure; safe to call at any time.
///
/// Top segment is `[0, gap_top]`, bottom segment is
/// `[gap_top + gap_size - entity_height, field_height]`. Both inclusive.
pub fn hit_segment(entity: &Entity, obstacle: &Obstacle, tuning: &Tuning) -> Option<Segment> {
    if !tuning.trigger_zone.contains(obstacle.x) {
        return None;
    }

    let bottom_start = obstacle.gap_top + tuning.gap_size - tuning.entity_height;
    if between(entity.position, 0.0, obstacle.gap_top) {
        Some(Segment::Top)
    } else if between(entity.position, bottom_start, tuning.field.height()) {
        Some(Segment::Bottom)
    } else {
        None
    }
}

/// Whether the entity collides with the obstacle this frame
#[inline]
pub fn check(entity: &Entity, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    hit_segment(entity, obstacle, tuning).is_some()
}

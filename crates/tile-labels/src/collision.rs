//! Narrow phase and tie-break between two overlapping labels

use crate::label::Label;

/// Which label of a pair gives way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Yield {
    First,
    Second,
}

/// Exact overlap test of the collision shapes computed this frame
#[inline]
pub fn collide(a: &Label, b: &Label) -> bool {
    a.obb().intersects(b.obb())
}

/// Pick the label that must be occluded when `a` and `b` overlap
///
/// Rules in order, the first that separates the pair decides:
/// 1. a label from a proxy tile gives way to one from a regular tile
/// 2. the higher priority value gives way
/// 3. the label occluded in the previous frame gives way
/// 4. the label not currently visible gives way
/// 5. the newer label gives way
pub fn resolve_pair(a: &Label, b: &Label) -> Yield {
    if a.is_proxy() != b.is_proxy() {
        return if a.is_proxy() { Yield::First } else { Yield::Second };
    }

    let (pa, pb) = (a.options().priority, b.options().priority);
    if pa != pb {
        return if pa > pb { Yield::First } else { Yield::Second };
    }

    if a.occluded_last_frame() != b.occluded_last_frame() {
        return if a.occluded_last_frame() {
            Yield::First
        } else {
            Yield::Second
        };
    }

    if a.visible_state() != b.visible_state() {
        return if a.visible_state() {
            Yield::Second
        } else {
            Yield::First
        };
    }

    if a.id() > b.id() {
        Yield::First
    } else {
        Yield::Second
    }
}

//! Canonical roles and the seating-order resolver.

use std::collections::HashSet;
use std::fmt;

use crate::error::Error;
use crate::tracker::Skeleton;

/// Fixed semantic label persisting for a whole video. The persistent identity
/// a role maps to can change over time; the role itself never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Left,
    Right,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Left, Role::Right];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Left => write!(f, "left"),
            Role::Right => write!(f, "right"),
        }
    }
}

/// Per role, every persistent identity ever recognized as referring to it.
///
/// Keeping the full set (not just the current identity) lets the propagator
/// directly recognize an identity that reappears after the tracker churned
/// out a fresh value in between.
#[derive(Debug, Clone)]
pub struct RoleMap {
    left: HashSet<u64>,
    right: HashSet<u64>,
}

impl RoleMap {
    pub fn new(left_seed: u64, right_seed: u64) -> Self {
        Self {
            left: HashSet::from([left_seed]),
            right: HashSet::from([right_seed]),
        }
    }

    /// Role this identity is known to refer to, if any. Left wins if an
    /// identity somehow ended up in both sets.
    pub fn role_of(&self, id: u64) -> Option<Role> {
        if self.left.contains(&id) {
            Some(Role::Left)
        } else if self.right.contains(&id) {
            Some(Role::Right)
        } else {
            None
        }
    }

    pub fn learn(&mut self, role: Role, id: u64) {
        match role {
            Role::Left => self.left.insert(id),
            Role::Right => self.right.insert(id),
        };
    }

    pub fn known(&self, role: Role) -> &HashSet<u64> {
        match role {
            Role::Left => &self.left,
            Role::Right => &self.right,
        }
    }
}

/// Resolve canonical roles from the first frame showing at least two distinct
/// identities: the detection whose center-of-mass anchor has the smallest x
/// becomes `Left`, the largest becomes `Right`.
///
/// This leans on the seating-order assumption that both subjects are still
/// near their start-of-video positions by that frame. Violations are fatal
/// input-data errors, surfaced instead of guessed around.
pub fn first_ordered_pair(frames: &[Vec<Skeleton>]) -> Result<(u64, u64), Error> {
    for (frame_idx, detections) in frames.iter().enumerate() {
        let mut anchors: Vec<(u64, crate::tracker::Anchor)> = Vec::new();
        for skeleton in detections {
            let Some(id) = skeleton.id else { continue };
            if anchors.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            anchors.push((id, skeleton.center_of_mass()));
        }

        if anchors.len() < 2 {
            continue;
        }

        // NaN anchor positions never win these comparisons; the confidence
        // check below surfaces them as seating-order violations.
        let mut leftmost = anchors[0];
        let mut rightmost = anchors[0];
        for candidate in &anchors[1..] {
            if candidate.1.position.x < leftmost.1.position.x {
                leftmost = *candidate;
            }
            if candidate.1.position.x > rightmost.1.position.x {
                rightmost = *candidate;
            }
        }

        if leftmost.0 == rightmost.0 {
            return Err(Error::SeatingOrder {
                frame: frame_idx,
                reason: format!(
                    "leftmost and rightmost detections share identity {}",
                    leftmost.0
                ),
            });
        }
        if !(leftmost.1.position.x < rightmost.1.position.x) {
            return Err(Error::SeatingOrder {
                frame: frame_idx,
                reason: format!(
                    "leftmost anchor x {} is not strictly less than rightmost {}",
                    leftmost.1.position.x, rightmost.1.position.x
                ),
            });
        }
        if leftmost.1.confidence <= 0.0 || rightmost.1.confidence <= 0.0 {
            return Err(Error::SeatingOrder {
                frame: frame_idx,
                reason: "seed anchor has zero confidence".to_string(),
            });
        }

        return Ok((leftmost.0, rightmost.0));
    }

    Err(Error::NoSeedFrame)
}

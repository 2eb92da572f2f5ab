//! Forward propagation of canonical roles through a tracked video.

use tracing::{debug, warn};

use crate::consolidate::roles::{Role, RoleMap, first_ordered_pair};
use crate::error::Error;
use crate::tracker::{Joint, Skeleton};

/// One frame's per-role output. `None` means the role could not be resolved
/// this frame; `rows()` materializes it as all-zero rows rather than dropping
/// the entries.
#[derive(Debug, Clone, Default)]
pub struct RoleFrame {
    pub left: Option<Skeleton>,
    pub right: Option<Skeleton>,
}

impl RoleFrame {
    pub fn get(&self, role: Role) -> Option<&Skeleton> {
        match role {
            Role::Left => self.left.as_ref(),
            Role::Right => self.right.as_ref(),
        }
    }

    fn set(&mut self, role: Role, skeleton: Skeleton) {
        match role {
            Role::Left => self.left = Some(skeleton),
            Role::Right => self.right = Some(skeleton),
        }
    }
}

/// One `(frame, role, joint)` output row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseRow {
    pub frame: usize,
    pub role: Role,
    pub joint: Joint,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

/// Per-frame, per-role consolidated pose output. Every `(frame, role)` pair is
/// present for the full frame range, resolved or not.
#[derive(Debug, Clone)]
pub struct PoseTable {
    pub frames: Vec<RoleFrame>,
}

impl PoseTable {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Flatten into `(frame, role, joint) -> (x, y, confidence)` rows, with
    /// all-zero rows wherever a role went unresolved.
    pub fn rows(&self) -> impl Iterator<Item = PoseRow> + '_ {
        self.frames.iter().enumerate().flat_map(|(frame, slots)| {
            Role::ALL.into_iter().flat_map(move |role| {
                Joint::ALL.into_iter().map(move |joint| {
                    let keypoint = slots
                        .get(role)
                        .map(|skeleton| skeleton.joint(joint))
                        .unwrap_or_default();
                    PoseRow {
                        frame,
                        role,
                        joint,
                        x: keypoint.x,
                        y: keypoint.y,
                        confidence: keypoint.confidence,
                    }
                })
            })
        })
    }
}

/// Walk all frames forward, resolving each frame's tagged detections into the
/// two canonical roles.
///
/// Per frame: identities already known to a role are recognized directly; if
/// exactly one role and one identity then remain, they are force-resolved to
/// each other (absorbing a brand-new identity churned out by occlusion or
/// flicker) and the identity is learned. Any other residue is left explicitly
/// unresolved — logged, sentinel output, no guessed assignment.
pub fn propagate(frames: &[Vec<Skeleton>]) -> Result<PoseTable, Error> {
    let (left_seed, right_seed) = first_ordered_pair(frames)?;
    debug!(left_seed, right_seed, "seeded canonical roles");

    let mut map = RoleMap::new(left_seed, right_seed);
    let mut output = Vec::with_capacity(frames.len());

    for (frame_idx, detections) in frames.iter().enumerate() {
        let mut slots = RoleFrame::default();
        let mut pending_roles: Vec<Role> = Role::ALL.to_vec();
        let mut pending: Vec<(u64, &Skeleton)> = Vec::new();

        for skeleton in detections {
            let Some(id) = skeleton.id else {
                return Err(Error::MalformedDetection(format!(
                    "frame {frame_idx} contains a skeleton without a persistent identity"
                )));
            };

            match map.role_of(id) {
                Some(role) if pending_roles.contains(&role) => {
                    pending_roles.retain(|r| *r != role);
                    slots.set(role, skeleton.clone());
                }
                _ => pending.push((id, skeleton)),
            }
        }

        if pending_roles.len() == 1 && pending.len() == 1 {
            let role = pending_roles[0];
            let (id, skeleton) = pending[0];
            map.learn(role, id);
            slots.set(role, skeleton.clone());
            pending_roles.clear();
            pending.clear();
        }

        // Covers both the open algorithmic gap (several unknown identities
        // against several open roles, no evidence-backed resolution) and
        // surplus detections left over after every role resolved. Either way
        // the leftovers are dropped from output, so they must be logged.
        if !pending.is_empty() {
            let pending_ids: Vec<u64> = pending.iter().map(|(id, _)| *id).collect();
            warn!(
                frame = frame_idx,
                roles = ?pending_roles,
                ids = ?pending_ids,
                "detections left unresolved"
            );
        }

        output.push(slots);
    }

    Ok(PoseTable { frames: output })
}

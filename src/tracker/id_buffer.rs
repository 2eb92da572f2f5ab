//! Flicker stabilizer for identity dropouts.

use std::collections::HashSet;

use tracing::debug;

use crate::tracker::skeleton::Skeleton;

/// Patches the common failure where one of two tracked identities drops out
/// for a few frames and comes back with a fresh identity while the other was
/// continuously visible.
///
/// This is a narrow heuristic tuned to the two-subject case, not a general
/// re-identification mechanism: it only acts when exactly one known identity
/// went missing and exactly one unknown identity appeared, with at least two
/// identities known in total. Every other situation just resets the known set.
#[derive(Debug, Default)]
pub struct IdBuffer {
    known: HashSet<u64>,
}

impl IdBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect this frame's freshly tagged skeletons, relabeling in place when
    /// the single-dropout pattern is recognized.
    pub fn update(&mut self, skeletons: &mut [Skeleton]) {
        debug_assert!(skeletons.iter().all(|s| s.id.is_some()));

        let new_ids: HashSet<u64> = skeletons.iter().filter_map(|s| s.id).collect();
        let lost: Vec<u64> = self.known.difference(&new_ids).copied().collect();
        let gained: Vec<u64> = new_ids.difference(&self.known).copied().collect();

        if gained.is_empty() {
            // Every identity was already known; nothing to correct or learn.
            return;
        }

        if self.known.len() > 1 && lost.len() == 1 && gained.len() == 1 {
            let lost_id = lost[0];
            let gained_id = gained[0];
            for skeleton in skeletons.iter_mut() {
                if skeleton.id == Some(gained_id) {
                    debug!(gained_id, lost_id, "relabeling flickered identity");
                    skeleton.id = Some(lost_id);
                    break;
                }
            }
            // The known set stays as-is: the detection was corrected instead.
            return;
        }

        self.known = new_ids;
    }
}

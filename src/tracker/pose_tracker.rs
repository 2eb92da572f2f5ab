//! Frame-by-frame persistent identity assignment for one pose detector.

use std::sync::Arc;

use crate::error::Error;
use crate::tracker::id_buffer::IdBuffer;
use crate::tracker::id_provider::IdProvider;
use crate::tracker::matching::{min_cost_assignment, rmse_distance};
use crate::tracker::skeleton::Skeleton;

/// Configuration for the pose tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Hard bound on simultaneous detections per frame. The matcher's cost is
    /// factorial in this number, so exceeding it is rejected as a precondition
    /// violation rather than tolerated.
    pub max_detections: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { max_detections: 4 }
    }
}

/// One frame's identity-tagged detections plus the matching salience.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub skeletons: Vec<Skeleton>,
    /// Diagnostic only; NaN when the frame had nothing to compare.
    pub salience: f64,
}

/// Carries persistent identities forward across frames for a single detector.
///
/// Strictly sequential: each frame's assignment depends on the previous
/// frame's resolved detections. Different videos get independent trackers and
/// may run in parallel.
pub struct PoseTracker {
    previous: Vec<Skeleton>,
    buffer: IdBuffer,
    ids: Arc<IdProvider>,
    config: TrackerConfig,
    frame: usize,
}

impl PoseTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_provider(config, Arc::new(IdProvider::new()))
    }

    /// Use a shared identity provider, e.g. when identities must be unique
    /// across a whole batch of videos.
    pub fn with_provider(config: TrackerConfig, ids: Arc<IdProvider>) -> Self {
        Self {
            previous: Vec::new(),
            buffer: IdBuffer::new(),
            ids,
            config,
            frame: 0,
        }
    }

    /// Tag this frame's raw detections with persistent identities.
    ///
    /// Matched detections inherit the identity of their previous-frame
    /// counterpart; unmatched ones get freshly allocated identities. The
    /// flicker stabilizer then gets a chance to patch single-identity
    /// dropouts in place.
    pub fn update(&mut self, mut detections: Vec<Skeleton>) -> Result<FrameUpdate, Error> {
        if detections.len() > self.config.max_detections {
            return Err(Error::TooManyDetections {
                frame: self.frame,
                found: detections.len(),
                limit: self.config.max_detections,
            });
        }

        let salience = if detections.is_empty() || self.previous.is_empty() {
            f64::NAN
        } else {
            let costs = rmse_distance(&self.previous, &detections);
            let result = min_cost_assignment(&costs);
            for (old_idx, new_idx) in &result.matches {
                detections[*new_idx].id = self.previous[*old_idx].id;
            }
            result.salience
        };

        for detection in &mut detections {
            if detection.id.is_none() {
                detection.id = Some(self.ids.next_id());
            }
        }

        self.buffer.update(&mut detections);

        self.previous = detections.clone();
        self.frame += 1;

        Ok(FrameUpdate {
            skeletons: detections,
            salience,
        })
    }
}

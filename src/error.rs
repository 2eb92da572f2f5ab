//! Error types for identity tracking and consolidation.
//!
//! Per-video fatal errors (seating order, missing anchors, schema breaches)
//! surface as `Error` values and are meant to fail that video only; per-frame
//! anomalies (unresolvable role assignments, matcher fallbacks) are not errors
//! at all — they degrade with logging and sentinel output.

use thiserror::Error;

use crate::consolidate::Role;

#[derive(Debug, Error)]
pub enum Error {
    /// Input record violated the detector contract. Raised before any matching
    /// begins; never a transient condition.
    #[error("malformed detection record: {0}")]
    MalformedDetection(String),

    /// A frame carried more simultaneous detections than the configured bound.
    /// The matcher is factorial in this count, so this is a precondition
    /// violation, not a performance edge case.
    #[error("frame {frame} has {found} detections, exceeding the limit of {limit}")]
    TooManyDetections {
        frame: usize,
        found: usize,
        limit: usize,
    },

    /// No frame ever showed two simultaneous detections, so canonical roles
    /// cannot be seeded.
    #[error("no frame with at least two simultaneous detections")]
    NoSeedFrame,

    /// The first multi-detection frame contradicted the seating-order
    /// assumption; guessing a left/right assignment here would silently
    /// mislabel the whole video.
    #[error("seating-order assumption violated at frame {frame}: {reason}")]
    SeatingOrder { frame: usize, reason: String },

    /// A role never produced a usable head anchor, so the cross-modal
    /// consolidator has nothing to seed from.
    #[error("no usable head anchor found for role '{role}'")]
    MissingRoleAnchor { role: Role },
}

//! Persistent identity tracking and cross-modal consolidation for two-person
//! video recordings.
//!
//! Independent per-frame body-pose and face detectors emit detections with
//! frame-local identifiers only. This crate gives each tracked body a
//! persistent identity across a whole video, resolves which identity plays
//! which fixed semantic role ("left" / "right") from spatial ordering, and
//! reconciles the face detector's output against those roles using spatial
//! proximity and detection confidence.
//!
//! Detector invocation, video decoding, drawing, and table serialization are
//! external collaborators; everything here is in-memory numeric computation.

pub mod consolidate;
mod error;
pub mod tracker;

pub use consolidate::{
    FaceDetection, FaceTable, FailureLog, FailureRecord, PoseRow, PoseTable, Role, RoleMap,
    VideoInput, VideoOutput, consolidate_faces, process_batch, process_video, propagate,
};
pub use error::Error;
pub use tracker::{
    Anchor, AssignmentResult, BAD_MATCH_RMSE, FrameUpdate, IdProvider, Joint, Keypoint,
    MIN_CONFIDENCE, PoseTracker, Skeleton, TrackerConfig, min_cost_assignment, rmse,
};

//! Cross-frame and cross-modal consolidation.
//!
//! Takes identity-tagged pose detections, resolves them into the two fixed
//! canonical roles, and reconciles an independently-run face detector against
//! those roles frame by frame.

mod face;
mod pipeline;
mod propagate;
mod roles;

pub use face::{FaceDetection, FaceRoleFrame, FaceTable, consolidate_faces, uncertainty_weight};
pub use pipeline::{
    FailureLog, FailureRecord, VideoInput, VideoOutput, process_batch, process_video,
};
pub use propagate::{PoseRow, PoseTable, RoleFrame, propagate};
pub use roles::{Role, RoleMap, first_ordered_pair};

mod id_buffer;
mod id_provider;
mod matching;
mod pose_tracker;
mod skeleton;

pub use id_buffer::IdBuffer;
pub use id_provider::IdProvider;
pub use matching::{
    AssignmentResult, anchor_distance, cross_modal_cost, min_cost_assignment, rmse_distance,
};
pub use pose_tracker::{FrameUpdate, PoseTracker, TrackerConfig};
pub use skeleton::{
    Anchor, BAD_MATCH_RMSE, HEAD_JOINTS, Joint, Keypoint, MIN_CONFIDENCE, Skeleton, rmse,
};

//! Per-video consolidation pipeline and batch driver.

use tracing::error;

use crate::consolidate::face::{FaceDetection, FaceTable, consolidate_faces};
use crate::consolidate::propagate::{PoseTable, propagate};
use crate::error::Error;
use crate::tracker::{PoseTracker, Skeleton, TrackerConfig};

/// Raw detector output for one video: per-frame pose detections and per-frame
/// face detections, frame indices implied by position, starting at 0.
#[derive(Debug, Clone, Default)]
pub struct VideoInput {
    pub pose_frames: Vec<Vec<Skeleton>>,
    pub face_frames: Vec<Vec<FaceDetection>>,
}

/// Consolidated output for one video.
#[derive(Debug, Clone)]
pub struct VideoOutput {
    pub pose: PoseTable,
    pub faces: FaceTable,
    /// Per-frame matching salience, diagnostic only; NaN where undefined.
    pub saliences: Vec<f64>,
}

/// Run the full chain for one video: identity assignment, role propagation,
/// cross-modal face consolidation.
///
/// All work is in-memory and strictly frame-sequential; different videos are
/// independent and can be processed in parallel by the caller.
pub fn process_video(input: VideoInput, config: &TrackerConfig) -> Result<VideoOutput, Error> {
    validate_faces(&input.face_frames)?;

    let mut tracker = PoseTracker::new(config.clone());
    let mut tagged = Vec::with_capacity(input.pose_frames.len());
    let mut saliences = Vec::with_capacity(input.pose_frames.len());

    for detections in input.pose_frames {
        let update = tracker.update(detections)?;
        saliences.push(update.salience);
        tagged.push(update.skeletons);
    }

    let pose = propagate(&tagged)?;
    let faces = consolidate_faces(&pose, &input.face_frames)?;

    Ok(VideoOutput {
        pose,
        faces,
        saliences,
    })
}

/// Fail fast on face records that break the detector contract, before any
/// matching begins.
fn validate_faces(face_frames: &[Vec<FaceDetection>]) -> Result<(), Error> {
    for (frame_idx, faces) in face_frames.iter().enumerate() {
        for face in faces {
            if face.landmarks.is_empty() {
                return Err(Error::MalformedDetection(format!(
                    "face {} in frame {frame_idx} has no landmarks",
                    face.id
                )));
            }
            if !(0.0..=1.0).contains(&face.confidence) {
                return Err(Error::MalformedDetection(format!(
                    "face {} in frame {frame_idx} has confidence {} outside [0, 1]",
                    face.id, face.confidence
                )));
            }
        }
    }
    Ok(())
}

/// One video that could not be processed, with the reason it failed.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub video: String,
    pub reason: String,
}

/// Append-only record of failed videos across a batch.
#[derive(Debug, Default)]
pub struct FailureLog {
    records: Vec<FailureRecord>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_failed(&mut self, video: &str, reason: &Error) {
        error!(video, %reason, "video failed; skipping");
        self.records.push(FailureRecord {
            video: video.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Process a batch of videos. A failed video is recorded and skipped, its
/// partial output discarded; it never aborts the rest of the batch.
pub fn process_batch<I>(videos: I, config: &TrackerConfig) -> (Vec<(String, VideoOutput)>, FailureLog)
where
    I: IntoIterator<Item = (String, VideoInput)>,
{
    let mut outputs = Vec::new();
    let mut failures = FailureLog::new();

    for (name, input) in videos {
        match process_video(input, config) {
            Ok(output) => outputs.push((name, output)),
            Err(err) => failures.add_failed(&name, &err),
        }
    }

    (outputs, failures)
}

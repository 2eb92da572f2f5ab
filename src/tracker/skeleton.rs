//! Skeleton data model for body-pose detections.
//!
//! A detector emits, per frame, a list of skeletons in the BODY_25 layout: one
//! keypoint per anatomical joint, always all 25 of them, with a zero-confidence
//! sentinel standing in for joints it could not see.

use nalgebra::{Point2, Vector2};

use crate::error::Error;

/// Joints below this confidence are ignored for matching and anchors.
pub const MIN_CONFIDENCE: f64 = 0.20;

/// Cost reported when two skeletons share no confidence-eligible joint.
///
/// Finite on purpose: the matcher sums and compares costs, and an infinity would
/// poison the salience ratio. Must stay larger than any achievable real cost.
pub const BAD_MATCH_RMSE: f64 = 1e30;

/// The 25 joints of the BODY_25 pose model, in detector output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Nose,
    Neck,
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    MidHip,
    RightHip,
    RightKnee,
    RightAnkle,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    RightEye,
    LeftEye,
    RightEar,
    LeftEar,
    LeftBigToe,
    LeftSmallToe,
    LeftHeel,
    RightBigToe,
    RightSmallToe,
    RightHeel,
}

impl Joint {
    pub const COUNT: usize = 25;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::Neck,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::MidHip,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
        Joint::RightEye,
        Joint::LeftEye,
        Joint::RightEar,
        Joint::LeftEar,
        Joint::LeftBigToe,
        Joint::LeftSmallToe,
        Joint::LeftHeel,
        Joint::RightBigToe,
        Joint::RightSmallToe,
        Joint::RightHeel,
    ];

    /// Snake_case joint name as used in detector output tables.
    pub fn name(&self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::Neck => "neck",
            Joint::RightShoulder => "right_shoulder",
            Joint::RightElbow => "right_elbow",
            Joint::RightWrist => "right_wrist",
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::MidHip => "mid_hip",
            Joint::RightHip => "right_hip",
            Joint::RightKnee => "right_knee",
            Joint::RightAnkle => "right_ankle",
            Joint::LeftHip => "left_hip",
            Joint::LeftKnee => "left_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightEye => "right_eye",
            Joint::LeftEye => "left_eye",
            Joint::RightEar => "right_ear",
            Joint::LeftEar => "left_ear",
            Joint::LeftBigToe => "left_big_toe",
            Joint::LeftSmallToe => "left_small_toe",
            Joint::LeftHeel => "left_heel",
            Joint::RightBigToe => "right_big_toe",
            Joint::RightSmallToe => "right_small_toe",
            Joint::RightHeel => "right_heel",
        }
    }
}

/// Head joints used to anchor a skeleton for face matching.
pub const HEAD_JOINTS: [Joint; 5] = [
    Joint::Nose,
    Joint::RightEye,
    Joint::LeftEye,
    Joint::RightEar,
    Joint::LeftEar,
];

/// One detected joint position with its detection confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, confidence }
    }
}

/// A single confidence-weighted 2D point summarizing a detection's location.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub position: Point2<f64>,
    pub confidence: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            confidence,
        }
    }
}

/// One full-body detection: all 25 joints, plus the persistent identity once the
/// tracker has assigned one. The detector's own per-frame identifier carries no
/// cross-frame meaning and is not stored.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub joints: [Keypoint; Joint::COUNT],
    pub id: Option<u64>,
}

impl Skeleton {
    pub fn new(joints: [Keypoint; Joint::COUNT]) -> Self {
        Self { joints, id: None }
    }

    /// All joints at the origin with zero confidence, no identity.
    pub fn zeroed() -> Self {
        Self::new([Keypoint::default(); Joint::COUNT])
    }

    /// Parse the flat `[x0, y0, c0, x1, y1, c1, ...]` layout emitted by the pose
    /// detector. Fails fast on any other shape.
    pub fn from_flat(values: &[f64]) -> Result<Self, Error> {
        if values.len() != 3 * Joint::COUNT {
            return Err(Error::MalformedDetection(format!(
                "expected {} keypoint values, found {}",
                3 * Joint::COUNT,
                values.len()
            )));
        }

        let mut joints = [Keypoint::default(); Joint::COUNT];
        for (idx, chunk) in values.chunks_exact(3).enumerate() {
            joints[idx] = Keypoint::new(chunk[0], chunk[1], chunk[2]);
        }
        Ok(Self::new(joints))
    }

    pub fn joint(&self, joint: Joint) -> Keypoint {
        self.joints[joint as usize]
    }

    pub fn set_joint(&mut self, joint: Joint, keypoint: Keypoint) {
        self.joints[joint as usize] = keypoint;
    }

    /// Geometric center of all joints above `MIN_CONFIDENCE`.
    ///
    /// The anchor confidence averages over *all* joints, eligible or not, so a
    /// mostly-missing skeleton reports a low-confidence anchor. With no eligible
    /// joint the position is NaN and the confidence zero.
    pub fn center_of_mass(&self) -> Anchor {
        let mut sum = Vector2::zeros();
        let mut eligible = 0usize;
        let mut confidence_sum = 0.0;

        for keypoint in &self.joints {
            confidence_sum += keypoint.confidence;
            if keypoint.confidence > MIN_CONFIDENCE {
                sum += Vector2::new(keypoint.x, keypoint.y);
                eligible += 1;
            }
        }

        if eligible == 0 {
            return Anchor::new(f64::NAN, f64::NAN, 0.0);
        }

        let mean = sum / eligible as f64;
        Anchor::new(mean.x, mean.y, confidence_sum / Joint::COUNT as f64)
    }

    /// Face-region anchor: mean of the head joints above `MIN_CONFIDENCE`.
    ///
    /// The confidence divides by the full head-joint count, so ignored points
    /// drag it down. Zero-confidence anchor at the origin when every head joint
    /// is below threshold.
    pub fn head_anchor(&self) -> Anchor {
        let mut sum = Vector2::zeros();
        let mut confidence_sum = 0.0;
        let mut kept = 0usize;

        for joint in HEAD_JOINTS {
            let keypoint = self.joint(joint);
            if keypoint.confidence > MIN_CONFIDENCE {
                sum += Vector2::new(keypoint.x, keypoint.y);
                confidence_sum += keypoint.confidence;
                kept += 1;
            }
        }

        if kept == 0 {
            return Anchor::new(0.0, 0.0, 0.0);
        }

        let mean = sum / kept as f64;
        Anchor::new(mean.x, mean.y, confidence_sum / HEAD_JOINTS.len() as f64)
    }
}

/// Root mean square error between two skeletons over the joints where *both*
/// sides clear `MIN_CONFIDENCE`. Returns `BAD_MATCH_RMSE` when no joint pair
/// qualifies, keeping the matcher's arithmetic finite.
pub fn rmse(first: &Skeleton, second: &Skeleton) -> f64 {
    let mut sum_errors = 0.0;
    let mut count = 0usize;

    for joint in Joint::ALL {
        let a = first.joint(joint);
        let b = second.joint(joint);

        if a.confidence < MIN_CONFIDENCE || b.confidence < MIN_CONFIDENCE {
            continue;
        }

        sum_errors += (a.x - b.x).powi(2) + (a.y - b.y).powi(2);
        count += 1;
    }

    if count == 0 {
        BAD_MATCH_RMSE
    } else {
        (sum_errors / count as f64).sqrt()
    }
}

//! Cross-modal consolidation of face detections into canonical roles.
//!
//! The face detector runs independently from the pose detector and knows
//! nothing about persistent identities. Here its per-frame detections are
//! matched against the role anchors already established by the pose pass,
//! re-expressing the face output in the same two canonical roles.

use nalgebra::Point2;

use crate::consolidate::propagate::PoseTable;
use crate::consolidate::roles::Role;
use crate::error::Error;
use crate::tracker::{Anchor, MIN_CONFIDENCE, anchor_distance, min_cost_assignment};

/// One raw face detection: the detector's frame-local identifier, the full 2D
/// landmark set, and the detector's overall confidence for the registration.
#[derive(Debug, Clone)]
pub struct FaceDetection {
    pub id: u64,
    pub landmarks: Vec<Point2<f64>>,
    pub confidence: f64,
}

impl FaceDetection {
    /// Reduce to the mean landmark position with the detection's own
    /// confidence. Only this anchor is ever used for matching, never the full
    /// landmark set.
    pub fn anchor(&self) -> Anchor {
        if self.landmarks.is_empty() {
            return Anchor::new(f64::NAN, f64::NAN, 0.0);
        }
        let n = self.landmarks.len() as f64;
        let x = self.landmarks.iter().map(|p| p.x).sum::<f64>() / n;
        let y = self.landmarks.iter().map(|p| p.y).sum::<f64>() / n;
        Anchor::new(x, y, self.confidence)
    }
}

/// One frame's per-role face output; `None` is the sentinel for an unmatched
/// role.
#[derive(Debug, Clone, Default)]
pub struct FaceRoleFrame {
    pub left: Option<FaceDetection>,
    pub right: Option<FaceDetection>,
}

impl FaceRoleFrame {
    pub fn get(&self, role: Role) -> Option<&FaceDetection> {
        match role {
            Role::Left => self.left.as_ref(),
            Role::Right => self.right.as_ref(),
        }
    }

    fn set(&mut self, role: Role, detection: FaceDetection) {
        match role {
            Role::Left => self.left = Some(detection),
            Role::Right => self.right = Some(detection),
        }
    }
}

/// Per-frame, per-role consolidated face output. Every `(frame, role)` pair
/// exists for the full frame range.
#[derive(Debug, Clone)]
pub struct FaceTable {
    pub frames: Vec<FaceRoleFrame>,
}

impl FaceTable {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, frame: usize, role: Role) -> Option<&FaceDetection> {
        self.frames.get(frame).and_then(|slots| slots.get(role))
    }
}

/// Natural scale for the cross-modal uncertainty penalty: the larger of the
/// population standard deviations of all landmark x and y coordinates across
/// the whole video. Zero when there are no landmarks at all.
pub fn uncertainty_weight(face_frames: &[Vec<FaceDetection>]) -> f64 {
    let xs: Vec<f64> = face_frames
        .iter()
        .flatten()
        .flat_map(|face| face.landmarks.iter().map(|p| p.x))
        .collect();
    let ys: Vec<f64> = face_frames
        .iter()
        .flatten()
        .flat_map(|face| face.landmarks.iter().map(|p| p.y))
        .collect();

    std_dev(&xs).max(std_dev(&ys))
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Match every frame's face detections against the canonical-role head
/// anchors carried forward from the pose pass.
///
/// Each role's anchor starts from the first frame where that role has a
/// usable head anchor (fatal if none exists) and is refreshed whenever the
/// pose output provides a better-than-threshold anchor, so pose dropouts fall
/// back to the most recent known-good position instead of losing the role.
pub fn consolidate_faces(
    pose: &PoseTable,
    face_frames: &[Vec<FaceDetection>],
) -> Result<FaceTable, Error> {
    let weight = uncertainty_weight(face_frames);

    let mut left_anchor = seek_first_anchor(pose, Role::Left)?;
    let mut right_anchor = seek_first_anchor(pose, Role::Right)?;

    let total_frames = pose.frames.len().max(face_frames.len());
    let mut output = Vec::with_capacity(total_frames);

    for frame_idx in 0..total_frames {
        if let Some(slots) = pose.frames.get(frame_idx) {
            if let Some(anchor) = usable_anchor(slots.get(Role::Left)) {
                left_anchor = anchor;
            }
            if let Some(anchor) = usable_anchor(slots.get(Role::Right)) {
                right_anchor = anchor;
            }
        }

        let mut slots = FaceRoleFrame::default();
        let faces = face_frames
            .get(frame_idx)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if !faces.is_empty() {
            let role_anchors = [left_anchor, right_anchor];
            let face_anchors: Vec<Anchor> = faces.iter().map(FaceDetection::anchor).collect();
            let costs = anchor_distance(&role_anchors, &face_anchors, weight);
            let result = min_cost_assignment(&costs);

            for (role_idx, face_idx) in result.matches {
                let role = Role::ALL[role_idx];
                slots.set(role, faces[face_idx].clone());
            }
        }

        output.push(slots);
    }

    Ok(FaceTable { frames: output })
}

fn usable_anchor(skeleton: Option<&crate::tracker::Skeleton>) -> Option<Anchor> {
    skeleton
        .map(|s| s.head_anchor())
        .filter(|anchor| anchor.confidence > MIN_CONFIDENCE)
}

fn seek_first_anchor(pose: &PoseTable, role: Role) -> Result<Anchor, Error> {
    pose.frames
        .iter()
        .find_map(|slots| usable_anchor(slots.get(role)))
        .ok_or(Error::MissingRoleAnchor { role })
}

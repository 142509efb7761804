//! Greedy non-maximum suppression over display-space detections.

use crate::geometry::{iou, DisplayBox};
use crate::trace::{trace_event, trace_span};
use std::cmp::Ordering;

/// A decoded detection in display coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Index into the class label set.
    pub class_index: usize,
    /// Detection score.
    pub score: f32,
    /// Box in integer display pixels.
    pub bbox: DisplayBox,
}

fn score_desc(a: &Detection, b: &Detection) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Sorts by descending score; equal scores keep their input order.
pub(crate) fn sort_detections_desc(detections: &mut [Detection]) {
    // Must stay a stable sort: equal scores keep insertion order.
    detections.sort_by(score_desc);
}

/// Keeps at most `limit` detections, dropping any box whose IoU with an
/// already kept, higher-ranked box is strictly greater than `iou_threshold`.
///
/// Suppression is class-agnostic. The result is in descending score order,
/// with ties in input order.
pub fn suppress(
    mut detections: Vec<Detection>,
    limit: usize,
    iou_threshold: f32,
) -> Vec<Detection> {
    let _span = trace_span!("suppress", candidates = detections.len(), limit).entered();

    if detections.is_empty() || limit == 0 {
        return Vec::new();
    }

    sort_detections_desc(&mut detections);

    let mut active = vec![true; detections.len()];
    let mut num_active = detections.len();
    let mut kept = Vec::with_capacity(limit.min(detections.len()));

    for i in 0..detections.len() {
        if !active[i] {
            continue;
        }
        let a = detections[i];
        kept.push(a);
        if kept.len() == limit {
            break;
        }
        active[i] = false;
        num_active -= 1;

        for j in (i + 1)..detections.len() {
            if active[j] && iou(&a.bbox, &detections[j].bbox) > iou_threshold {
                active[j] = false;
                num_active -= 1;
            }
        }
        if num_active == 0 {
            break;
        }
    }

    trace_event!("suppress_done", kept = kept.len());
    kept
}

//! Decoder for `[cx, cy, w, h, conf, class_id]` rows.

use super::{Candidate, RowDecoder, RowParams, RowVerdict};
use crate::geometry::ModelBox;
use crate::layout::CLASS_ID_COLUMNS;
use crate::util::math::{all_finite, clamp_class_id};

/// Single confidence plus numeric class id layout.
///
/// The class id is rounded and clamped into the label range, so a model that
/// emits ids past the label set still yields usable rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassIdDecoder;

impl RowDecoder for ClassIdDecoder {
    const NAME: &'static str = "class_id";

    fn cols(&self) -> usize {
        CLASS_ID_COLUMNS
    }

    fn decode_row(&self, row: &[f32], params: RowParams) -> RowVerdict {
        if !all_finite(row) {
            return RowVerdict::NonFinite;
        }

        let confidence = row[4];
        if confidence < params.score_threshold {
            return RowVerdict::BelowThreshold;
        }

        RowVerdict::Keep(Candidate {
            class_index: clamp_class_id(row[5], params.num_classes),
            score: confidence,
            bbox: ModelBox::new(row[0], row[1], row[2], row[3]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ClassIdDecoder;
    use crate::decode::{RowDecoder, RowParams, RowVerdict};

    fn params(num_classes: usize) -> RowParams {
        RowParams {
            score_threshold: 0.25,
            num_classes,
        }
    }

    fn class_of(row: [f32; 6], num_classes: usize) -> usize {
        match ClassIdDecoder.decode_row(&row, params(num_classes)) {
            RowVerdict::Keep(c) => c.class_index,
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn keeps_confidence_as_score() {
        let row = [10.0, 10.0, 4.0, 4.0, 0.66, 2.0];
        let RowVerdict::Keep(c) = ClassIdDecoder.decode_row(&row, params(4)) else {
            panic!("row should be kept");
        };
        assert_eq!(c.score, 0.66);
        assert_eq!(c.class_index, 2);
    }

    #[test]
    fn class_id_is_rounded_and_clamped() {
        assert_eq!(class_of([0.0, 0.0, 1.0, 1.0, 0.9, 1.4], 4), 1);
        assert_eq!(class_of([0.0, 0.0, 1.0, 1.0, 0.9, 1.5], 4), 2);
        assert_eq!(class_of([0.0, 0.0, 1.0, 1.0, 0.9, 7.0], 4), 3);
        assert_eq!(class_of([0.0, 0.0, 1.0, 1.0, 0.9, -2.0], 4), 0);
    }

    #[test]
    fn low_confidence_is_dropped() {
        let row = [0.0, 0.0, 1.0, 1.0, 0.1, 0.0];
        assert_eq!(
            ClassIdDecoder.decode_row(&row, params(4)),
            RowVerdict::BelowThreshold
        );
    }

    #[test]
    fn confidence_at_threshold_is_kept() {
        let row = [0.0, 0.0, 1.0, 1.0, 0.25, 1.0];
        let RowVerdict::Keep(c) = ClassIdDecoder.decode_row(&row, params(4)) else {
            panic!("row at the threshold should be kept");
        };
        assert_eq!(c.score, 0.25);
        assert_eq!(c.class_index, 1);
    }

    #[test]
    fn class_id_just_below_half_rounds_down() {
        assert_eq!(class_of([0.0, 0.0, 1.0, 1.0, 0.9, 0.49999997], 4), 0);
    }

    #[test]
    fn nan_class_id_marks_row_non_finite() {
        let row = [0.0, 0.0, 1.0, 1.0, 0.9, f32::NAN];
        assert_eq!(
            ClassIdDecoder.decode_row(&row, params(4)),
            RowVerdict::NonFinite
        );
    }
}

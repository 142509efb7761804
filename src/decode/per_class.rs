//! Decoder for `[cx, cy, w, h, obj, p_0 .. p_{N-1}]` rows.

use super::{Candidate, RowDecoder, RowParams, RowVerdict};
use crate::geometry::ModelBox;
use crate::layout::BOX_COLUMNS;
use crate::util::math::all_finite;

/// Objectness plus per-class probability layout.
///
/// Two gates use the same threshold: objectness alone, then
/// `objectness * max_class_prob`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerClassDecoder {
    num_classes: usize,
}

impl PerClassDecoder {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }
}

/// Index and value of the first maximum; later equal values do not displace it.
fn first_argmax(values: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = values.split_first()?;
    let mut best = (0usize, first);
    for (offset, &value) in rest.iter().enumerate() {
        if value > best.1 {
            best = (offset + 1, value);
        }
    }
    Some(best)
}

impl RowDecoder for PerClassDecoder {
    const NAME: &'static str = "per_class";

    fn cols(&self) -> usize {
        BOX_COLUMNS + self.num_classes
    }

    fn decode_row(&self, row: &[f32], params: RowParams) -> RowVerdict {
        if !all_finite(row) {
            return RowVerdict::NonFinite;
        }

        let objectness = row[4];
        if objectness < params.score_threshold {
            return RowVerdict::BelowThreshold;
        }

        let Some((class_index, max_prob)) = first_argmax(&row[BOX_COLUMNS..]) else {
            return RowVerdict::BelowThreshold;
        };

        let score = objectness * max_prob;
        if score < params.score_threshold {
            return RowVerdict::BelowThreshold;
        }

        RowVerdict::Keep(Candidate {
            class_index,
            score,
            bbox: ModelBox::new(row[0], row[1], row[2], row[3]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{first_argmax, PerClassDecoder};
    use crate::decode::{RowDecoder, RowParams, RowVerdict};
    use crate::geometry::ModelBox;

    const PARAMS: RowParams = RowParams {
        score_threshold: 0.25,
        num_classes: 4,
    };

    #[test]
    fn combined_score_and_argmax() {
        let decoder = PerClassDecoder::new(4);
        let row = [100.0, 80.0, 40.0, 20.0, 0.9, 0.1, 0.8, 0.05, 0.05];
        let RowVerdict::Keep(c) = decoder.decode_row(&row, PARAMS) else {
            panic!("row should be kept");
        };
        assert_eq!(c.class_index, 1);
        assert!((c.score - 0.72).abs() < 1e-6);
        assert_eq!(c.bbox, ModelBox::new(100.0, 80.0, 40.0, 20.0));
    }

    #[test]
    fn low_objectness_is_dropped() {
        let decoder = PerClassDecoder::new(4);
        let row = [1.0, 1.0, 1.0, 1.0, 0.2, 1.0, 0.0, 0.0, 0.0];
        assert_eq!(decoder.decode_row(&row, PARAMS), RowVerdict::BelowThreshold);
    }

    #[test]
    fn combined_score_gate_is_independent() {
        // obj passes (0.5), but 0.5 * 0.4 = 0.2 does not.
        let decoder = PerClassDecoder::new(4);
        let row = [1.0, 1.0, 1.0, 1.0, 0.5, 0.4, 0.1, 0.1, 0.1];
        assert_eq!(decoder.decode_row(&row, PARAMS), RowVerdict::BelowThreshold);
    }

    #[test]
    fn ties_keep_first_class() {
        assert_eq!(first_argmax(&[0.3, 0.7, 0.7, 0.1]), Some((1, 0.7)));
        assert_eq!(first_argmax(&[0.5, 0.5]), Some((0, 0.5)));
        assert_eq!(first_argmax(&[]), None);
    }

    #[test]
    fn threshold_is_inclusive() {
        let decoder = PerClassDecoder::new(1);
        let params = RowParams {
            score_threshold: 0.5,
            num_classes: 1,
        };
        let row = [1.0, 1.0, 1.0, 1.0, 0.5, 1.0];
        assert!(matches!(
            decoder.decode_row(&row, params),
            RowVerdict::Keep(_)
        ));
    }

    #[test]
    fn infinite_probability_marks_row_non_finite() {
        let decoder = PerClassDecoder::new(4);
        let row = [1.0, 1.0, 1.0, 1.0, 0.9, f32::INFINITY, 0.0, 0.0, 0.0];
        assert_eq!(decoder.decode_row(&row, PARAMS), RowVerdict::NonFinite);
    }
}

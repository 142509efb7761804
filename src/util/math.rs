//! Numeric helpers shared by the decoders and the mapper.

/// Rounds a raw class id to the nearest integer and clamps it into
/// `[0, num_classes - 1]`.
///
/// Halves round away from zero; negative ids clamp to 0 either way.
pub(crate) fn clamp_class_id(raw: f32, num_classes: usize) -> usize {
    let max = num_classes.saturating_sub(1) as i64;
    (raw.round() as i64).clamp(0, max) as usize
}

/// Truncates toward zero, saturating at the `i32` range.
pub(crate) fn truncate_px(value: f32) -> i32 {
    value as i32
}

/// Returns true when every value in the slice is finite.
pub(crate) fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{all_finite, clamp_class_id, truncate_px};

    #[test]
    fn clamp_class_id_stays_in_range() {
        assert_eq!(clamp_class_id(-3.0, 4), 0);
        assert_eq!(clamp_class_id(1.6, 4), 2);
        assert_eq!(clamp_class_id(99.0, 4), 3);
        assert_eq!(clamp_class_id(0.4, 1), 0);
        assert_eq!(clamp_class_id(2.5, 4), 3);
        assert_eq!(clamp_class_id(-0.5, 4), 0);
        assert_eq!(clamp_class_id(0.49999997, 4), 0);
        assert_eq!(clamp_class_id(1.4999999, 4), 1);
    }

    #[test]
    fn truncate_px_rounds_toward_zero() {
        assert_eq!(truncate_px(3.99), 3);
        assert_eq!(truncate_px(-3.99), -3);
        assert_eq!(truncate_px(-0.5), 0);
    }

    #[test]
    fn all_finite_rejects_nan_and_inf() {
        assert!(all_finite(&[0.0, 1.0, -2.0]));
        assert!(!all_finite(&[0.0, f32::NAN]));
        assert!(!all_finite(&[f32::INFINITY]));
    }
}

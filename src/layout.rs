//! Output layout resolution from buffer length.
//!
//! Two row encodings are supported:
//!
//! - per-class: `[cx, cy, w, h, obj, p_0 .. p_{N-1}]`, `5 + N` columns;
//! - class-id: `[cx, cy, w, h, conf, class_id]`, 6 columns.
//!
//! The resolver only sees the buffer length, so when both column counts divide
//! it (always the case for `N == 1`, where both are 6) the per-class layout is
//! chosen. That is a fixed policy: the true output contract of the model is not
//! available here.

use crate::util::{DecodeError, DecodeResult};

/// Leading columns shared by both layouts: `cx, cy, w, h` plus one score.
pub const BOX_COLUMNS: usize = 5;

/// Column count of the class-id layout.
pub const CLASS_ID_COLUMNS: usize = 6;

/// Row layout of a raw output buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Box, objectness and one probability per class.
    PerClass { rows: usize, cols: usize },
    /// Box, confidence and a numeric class id.
    ClassId { rows: usize },
}

impl Layout {
    /// Number of rows in the buffer.
    pub fn rows(&self) -> usize {
        match *self {
            Layout::PerClass { rows, .. } | Layout::ClassId { rows } => rows,
        }
    }

    /// Number of columns per row.
    pub fn cols(&self) -> usize {
        match *self {
            Layout::PerClass { cols, .. } => cols,
            Layout::ClassId { .. } => CLASS_ID_COLUMNS,
        }
    }

    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Layout::PerClass { .. } => "per_class",
            Layout::ClassId { .. } => "class_id",
        }
    }
}

/// Picks the layout for a buffer of `len` values and `num_classes` labels.
///
/// The per-class layout is tested first; the class-id layout is the fallback.
pub fn resolve_layout(len: usize, num_classes: usize) -> DecodeResult<Layout> {
    if len == 0 {
        return Err(DecodeError::EmptyInput);
    }

    let per_class_cols = BOX_COLUMNS + num_classes;
    if len % per_class_cols == 0 {
        return Ok(Layout::PerClass {
            rows: len / per_class_cols,
            cols: per_class_cols,
        });
    }

    if len % CLASS_ID_COLUMNS == 0 {
        return Ok(Layout::ClassId {
            rows: len / CLASS_ID_COLUMNS,
        });
    }

    Err(DecodeError::UnknownFormat { len, num_classes })
}

#[cfg(test)]
mod tests {
    use super::{resolve_layout, Layout};
    use crate::util::DecodeError;

    #[test]
    fn per_class_layout_for_multiple_of_five_plus_n() {
        assert_eq!(
            resolve_layout(9 * 3, 4).unwrap(),
            Layout::PerClass { rows: 3, cols: 9 }
        );
    }

    #[test]
    fn class_id_layout_when_only_six_divides() {
        let layout = resolve_layout(12, 4).unwrap();
        assert_eq!(layout, Layout::ClassId { rows: 2 });
        assert_eq!(layout.cols(), 6);
    }

    #[test]
    fn single_class_prefers_per_class() {
        assert_eq!(
            resolve_layout(18, 1).unwrap(),
            Layout::PerClass { rows: 3, cols: 6 }
        );
    }

    #[test]
    fn both_divisible_prefers_per_class() {
        // 7 columns vs 6 columns, 42 is a multiple of both.
        assert_eq!(
            resolve_layout(42, 2).unwrap(),
            Layout::PerClass { rows: 6, cols: 7 }
        );
    }

    #[test]
    fn empty_and_unknown_lengths_fail() {
        assert_eq!(resolve_layout(0, 4), Err(DecodeError::EmptyInput));
        assert_eq!(
            resolve_layout(7, 4),
            Err(DecodeError::UnknownFormat {
                len: 7,
                num_classes: 4
            })
        );
    }
}

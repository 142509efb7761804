//! Row decoding strategies.
//!
//! Each layout has one [`RowDecoder`]. The decoders only turn a row of raw
//! values into a model-space [`Candidate`]; mapping and suppression are shared
//! and layout-agnostic.

use crate::geometry::ModelBox;

mod class_id;
mod per_class;

pub use class_id::ClassIdDecoder;
pub use per_class::PerClassDecoder;

/// A row that passed the score gates, still in model-input pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Index into the class label set.
    pub class_index: usize,
    /// Final score in `[0, 1]` for well-formed model output.
    pub score: f32,
    /// Center/size box in model-input pixels.
    pub bbox: ModelBox,
}

/// Per-call parameters shared by every row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowParams {
    pub score_threshold: f32,
    pub num_classes: usize,
}

/// What a decoder made of a single row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RowVerdict {
    Keep(Candidate),
    BelowThreshold,
    /// The row holds NaN or infinite values and is skipped.
    NonFinite,
}

/// Strategy for decoding rows of one output layout.
pub trait RowDecoder: Sync {
    /// Name reported in logs.
    const NAME: &'static str;

    /// Columns per row.
    fn cols(&self) -> usize;

    /// Decodes one row of exactly `cols()` values.
    fn decode_row(&self, row: &[f32], params: RowParams) -> RowVerdict;
}

/// Candidates decoded from a buffer, in row order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedRows {
    pub candidates: Vec<Candidate>,
    /// Rows skipped because of non-finite values.
    pub non_finite: usize,
}

impl DecodedRows {
    fn push(&mut self, verdict: RowVerdict) {
        match verdict {
            RowVerdict::Keep(candidate) => self.candidates.push(candidate),
            RowVerdict::BelowThreshold => {}
            RowVerdict::NonFinite => self.non_finite += 1,
        }
    }
}

impl FromIterator<RowVerdict> for DecodedRows {
    fn from_iter<I: IntoIterator<Item = RowVerdict>>(iter: I) -> Self {
        let mut out = DecodedRows::default();
        for verdict in iter {
            out.push(verdict);
        }
        out
    }
}

/// Decodes every complete row of `raw` with `decoder`.
///
/// Trailing values that do not fill a row are ignored; callers resolve the
/// layout first, so the buffer is always an exact multiple of `cols()`.
pub fn decode_rows<D: RowDecoder>(decoder: &D, raw: &[f32], params: RowParams) -> DecodedRows {
    raw.chunks_exact(decoder.cols())
        .map(|row| decoder.decode_row(row, params))
        .collect()
}

/// Parallel variant of [`decode_rows`]; candidate order is unchanged.
#[cfg(feature = "rayon")]
pub fn decode_rows_par<D: RowDecoder>(
    decoder: &D,
    raw: &[f32],
    params: RowParams,
) -> DecodedRows {
    use rayon::prelude::*;

    let verdicts: Vec<RowVerdict> = raw
        .par_chunks_exact(decoder.cols())
        .map(|row| decoder.decode_row(row, params))
        .collect();
    verdicts.into_iter().collect()
}

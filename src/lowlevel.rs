//! Building blocks for custom decode pipelines.
//!
//! Most callers only need [`crate::Decoder`]. These re-exports cover running
//! a specific row decoder, or suppression, on buffers the caller has already
//! split or filtered.

#[cfg(feature = "rayon")]
pub use crate::decode::decode_rows_par;
pub use crate::decode::{
    decode_rows, Candidate, ClassIdDecoder, DecodedRows, PerClassDecoder, RowDecoder, RowParams,
    RowVerdict,
};
pub use crate::geometry::IOU_EPS;
pub use crate::layout::{BOX_COLUMNS, CLASS_ID_COLUMNS};

//! detpost turns the flat output buffer of an object-detection model into a
//! ranked, de-duplicated list of boxes in display coordinates.
//!
//! The pipeline resolves which of two row layouts the buffer uses, decodes
//! each row into a scored candidate, maps its box from model input pixels to
//! view pixels, and runs greedy non-maximum suppression. Row decoding can run
//! on rayon's pool with the `rayon` feature; the `tracing` feature emits spans
//! and events for each stage.
//!
//! ```
//! use detpost::{ClassLabels, DecodeConfig, Decoder, ModelInput, ScaleContext};
//!
//! let labels = ClassLabels::parse("cat\ndog\n");
//! let decoder = Decoder::new(labels, ModelInput::default(), DecodeConfig::default()).unwrap();
//! // One class-id row: cx, cy, w, h, confidence, class id.
//! let raw = [64.0, 64.0, 32.0, 32.0, 0.8, 1.0];
//! let detections = decoder.decode(&raw, &ScaleContext::identity()).unwrap();
//! assert_eq!(decoder.label(&detections[0]), Some("dog"));
//! ```

pub mod config;
mod decode;
pub mod geometry;
pub mod layout;
pub mod lowlevel;
pub mod mapping;
mod pipeline;
mod suppress;
mod trace;
pub mod util;

pub use config::{ClassLabels, DecodeConfig, ModelInput};
pub use geometry::{iou, DisplayBox, ModelBox};
pub use layout::{resolve_layout, Layout};
pub use mapping::{ScaleContext, Size};
pub use pipeline::{Decoder, DecoderCell};
pub use suppress::{suppress, Detection};
pub use util::{DecodeError, DecodeResult};

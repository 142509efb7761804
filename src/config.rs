//! Process-wide decode configuration.
//!
//! Everything here is built once and then only read. Replacing labels or
//! thresholds means building a new [`crate::Decoder`]; see
//! [`crate::DecoderCell`] for swapping one in while decodes are running.

use crate::util::{DecodeError, DecodeResult};
use std::sync::Arc;

/// Label used when a label file yields no entries.
pub const FALLBACK_LABEL: &str = "class0";

/// Ordered, non-empty set of class labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassLabels {
    names: Arc<[String]>,
}

impl ClassLabels {
    /// Creates a label set; an empty list is rejected.
    pub fn new(names: Vec<String>) -> DecodeResult<Self> {
        if names.is_empty() {
            return Err(DecodeError::EmptyLabels);
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Parses one label per line, trimming whitespace and skipping blank lines.
    ///
    /// Text without any label yields the single label `class0`.
    pub fn parse(text: &str) -> Self {
        let mut names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            names.push(FALLBACK_LABEL.to_owned());
        }
        Self {
            names: names.into(),
        }
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when there are no labels.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the label at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Iterates labels in class-index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self {
            names: ["0", "1", "2", "3"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Width and height of the model input tensor in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelInput {
    pub width: usize,
    pub height: usize,
}

impl ModelInput {
    /// Creates a model input size; zero dimensions are rejected.
    pub fn new(width: usize, height: usize) -> DecodeResult<Self> {
        let input = Self { width, height };
        input.validate()?;
        Ok(input)
    }

    /// Validates the dimensions.
    pub fn validate(&self) -> DecodeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for ModelInput {
    fn default() -> Self {
        Self {
            width: 320,
            height: 320,
        }
    }
}

/// Thresholds and limits for decoding and suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Rows scoring below this are dropped. Applied to objectness and to the
    /// combined score in the per-class layout, to the confidence otherwise.
    pub score_threshold: f32,
    /// Suppress a lower-ranked box when its IoU with a kept box exceeds this.
    pub iou_threshold: f32,
    /// Maximum number of detections returned.
    pub max_detections: usize,
    /// Return only the best detection.
    pub top1_only: bool,
    /// Decode rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 100,
            top1_only: false,
            parallel: false,
        }
    }
}

impl DecodeConfig {
    /// Validates thresholds and limits.
    pub fn validate(&self) -> DecodeResult<()> {
        if !self.score_threshold.is_finite() || !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(DecodeError::InvalidConfig(
                "score_threshold must be in [0, 1]",
            ));
        }
        if !self.iou_threshold.is_finite() || !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DecodeError::InvalidConfig("iou_threshold must be in [0, 1]"));
        }
        if self.max_detections == 0 {
            return Err(DecodeError::InvalidConfig("max_detections must be >= 1"));
        }
        if self.parallel && !cfg!(feature = "rayon") {
            return Err(DecodeError::InvalidConfig(
                "parallel decoding requires the rayon feature",
            ));
        }
        Ok(())
    }

    /// Effective output limit for suppression.
    pub fn limit(&self) -> usize {
        if self.top1_only {
            1
        } else {
            self.max_detections
        }
    }
}

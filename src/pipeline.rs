//! Single decode entry point and the configuration snapshot cell.

use crate::config::{ClassLabels, DecodeConfig, ModelInput};
use crate::decode::{
    decode_rows, Candidate, ClassIdDecoder, DecodedRows, PerClassDecoder, RowDecoder, RowParams,
};
use crate::layout::{resolve_layout, Layout};
use crate::mapping::ScaleContext;
use crate::suppress::{suppress, Detection};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::DecodeResult;
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable decode configuration: labels, model input size and thresholds.
///
/// A `Decoder` never changes after construction, so a decode running on it
/// always sees one consistent configuration.
#[derive(Clone, Debug)]
pub struct Decoder {
    labels: ClassLabels,
    model_input: ModelInput,
    cfg: DecodeConfig,
}

impl Decoder {
    /// Builds a decoder after validating the model input and config.
    pub fn new(
        labels: ClassLabels,
        model_input: ModelInput,
        cfg: DecodeConfig,
    ) -> DecodeResult<Self> {
        model_input.validate()?;
        cfg.validate()?;
        Ok(Self {
            labels,
            model_input,
            cfg,
        })
    }

    /// Returns the class labels.
    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Returns the model input size.
    pub fn model_input(&self) -> ModelInput {
        self.model_input
    }

    /// Returns the decode configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.cfg
    }

    /// Returns the label of a detection's class.
    pub fn label(&self, detection: &Detection) -> Option<&str> {
        self.labels.get(detection.class_index)
    }

    /// Resolves the layout of a buffer against this decoder's label count.
    pub fn resolve(&self, raw: &[f32]) -> DecodeResult<Layout> {
        resolve_layout(raw.len(), self.labels.len())
    }

    /// Decodes a raw output buffer into ranked, suppressed detections.
    pub fn decode(&self, raw: &[f32], scale: &ScaleContext) -> DecodeResult<Vec<Detection>> {
        let _span = trace_span!("decode", len = raw.len()).entered();

        let layout = self.resolve(raw)?;
        trace_event!(
            "layout",
            kind = layout.name(),
            rows = layout.rows(),
            cols = layout.cols()
        );

        let rows = match layout {
            Layout::PerClass { .. } => {
                self.decode_with(&PerClassDecoder::new(self.labels.len()), raw)
            }
            Layout::ClassId { .. } => self.decode_with(&ClassIdDecoder, raw),
        };
        if rows.non_finite > 0 {
            trace_warn!("non_finite_rows", skipped = rows.non_finite);
        }

        let detections: Vec<Detection> = rows
            .candidates
            .iter()
            .map(|candidate| to_detection(candidate, scale))
            .collect();
        trace_event!("candidates", count = detections.len());

        Ok(suppress(detections, self.cfg.limit(), self.cfg.iou_threshold))
    }

    /// Like [`Decoder::decode`], but an uninterpretable buffer yields no
    /// detections instead of an error.
    pub fn decode_or_empty(&self, raw: &[f32], scale: &ScaleContext) -> Vec<Detection> {
        match self.decode(raw, scale) {
            Ok(detections) => detections,
            Err(err) => {
                trace_warn!("decode_failed", error = err.to_string().as_str());
                Vec::new()
            }
        }
    }

    fn decode_with<D: RowDecoder>(&self, decoder: &D, raw: &[f32]) -> DecodedRows {
        let params = RowParams {
            score_threshold: self.cfg.score_threshold,
            num_classes: self.labels.len(),
        };
        trace_event!("row_decoder", decoder = D::NAME, parallel = self.cfg.parallel);

        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                return crate::decode::decode_rows_par(decoder, raw, params);
            }
        }

        decode_rows(decoder, raw, params)
    }
}

fn to_detection(candidate: &Candidate, scale: &ScaleContext) -> Detection {
    Detection {
        class_index: candidate.class_index,
        score: candidate.score,
        bbox: scale.map_box(&candidate.bbox),
    }
}

/// Shared slot holding the current [`Decoder`].
///
/// Readers take a snapshot and decode without holding the lock; a
/// replacement only affects snapshots taken after it.
#[derive(Debug)]
pub struct DecoderCell {
    current: RwLock<Arc<Decoder>>,
}

impl DecoderCell {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            current: RwLock::new(Arc::new(decoder)),
        }
    }

    /// Returns the decoder in effect right now.
    pub fn snapshot(&self) -> Arc<Decoder> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Installs a new decoder and returns the previous one.
    pub fn replace(&self, decoder: Decoder) -> Arc<Decoder> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(decoder))
    }
}

//! Python bindings for the detpost post-processing library.
//!
//! Exposes the decoder, its configuration and the scale context to Python via
//! PyO3, taking raw model output as a 1D float32 numpy array.

use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use detpost::{
    ClassLabels, DecodeConfig as RustDecodeConfig, DecodeError, Decoder as RustDecoder,
    Detection as RustDetection, Layout, ModelInput, ScaleContext as RustScaleContext, Size,
};

/// Config and dimension errors become ValueError; buffer errors RuntimeError.
fn to_py_err(err: DecodeError) -> PyErr {
    match err {
        DecodeError::EmptyInput | DecodeError::UnknownFormat { .. } => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// A detection in display coordinates.
#[pyclass]
#[derive(Clone)]
pub struct Detection {
    /// Index into the label list.
    #[pyo3(get)]
    pub class_index: usize,
    /// Class label, if the index is in range.
    #[pyo3(get)]
    pub label: Option<String>,
    /// Detection score.
    #[pyo3(get)]
    pub score: f32,
    #[pyo3(get)]
    pub left: i32,
    #[pyo3(get)]
    pub top: i32,
    #[pyo3(get)]
    pub right: i32,
    #[pyo3(get)]
    pub bottom: i32,
}

impl Detection {
    fn new(decoder: &RustDecoder, det: &RustDetection) -> Self {
        Self {
            class_index: det.class_index,
            label: decoder.label(det).map(str::to_owned),
            score: det.score,
            left: det.bbox.left,
            top: det.bbox.top,
            right: det.bbox.right,
            bottom: det.bbox.bottom,
        }
    }
}

#[pymethods]
impl Detection {
    /// Box as a `(left, top, right, bottom)` tuple.
    fn xyxy(&self) -> (i32, i32, i32, i32) {
        (self.left, self.top, self.right, self.bottom)
    }

    fn __repr__(&self) -> String {
        format!(
            "Detection(label={:?}, score={:.4}, box=({}, {}, {}, {}))",
            self.label, self.score, self.left, self.top, self.right, self.bottom
        )
    }
}

/// Thresholds and limits for decoding.
#[pyclass]
#[derive(Clone)]
pub struct DecodeConfig {
    inner: RustDecodeConfig,
}

#[pymethods]
impl DecodeConfig {
    /// Create a new DecodeConfig.
    ///
    /// Args:
    ///     score_threshold: Minimum row score (default: 0.25)
    ///     iou_threshold: Suppression IoU threshold (default: 0.45)
    ///     max_detections: Maximum detections returned (default: 100)
    ///     top1_only: Return only the best detection (default: False)
    ///     parallel: Decode rows in parallel (default: False)
    #[new]
    #[pyo3(signature = (score_threshold=0.25, iou_threshold=0.45, max_detections=100, top1_only=false, parallel=false))]
    fn new(
        score_threshold: f32,
        iou_threshold: f32,
        max_detections: usize,
        top1_only: bool,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustDecodeConfig {
            score_threshold,
            iou_threshold,
            max_detections,
            top1_only,
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!(
            "DecodeConfig(score_threshold={}, iou_threshold={}, max_detections={}, top1_only={}, parallel={})",
            self.inner.score_threshold,
            self.inner.iou_threshold,
            self.inner.max_detections,
            self.inner.top1_only,
            self.inner.parallel
        )
    }
}

/// Scale factors and offsets from model space to display space.
#[pyclass]
#[derive(Clone)]
pub struct ScaleContext {
    inner: RustScaleContext,
}

#[pymethods]
impl ScaleContext {
    /// Create a ScaleContext from explicit factors (identity by default).
    #[new]
    #[pyo3(signature = (img_scale_x=1.0, img_scale_y=1.0, iv_scale_x=1.0, iv_scale_y=1.0, start_x=0.0, start_y=0.0))]
    fn new(
        img_scale_x: f32,
        img_scale_y: f32,
        iv_scale_x: f32,
        iv_scale_y: f32,
        start_x: f32,
        start_y: f32,
    ) -> Self {
        Self {
            inner: RustScaleContext::new(
                img_scale_x,
                img_scale_y,
                iv_scale_x,
                iv_scale_y,
                start_x,
                start_y,
            ),
        }
    }

    /// Stretch the source to fill the view along each axis.
    ///
    /// Args:
    ///     model: (width, height) of the model input
    ///     source: (width, height) of the source image
    ///     view: (width, height) of the display view
    #[staticmethod]
    fn stretch(
        model: (usize, usize),
        source: (usize, usize),
        view: (usize, usize),
    ) -> PyResult<Self> {
        let inner = RustScaleContext::stretch(size(model), size(source), size(view))
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Fit the source inside the view, keeping aspect ratio, and center it.
    #[staticmethod]
    fn fit_centered(
        model: (usize, usize),
        source: (usize, usize),
        view: (usize, usize),
    ) -> PyResult<Self> {
        let inner = RustScaleContext::fit_centered(size(model), size(source), size(view))
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        let s = &self.inner;
        format!(
            "ScaleContext(img_scale=({}, {}), iv_scale=({}, {}), start=({}, {}))",
            s.img_scale_x, s.img_scale_y, s.iv_scale_x, s.iv_scale_y, s.start_x, s.start_y
        )
    }
}

fn size((width, height): (usize, usize)) -> Size {
    Size::new(width, height)
}

fn layout_tuple(layout: Layout) -> (&'static str, usize) {
    (layout.name(), layout.rows())
}

/// Decoder holding labels, model input size and config.
#[pyclass]
pub struct Decoder {
    inner: RustDecoder,
}

#[pymethods]
impl Decoder {
    /// Create a Decoder.
    ///
    /// Args:
    ///     labels: Class labels in index order
    ///     input_size: (width, height) of the model input (default: (320, 320))
    ///     config: DecodeConfig (default: DecodeConfig())
    #[new]
    #[pyo3(signature = (labels, input_size = (320, 320), config = None))]
    fn new(
        labels: Vec<String>,
        input_size: (usize, usize),
        config: Option<DecodeConfig>,
    ) -> PyResult<Self> {
        let labels = ClassLabels::new(labels).map_err(to_py_err)?;
        let model_input = ModelInput::new(input_size.0, input_size.1).map_err(to_py_err)?;
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let inner = RustDecoder::new(labels, model_input, cfg).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Create a Decoder from the text of a label file, one label per line.
    #[staticmethod]
    #[pyo3(signature = (text, input_size = (320, 320), config = None))]
    fn from_label_text(
        text: &str,
        input_size: (usize, usize),
        config: Option<DecodeConfig>,
    ) -> PyResult<Self> {
        let labels = ClassLabels::parse(text);
        let model_input = ModelInput::new(input_size.0, input_size.1).map_err(to_py_err)?;
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let inner = RustDecoder::new(labels, model_input, cfg).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Number of classes.
    #[getter]
    fn num_classes(&self) -> usize {
        self.inner.labels().len()
    }

    /// Resolve the layout of a raw output buffer.
    ///
    /// Returns:
    ///     ("per_class" | "class_id", rows)
    fn resolve(&self, outputs: PyReadonlyArray1<'_, f32>) -> PyResult<(&'static str, usize)> {
        let data = outputs.as_slice()?;
        let layout = self.inner.resolve(data).map_err(to_py_err)?;
        Ok(layout_tuple(layout))
    }

    /// Decode a raw output buffer.
    ///
    /// Args:
    ///     outputs: 1D float32 numpy array
    ///     scale: ScaleContext (default: identity)
    ///
    /// Returns:
    ///     List of Detection objects, best first
    #[pyo3(signature = (outputs, scale = None))]
    fn decode(
        &self,
        outputs: PyReadonlyArray1<'_, f32>,
        scale: Option<ScaleContext>,
    ) -> PyResult<Vec<Detection>> {
        let data = outputs.as_slice()?;
        let scale = scale.map(|s| s.inner).unwrap_or_default();
        let detections = self.inner.decode(data, &scale).map_err(to_py_err)?;
        Ok(detections
            .iter()
            .map(|det| Detection::new(&self.inner, det))
            .collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "Decoder(num_classes={}, input_size=({}, {}))",
            self.inner.labels().len(),
            self.inner.model_input().width,
            self.inner.model_input().height
        )
    }
}

/// Resolve the output layout from a buffer length and class count.
///
/// Returns:
///     ("per_class" | "class_id", rows)
#[pyfunction]
fn resolve_layout(length: usize, num_classes: usize) -> PyResult<(&'static str, usize)> {
    let layout = detpost::resolve_layout(length, num_classes).map_err(to_py_err)?;
    Ok(layout_tuple(layout))
}

/// Convenience function that builds a decoder and decodes one buffer.
///
/// For repeated decoding with the same labels, create a Decoder once.
///
/// Args:
///     outputs: 1D float32 numpy array
///     labels: Class labels in index order
///     scale: ScaleContext (default: identity)
///     config: DecodeConfig (default: DecodeConfig())
#[pyfunction]
#[pyo3(signature = (outputs, labels, scale = None, config = None))]
fn decode(
    outputs: PyReadonlyArray1<'_, f32>,
    labels: Vec<String>,
    scale: Option<ScaleContext>,
    config: Option<DecodeConfig>,
) -> PyResult<Vec<Detection>> {
    let decoder = Decoder::new(labels, (320, 320), config)?;
    decoder.decode(outputs, scale)
}

/// Python module for detpost.
#[pymodule]
fn _detpost(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Detection>()?;
    m.add_class::<DecodeConfig>()?;
    m.add_class::<ScaleContext>()?;
    m.add_class::<Decoder>()?;
    m.add_function(wrap_pyfunction!(resolve_layout, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}

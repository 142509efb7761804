//! Model space to display space coordinate mapping.
//!
//! A box goes through two affine transforms: model input pixels to source
//! image pixels (`img_scale`), then source image pixels to view pixels
//! (`iv_scale` plus the letterbox offset `start`). Each corner is transformed
//! independently and truncated toward zero at the end.

use crate::config::ModelInput;
use crate::geometry::{DisplayBox, ModelBox};
use crate::util::math::truncate_px;
use crate::util::{DecodeError, DecodeResult};

/// Width and height of an image or view in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    fn checked(self) -> DecodeResult<(f32, f32)> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok((self.width as f32, self.height as f32))
    }
}

impl From<ModelInput> for Size {
    fn from(value: ModelInput) -> Self {
        Self::new(value.width, value.height)
    }
}

/// Scale factors and offsets for one decode call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleContext {
    /// Source width / model input width.
    pub img_scale_x: f32,
    /// Source height / model input height.
    pub img_scale_y: f32,
    /// View pixels per source pixel along x.
    pub iv_scale_x: f32,
    /// View pixels per source pixel along y.
    pub iv_scale_y: f32,
    /// Horizontal letterbox offset in view pixels.
    pub start_x: f32,
    /// Vertical letterbox offset in view pixels.
    pub start_y: f32,
}

impl Default for ScaleContext {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScaleContext {
    pub fn new(
        img_scale_x: f32,
        img_scale_y: f32,
        iv_scale_x: f32,
        iv_scale_y: f32,
        start_x: f32,
        start_y: f32,
    ) -> Self {
        Self {
            img_scale_x,
            img_scale_y,
            iv_scale_x,
            iv_scale_y,
            start_x,
            start_y,
        }
    }

    /// All scales one, no offset.
    pub fn identity() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, 0.0, 0.0)
    }

    /// Stretches the source independently along each axis to fill the view.
    pub fn stretch(model: Size, source: Size, view: Size) -> DecodeResult<Self> {
        let (model_w, model_h) = model.checked()?;
        let (src_w, src_h) = source.checked()?;
        let (view_w, view_h) = view.checked()?;
        Ok(Self::new(
            src_w / model_w,
            src_h / model_h,
            view_w / src_w,
            view_h / src_h,
            0.0,
            0.0,
        ))
    }

    /// Fits the source into the view along its longer side and centers it.
    ///
    /// The longer source axis picks its own view ratio; the shorter axis reuses
    /// that ratio, and the unused view space is split evenly as offsets. A
    /// square source takes the width ratio on both axes.
    pub fn fit_centered(model: Size, source: Size, view: Size) -> DecodeResult<Self> {
        let (model_w, model_h) = model.checked()?;
        let (src_w, src_h) = source.checked()?;
        let (view_w, view_h) = view.checked()?;

        let iv_scale_x = if source.width > source.height {
            view_w / src_w
        } else {
            view_h / src_h
        };
        let iv_scale_y = if source.height > source.width {
            view_h / src_h
        } else {
            view_w / src_w
        };
        let start_x = (view_w - iv_scale_x * src_w) / 2.0;
        let start_y = (view_h - iv_scale_y * src_h) / 2.0;

        Ok(Self::new(
            src_w / model_w,
            src_h / model_h,
            iv_scale_x,
            iv_scale_y,
            start_x,
            start_y,
        ))
    }

    /// Maps a model-space box into integer display coordinates.
    pub fn map_box(&self, bbox: &ModelBox) -> DisplayBox {
        let [left, top, right, bottom] = bbox.corners();
        DisplayBox::new(
            self.to_view_x(self.img_scale_x * left),
            self.to_view_y(self.img_scale_y * top),
            self.to_view_x(self.img_scale_x * right),
            self.to_view_y(self.img_scale_y * bottom),
        )
    }

    fn to_view_x(&self, x: f32) -> i32 {
        truncate_px(self.start_x + self.iv_scale_x * x)
    }

    fn to_view_y(&self, y: f32) -> i32 {
        truncate_px(self.start_y + self.iv_scale_y * y)
    }
}

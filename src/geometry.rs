//! Box types for the two coordinate frames and the IoU used by suppression.

/// Epsilon added to the IoU denominator so zero-area boxes do not divide by zero.
pub const IOU_EPS: f32 = 1e-6;

/// Center/size box in model-input pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelBox {
    /// Center x.
    pub cx: f32,
    /// Center y.
    pub cy: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl ModelBox {
    /// Creates a box from center and size.
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { cx, cy, w, h }
    }

    /// Returns `[left, top, right, bottom]` in model space.
    pub fn corners(&self) -> [f32; 4] {
        let hw = self.w / 2.0;
        let hh = self.h / 2.0;
        [self.cx - hw, self.cy - hh, self.cx + hw, self.cy + hh]
    }
}

/// Corner box in integer display pixels.
///
/// Boxes are not clamped to any frame, so coordinates may be negative or lie
/// past the view edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DisplayBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width clamped to zero for inverted boxes.
    pub fn width(&self) -> f32 {
        (self.right as f32 - self.left as f32).max(0.0)
    }

    /// Height clamped to zero for inverted boxes.
    pub fn height(&self) -> f32 {
        (self.bottom as f32 - self.top as f32).max(0.0)
    }

    /// Area from the clamped width and height.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

/// Intersection over union of two display boxes.
///
/// Intersection extents are clamped to zero, and a malformed box with
/// `right < left` contributes zero area rather than a negative one.
pub fn iou(a: &DisplayBox, b: &DisplayBox) -> f32 {
    let w = (a.right.min(b.right) as f32 - a.left.max(b.left) as f32).max(0.0);
    let h = (a.bottom.min(b.bottom) as f32 - a.top.max(b.top) as f32).max(0.0);
    let inter = w * h;
    inter / (a.area() + b.area() - inter + IOU_EPS)
}

#[cfg(test)]
mod tests {
    use super::{iou, DisplayBox, ModelBox};

    #[test]
    fn corners_expand_from_center() {
        let b = ModelBox::new(10.0, 20.0, 4.0, 6.0);
        assert_eq!(b.corners(), [8.0, 17.0, 12.0, 23.0]);
    }

    #[test]
    fn iou_identical_boxes_is_one() {
        let a = DisplayBox::new(0, 0, 10, 10);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_disjoint_and_touching_are_zero() {
        let a = DisplayBox::new(0, 0, 10, 10);
        let b = DisplayBox::new(20, 20, 30, 30);
        let c = DisplayBox::new(10, 0, 20, 10);
        assert_eq!(iou(&a, &b), 0.0);
        assert_eq!(iou(&a, &c), 0.0);
    }

    #[test]
    fn iou_half_overlap() {
        let a = DisplayBox::new(0, 0, 10, 10);
        let b = DisplayBox::new(5, 0, 15, 10);
        // 50 / (100 + 100 - 50)
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn iou_degenerate_boxes_do_not_divide_by_zero() {
        let point = DisplayBox::new(5, 5, 5, 5);
        assert_eq!(iou(&point, &point), 0.0);

        let inverted = DisplayBox::new(10, 10, 0, 0);
        assert_eq!(inverted.area(), 0.0);
        let normal = DisplayBox::new(0, 0, 10, 10);
        assert_eq!(iou(&inverted, &normal), 0.0);
    }
}

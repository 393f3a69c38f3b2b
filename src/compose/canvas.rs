//! Slide geometry.
//!
//! All coordinates are canvas inches measured from the top-left corner.
//! Boxes are plain values recomputed on every call and converted to EMUs
//! only when handed to the document model.

use crate::common::unit::inches_to_emu;

/// Fixed slide canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// The 16x9 inch canvas every deck is laid out on.
pub const CANVAS: Canvas = Canvas {
    width: 16.0,
    height: 9.0,
};

/// An axis-aligned box in canvas inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Placement of the three regions of a text-beside-image slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BesideImageLayout {
    pub title: LayoutBox,
    pub body: LayoutBox,
    pub image: LayoutBox,
}

impl LayoutBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &LayoutBox) -> bool {
        const EPS: f64 = 1e-9;
        other.left >= self.left - EPS
            && other.top >= self.top - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Whether the interiors of the two boxes intersect. Shared edges do not count.
    pub fn overlaps(&self, other: &LayoutBox) -> bool {
        const EPS: f64 = 1e-9;
        self.left < other.right() - EPS
            && other.left < self.right() - EPS
            && self.top < other.bottom() - EPS
            && other.top < self.bottom() - EPS
    }

    /// `(x, y, cx, cy)` in EMUs.
    pub fn to_emu(&self) -> (i64, i64, i64, i64) {
        (
            inches_to_emu(self.left),
            inches_to_emu(self.top),
            inches_to_emu(self.width),
            inches_to_emu(self.height),
        )
    }
}

impl Canvas {
    /// Margin shared by every region: one eighteenth of the shorter side.
    pub fn margin(&self) -> f64 {
        self.width.min(self.height) / 18.0
    }

    /// The canvas inset by the margin on every side.
    pub fn safe_area(&self) -> LayoutBox {
        let m = self.margin();
        LayoutBox::new(m, m, self.width - 2.0 * m, self.height - 2.0 * m)
    }

    pub fn full_bleed(&self) -> LayoutBox {
        LayoutBox::new(0.0, 0.0, self.width, self.height)
    }

    pub fn title_box(&self) -> LayoutBox {
        let m = self.margin();
        LayoutBox::new(m, m, self.width - 2.0 * m, self.height / 6.0)
    }

    /// Body region below the title of a text-on-background slide.
    pub fn body_box(&self) -> LayoutBox {
        let m = self.margin();
        let title_height = self.height / 6.0;
        LayoutBox::new(
            m,
            title_height + 2.0 * m,
            self.width - 2.0 * m,
            self.height - title_height - 3.0 * m,
        )
    }

    /// Title-box sized region, vertically centered, for the opening slide.
    pub fn title_only_box(&self) -> LayoutBox {
        let title = self.title_box();
        LayoutBox {
            top: (self.height - title.height) / 2.0,
            ..title
        }
    }

    /// Split the body band between text (left) and an image (right).
    ///
    /// `aspect` is the image width over its height. The image fills the band
    /// height unless that makes it wider than half the band minus half a
    /// margin, in which case it is scaled down and centered vertically.
    pub fn beside_image(&self, aspect: f64) -> BesideImageLayout {
        let m = self.margin();
        let band = self.body_box();
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };

        let max_width = (band.width - m) / 2.0;
        let (image_width, image_height) = if band.height * aspect > max_width {
            (max_width, max_width / aspect)
        } else {
            (band.height * aspect, band.height)
        };
        let image = LayoutBox::new(
            band.right() - image_width,
            band.top + (band.height - image_height) / 2.0,
            image_width,
            image_height,
        );
        let body = LayoutBox::new(band.left, band.top, image.left - m - band.left, band.height);

        BesideImageLayout {
            title: self.title_box(),
            body,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_margin_and_title_box() {
        assert_close(CANVAS.margin(), 0.5);
        let title = CANVAS.title_box();
        assert_close(title.left, 0.5);
        assert_close(title.top, 0.5);
        assert_close(title.width, 15.0);
        assert_close(title.height, 1.5);
    }

    #[test]
    fn test_body_box() {
        let body = CANVAS.body_box();
        assert_close(body.left, 0.5);
        assert_close(body.top, 2.5);
        assert_close(body.width, 15.0);
        assert_close(body.height, 6.0);
        assert_close(body.bottom(), 8.5);
        assert!(!body.overlaps(&CANVAS.title_box()));
    }

    #[test]
    fn test_title_only_box_is_centered() {
        let title = CANVAS.title_only_box();
        assert_close(title.top, 3.75);
        assert_close(title.top + title.height / 2.0, CANVAS.height / 2.0);
    }

    #[test]
    fn test_beside_image_regions_are_disjoint_and_inside() {
        let safe = CANVAS.safe_area();
        for aspect in [768.0 / 1344.0, 1.0, 1344.0 / 768.0, 4.0] {
            let layout = CANVAS.beside_image(aspect);
            for region in [layout.title, layout.body, layout.image] {
                assert!(safe.contains(&region), "{:?} outside safe area", region);
            }
            assert!(!layout.title.overlaps(&layout.body));
            assert!(!layout.title.overlaps(&layout.image));
            assert!(!layout.body.overlaps(&layout.image));
            assert_close(layout.image.width / layout.image.height, aspect);
            assert_close(layout.image.left - layout.body.right(), 0.5);
        }
    }

    #[test]
    fn test_beside_image_square_fills_band_height() {
        let layout = CANVAS.beside_image(1.0);
        assert_close(layout.image.height, 6.0);
        assert_close(layout.image.width, 6.0);
        assert_close(layout.image.right(), 15.5);
        assert_close(layout.body.width, 8.5);
    }

    #[test]
    fn test_wide_image_is_capped_and_centered() {
        let layout = CANVAS.beside_image(4.0);
        assert_close(layout.image.width, 7.25);
        let band = CANVAS.body_box();
        let centre = layout.image.top + layout.image.height / 2.0;
        assert_close(centre, band.top + band.height / 2.0);
    }

    #[test]
    fn test_to_emu() {
        let (x, y, cx, cy) = CANVAS.full_bleed().to_emu();
        assert_eq!((x, y), (0, 0));
        assert_eq!(cx, 16 * 914_400);
        assert_eq!(cy, 9 * 914_400);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between an inclusive rectangle on the integral plane and an
//! inclusive rectangle on the complex plane, and maps pixels of the
//! former onto points of the latter.
use num::Complex;

use errors::{Axis, KernelError, Plane};
use Result;

/// An inclusive rectangle on the integral pixel plane.  Both corners
/// are part of the rectangle, so `x1 == x2` is one column wide.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left column.
    pub x1: i32,
    /// Top row.
    pub y1: i32,
    /// Right column, inclusive.
    pub x2: i32,
    /// Bottom row, inclusive.
    pub y2: i32,
}

impl PixelRect {
    /// Constructor.  Ordering is checked by `validate`, not here.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> PixelRect {
        PixelRect { x1, y1, x2, y2 }
    }

    /// Fails unless `x1 <= x2` and `y1 <= y2`.
    pub fn validate(&self) -> Result<()> {
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(KernelError::InvalidRectangle {
                plane: Plane::Pixel,
            });
        }
        Ok(())
    }

    /// The number of columns covered.  Only meaningful on a valid
    /// rectangle.
    pub fn width(&self) -> usize {
        (i64::from(self.x2) - i64::from(self.x1) + 1) as usize
    }

    /// The number of rows covered.  Only meaningful on a valid
    /// rectangle.
    pub fn height(&self) -> usize {
        (i64::from(self.y2) - i64::from(self.y1) + 1) as usize
    }

    /// The total number of pixels, or None if that does not fit in
    /// memory addressing.
    pub fn len(&self) -> Option<usize> {
        self.width().checked_mul(self.height())
    }

    /// An out-of-order rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    /// Does this rectangle contain the pixel?
    pub fn contains(&self, pixel: &Pixel) -> bool {
        pixel.0 >= self.x1 && pixel.0 <= self.x2 && pixel.1 >= self.y1 && pixel.1 <= self.y2
    }
}

/// An inclusive rectangle on the complex plane, the real part being
/// the x-component and the imaginary part the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexRect {
    /// Smallest real part.
    pub x1: f64,
    /// Smallest imaginary part.
    pub y1: f64,
    /// Largest real part.
    pub x2: f64,
    /// Largest imaginary part.
    pub y2: f64,
}

impl ComplexRect {
    /// Constructor.  Ordering is checked by `validate`, not here.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> ComplexRect {
        ComplexRect { x1, y1, x2, y2 }
    }

    /// Builds the rectangle from its left-lower and right-upper
    /// corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> ComplexRect {
        ComplexRect::new(leftlower.re, leftlower.im, rightupper.re, rightupper.im)
    }

    /// Fails unless every corner is finite, `x1 <= x2` and `y1 <= y2`.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(KernelError::InvalidRectangle {
                plane: Plane::Complex,
            });
        }
        Ok(())
    }

    /// The `(x1, y1)` corner as a complex number.
    pub fn leftlower(&self) -> Complex<f64> {
        Complex::new(self.x1, self.y1)
    }

    /// The `(x2, y2)` corner as a complex number.
    pub fn rightupper(&self) -> Complex<f64> {
        Complex::new(self.x2, self.y2)
    }
}

/// Describes the x, y of a pixel on the integral plane.  These are
/// absolute coordinates, not offsets from the rectangle's corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub i32, pub i32);

/// Contains the definitions of two planes: an integral cartesian
/// plane and a complex cartesian plane.  Maps pixels from one to
/// points in the other.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The pixel rectangle being rendered.
    pub pixels: PixelRect,
    /// The region of the complex plane it covers.
    pub complex: ComplexRect,
    // The width and height of one pixel, measured on the complex plane.
    scale: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Both rectangles must be ordered, and the pixel
    /// rectangle must be at least two pixels wide and two tall, or the
    /// scale of that axis would be a division by zero.
    pub fn new(pixels: PixelRect, complex: ComplexRect) -> Result<PlaneMapper> {
        pixels.validate()?;
        complex.validate()?;

        if pixels.x1 == pixels.x2 {
            return Err(KernelError::DegenerateMapping { axis: Axis::X });
        }
        if pixels.y1 == pixels.y2 {
            return Err(KernelError::DegenerateMapping { axis: Axis::Y });
        }

        let scale = (
            (complex.x2 - complex.x1) / (i64::from(pixels.x2) - i64::from(pixels.x1)) as f64,
            (complex.y2 - complex.y1) / (i64::from(pixels.y2) - i64::from(pixels.y1)) as f64,
        );

        // Two finite corners can still be too far apart to subtract.
        if !scale.0.is_finite() || !scale.1.is_finite() {
            return Err(KernelError::InvalidRectangle {
                plane: Plane::Complex,
            });
        }

        Ok(PlaneMapper {
            pixels,
            complex,
            scale,
        })
    }

    /// The total number of pixels mapped.
    pub fn len(&self) -> Option<usize> {
        self.pixels.len()
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The distance on the complex plane between neighbouring pixels,
    /// horizontally and vertically.
    pub fn scale(&self) -> (f64, f64) {
        self.scale
    }

    /// Given a pixel on the integral plane, map it to the corresponding
    /// point on the complex plane.  The two corner pixels land exactly
    /// on the two corners of the complex rectangle.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            axis_to_point(
                pixel.0,
                self.pixels.x1,
                self.pixels.x2,
                self.complex.x1,
                self.complex.x2,
                self.scale.0,
            ),
            axis_to_point(
                pixel.1,
                self.pixels.y1,
                self.pixels.y2,
                self.complex.y1,
                self.complex.y2,
                self.scale.1,
            ),
        )
    }
}

// `lo + steps * scale` can round away from `hi` at the far edge; pin it.
#[inline]
fn axis_to_point(p: i32, p1: i32, p2: i32, lo: f64, hi: f64, scale: f64) -> f64 {
    if p == p2 {
        hi
    } else {
        lo + (i64::from(p) - i64::from(p1)) as f64 * scale
    }
}

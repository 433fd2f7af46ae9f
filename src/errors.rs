// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a kernel call can be refused.  All of them are detected
//! before the first pixel is iterated, so a failed call never leaves
//! a half-written grid behind.

use std::fmt;

/// Which of the two planes a rectangle belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Plane {
    /// The integral pixel grid.
    Pixel,
    /// The complex plane.
    Complex,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Plane::Pixel => write!(f, "pixel"),
            Plane::Complex => write!(f, "complex"),
        }
    }
}

/// An axis of the pixel grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Columns.
    X,
    /// Rows.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors reported by the kernel.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum KernelError {
    /// A rectangle's corners are out of order (or not finite).
    #[fail(display = "the {} rectangle's corners are out of order", plane)]
    InvalidRectangle {
        /// The offending rectangle.
        plane: Plane,
    },

    /// The iteration bound was zero.
    #[fail(display = "the iteration bound must be positive")]
    InvalidIterationBound,

    /// The pixel rectangle has no extent along an axis, so the scale
    /// factor for that axis would divide by zero.
    #[fail(display = "degenerate mapping: the pixel rectangle has zero {} extent", axis)]
    DegenerateMapping {
        /// The collapsed axis.
        axis: Axis,
    },

    /// The output buffer cannot hold the pixel rectangle.
    #[fail(display = "output buffer too small: {} slots needed, {} available", needed, available)]
    BufferTooSmall {
        /// Slots the layout requires.
        needed: usize,
        /// Slots the caller supplied.
        available: usize,
    },

    /// The output stride would make consecutive lines overlap.
    #[fail(display = "stride {} is narrower than a line of {} pixels", stride, line)]
    StrideTooNarrow {
        /// The requested stride.
        stride: usize,
        /// The length of one line of the grid.
        line: usize,
    },

    /// A render thread panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal kernel
//!
//! Takes a rectangle of pixels and the rectangle of the complex plane
//! it should cover, maps every pixel to a point, and iterates the
//! quadratic map `z = z*z + c` on it.  The number of iterations the
//! orbit takes to leave the disk of radius two (or the iteration
//! bound, if it never does) is that pixel's value.  Points in the
//! Mandelbrot set never leave, so they all carry the bound.
//!
//! The kernel does no drawing and no I/O.  The caller owns the output
//! buffer, describes its layout with an `IterationGrid`, and turns the
//! counts into whatever it likes afterwards.
//!
//! ```
//! use escape_kernel::{compute, ComplexRect, IterationGrid, PixelRect};
//!
//! let mut cells = vec![0; 9];
//! compute(
//!     PixelRect::new(0, 0, 2, 2),
//!     ComplexRect::new(-1.0, -1.0, 1.0, 1.0),
//!     50,
//!     &mut IterationGrid::new(&mut cells),
//! ).unwrap();
//! assert_eq!(cells[4], 50);
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod errors;
pub mod grid;
pub mod kernel;
pub mod planes;

pub use errors::{Axis, KernelError, Plane};
pub use grid::{IterationGrid, Layout};
pub use kernel::{compute, escape_time, Family, FractalKernel};
pub use planes::{ComplexRect, Pixel, PixelRect, PlaneMapper};

/// Result type for every fallible kernel operation.
pub type Result<T> = ::std::result::Result<T, KernelError>;

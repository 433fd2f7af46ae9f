// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Every pixel of the rectangle is mapped to
//! a point on the complex plane, the quadratic map `z = z*z + c` is
//! run on it, and the number of iterations it took the orbit to leave
//! the disk of radius two is written into the caller's grid.

use std::cmp;
use std::sync::Mutex;

use crossbeam;
use num::Complex;

use errors::KernelError;
use grid::{IterationGrid, Shape};
use planes::{ComplexRect, Pixel, PixelRect, PlaneMapper};
use Result;

/// Which member of the quadratic family is iterated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Family {
    /// `z0 = 0` and `c` is the pixel's point.  Classifies the points
    /// of the plane itself.
    Mandelbrot,
    /// `z0` is the pixel's point and `c` is fixed for the whole
    /// render.
    Julia(Complex<f64>),
}

impl Default for Family {
    fn default() -> Family {
        Family::Mandelbrot
    }
}

/// This is our classic iterator function.  Starting from `seed`,
/// applies `z = z*z + c` until the orbit leaves the disk of radius
/// two or `limit` iterations have been spent, and returns the number
/// of iterations performed.  The result is always in `0..=limit`, and
/// `limit` means the orbit never escaped.
#[inline]
pub fn escape_time(seed: Complex<f64>, c: Complex<f64>, limit: u32) -> u32 {
    let mut z = seed;
    let mut n = 0;
    while n < limit && z.norm_sqr() < 4.0 {
        z = z * z + c;
        n += 1;
    }
    n
}

/// The parameters of a render: the two planes, the iteration bound
/// and the family.  Once built, the kernel is immutable and may be
/// shared between threads.
#[derive(Copy, Clone, Debug)]
pub struct FractalKernel {
    plane: PlaneMapper,
    limit: u32,
    family: Family,
}

impl FractalKernel {
    /// Requires the pixel rectangle to render, the region of the
    /// complex plane it covers, and the maximum number of iterations
    /// to spend on each pixel.  Renders the Mandelbrot map unless told
    /// otherwise with `with_family`.
    pub fn new(pixels: PixelRect, complex: ComplexRect, max_iterations: u32) -> Result<Self> {
        pixels.validate()?;
        complex.validate()?;
        if max_iterations == 0 {
            return Err(KernelError::InvalidIterationBound);
        }
        Ok(FractalKernel {
            plane: PlaneMapper::new(pixels, complex)?,
            limit: max_iterations,
            family: Family::Mandelbrot,
        })
    }

    /// Switches the family iterated.
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    /// The mapping between the two planes.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The iteration bound.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The family iterated.
    pub fn family(&self) -> Family {
        self.family
    }

    /// The escape count of a single pixel.
    pub fn escape_count(&self, pixel: &Pixel) -> u32 {
        let point = self.plane.pixel_to_point(pixel);
        match self.family {
            Family::Mandelbrot => escape_time(Complex::new(0.0, 0.0), point, self.limit),
            Family::Julia(c) => escape_time(point, c, self.limit),
        }
    }

    /// The main function for single-threaded use.  Fills every slot of
    /// `grid` that the pixel rectangle maps to; nothing is written if
    /// the grid cannot hold the rectangle.
    pub fn render(&self, grid: &mut IterationGrid) -> Result<()> {
        let shape = grid.shape(&self.plane.pixels)?;
        debug!(
            "rendering {} lines of {} pixels, limit {}, {:?}",
            shape.lines, shape.line_len, self.limit, self.family
        );
        let cells = grid.cells_mut();
        for (line, pos) in iproduct!(0..shape.lines, 0..shape.line_len) {
            cells[line * shape.stride + pos] = self.escape_count(&shape.pixel(line, pos));
        }
        Ok(())
    }

    /// A multi-threaded version of the render function.  Lines of the
    /// grid are handed out one at a time from a shared queue; each
    /// worker owns the slice it was given, so the writes themselves
    /// need no locking.  The result is identical to `render`.
    pub fn render_threaded(&self, grid: &mut IterationGrid, threads: usize) -> Result<()> {
        let shape = grid.shape(&self.plane.pixels)?;
        let threads = cmp::max(threads, 1);
        debug!(
            "rendering {} lines of {} pixels on {} threads, limit {}, {:?}",
            shape.lines, shape.line_len, threads, self.limit, self.family
        );

        let lines = Mutex::new(grid.lines_mut(&shape).take(shape.lines).enumerate());
        let lines = &lines;
        crossbeam::scope(|spawner| {
            for _ in 0..threads {
                spawner.spawn(move |_| loop {
                    let next = match lines.lock() {
                        Ok(mut queue) => queue.next(),
                        Err(_) => None,
                    };
                    match next {
                        Some((line, cells)) => self.render_line(&shape, line, cells),
                        None => {
                            break;
                        }
                    }
                });
            }
        })
        .map_err(|_| KernelError::WorkerPanicked)
    }

    fn render_line(&self, shape: &Shape, line: usize, cells: &mut [u32]) {
        trace!("line {}", line);
        for (pos, cell) in cells[..shape.line_len].iter_mut().enumerate() {
            *cell = self.escape_count(&shape.pixel(line, pos));
        }
    }
}

/// The plain call contract: fills `output` with the Mandelbrot escape
/// counts of every pixel in `pixels`, mapped onto `complex`, spending
/// at most `max_iterations` on each.  Fails before writing anything
/// if an argument is unusable.
pub fn compute(
    pixels: PixelRect,
    complex: ComplexRect,
    max_iterations: u32,
    output: &mut IterationGrid,
) -> Result<()> {
    FractalKernel::new(pixels, complex, max_iterations)?.render(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Complex<f64> {
        Complex::new(0.0, 0.0)
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(origin(), origin(), 1), 1);
        assert_eq!(escape_time(origin(), origin(), 1000), 1000);
    }

    #[test]
    fn three_escapes_after_one_step() {
        assert_eq!(escape_time(origin(), Complex::new(3.0, 0.0), 2), 1);
        assert_eq!(escape_time(origin(), Complex::new(3.0, 0.0), 500), 1);
    }

    #[test]
    fn boundary_of_the_disk_counts_as_escaped() {
        // c = 1: 0 -> 1 -> 2, and |2| is not inside the disk.
        assert_eq!(escape_time(origin(), Complex::new(1.0, 0.0), 50), 2);
        // A seed already on the boundary escapes without iterating.
        assert_eq!(escape_time(Complex::new(2.0, 0.0), origin(), 50), 0);
    }

    #[test]
    fn period_two_orbit_is_bounded() {
        assert_eq!(escape_time(origin(), Complex::new(-1.0, 0.0), 77), 77);
    }

    #[test]
    fn new_kernels_render_the_mandelbrot_map() {
        let k = FractalKernel::new(
            PixelRect::new(0, 0, 2, 2),
            ComplexRect::new(-1.0, -1.0, 1.0, 1.0),
            50,
        )
        .unwrap();
        assert_eq!(k.family(), Family::default());
        assert_eq!(k.family(), Family::Mandelbrot);
        assert_eq!(k.limit(), 50);
    }

    #[test]
    fn zero_iterations_are_refused() {
        let k = FractalKernel::new(
            PixelRect::new(0, 0, 2, 2),
            ComplexRect::new(-1.0, -1.0, 1.0, 1.0),
            0,
        );
        assert_eq!(k.unwrap_err(), KernelError::InvalidIterationBound);
    }

    #[test]
    fn julia_seeds_with_the_pixel() {
        let k = FractalKernel::new(
            PixelRect::new(0, 0, 2, 2),
            ComplexRect::new(-1.0, -1.0, 1.0, 1.0),
            40,
        )
        .unwrap()
        .with_family(Family::Julia(Complex::new(3.0, 0.0)));
        assert_eq!(k.limit(), 40);
        assert_eq!(k.family(), Family::Julia(Complex::new(3.0, 0.0)));
        // z0 = 0, c = 3: escapes on the first step.
        assert_eq!(k.escape_count(&Pixel(1, 1)), 1);

        let k = k.with_family(Family::Julia(origin()));
        // z0 = -1-i squares to 2i, which sits on the boundary.
        assert_eq!(k.escape_count(&Pixel(0, 0)), 1);
        assert_eq!(k.escape_count(&Pixel(1, 1)), 40);
    }

    #[test]
    fn render_leaves_stride_padding_alone() {
        let k = FractalKernel::new(
            PixelRect::new(0, 0, 2, 1),
            ComplexRect::new(-1.0, 0.0, 1.0, 1.0),
            10,
        )
        .unwrap();
        let mut cells = vec![u32::max_value(); 7];
        k.render(&mut IterationGrid::new(&mut cells).with_stride(4))
            .unwrap();
        assert_eq!(cells[3], u32::max_value());
        assert!(cells[..3].iter().all(|&n| n <= 10));
        assert!(cells[4..].iter().all(|&n| n <= 10));
    }

    #[test]
    fn threaded_zero_threads_still_renders() {
        let k = FractalKernel::new(
            PixelRect::new(0, 0, 2, 2),
            ComplexRect::new(-1.0, -1.0, 1.0, 1.0),
            50,
        )
        .unwrap();
        let mut cells = vec![0; 9];
        k.render_threaded(&mut IterationGrid::new(&mut cells), 0)
            .unwrap();
        assert_eq!(cells[4], 50);
    }
}

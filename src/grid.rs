// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output side of the kernel.  An IterationGrid borrows a buffer
//! the caller owns and describes how pixels are laid out in it.  The
//! grid is cut into "lines": rows for a row-major grid, columns for a
//! column-major one.  Consecutive lines start `stride` slots apart.

use std::slice::ChunksMut;

use errors::KernelError;
use planes::{Pixel, PixelRect};
use Result;

/// How pixels are linearized in the output buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Slot `(y - y1) * stride + (x - x1)`.
    RowMajor,
    /// Slot `(x - x1) * stride + (y - y1)`.
    ColumnMajor,
}

impl Default for Layout {
    fn default() -> Layout {
        Layout::RowMajor
    }
}

/// A caller-owned buffer of iteration counts.
#[derive(Debug)]
pub struct IterationGrid<'a> {
    cells: &'a mut [u32],
    layout: Layout,
    stride: Option<usize>,
}

impl<'a> IterationGrid<'a> {
    /// A packed row-major grid over the buffer.
    pub fn new(cells: &'a mut [u32]) -> IterationGrid<'a> {
        IterationGrid {
            cells,
            layout: Layout::RowMajor,
            stride: None,
        }
    }

    /// Changes the layout.
    pub fn with_layout(mut self, layout: Layout) -> IterationGrid<'a> {
        self.layout = layout;
        self
    }

    /// Sets the distance in slots between the starts of consecutive
    /// lines.  Without one, lines are packed.
    pub fn with_stride(mut self, stride: usize) -> IterationGrid<'a> {
        self.stride = Some(stride);
        self
    }

    /// The layout in use.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The number of slots in the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Works out where the pixels of `rect` will go, failing if the
    /// buffer cannot hold them.  `rect` must already be valid.
    pub(crate) fn shape(&self, rect: &PixelRect) -> Result<Shape> {
        let (lines, line_len) = match self.layout {
            Layout::RowMajor => (rect.height(), rect.width()),
            Layout::ColumnMajor => (rect.width(), rect.height()),
        };
        let stride = self.stride.unwrap_or(line_len);
        if stride < line_len {
            return Err(KernelError::StrideTooNarrow {
                stride,
                line: line_len,
            });
        }

        let available = self.cells.len();
        let needed = (lines - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(line_len))
            .unwrap_or(usize::max_value());
        if needed > available {
            return Err(KernelError::BufferTooSmall { needed, available });
        }

        Ok(Shape {
            origin: Pixel(rect.x1, rect.y1),
            layout: self.layout,
            lines,
            line_len,
            stride,
        })
    }

    /// The whole buffer, for the single-threaded renderer.
    pub(crate) fn cells_mut(&mut self) -> &mut [u32] {
        &mut self.cells[..]
    }

    /// One chunk per line; each chunk is at least a line long.
    pub(crate) fn lines_mut(&mut self, shape: &Shape) -> ChunksMut<u32> {
        self.cells.chunks_mut(shape.stride)
    }

    /// Reads back the count stored for a pixel of `rect`, if it falls
    /// inside the buffer.
    pub fn get(&self, rect: &PixelRect, pixel: &Pixel) -> Option<u32> {
        if !rect.contains(pixel) {
            return None;
        }
        let shape = self.shape(rect).ok()?;
        self.cells.get(shape.offset(pixel)).cloned()
    }
}

/// The validated placement of a pixel rectangle inside a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Shape {
    pub origin: Pixel,
    pub layout: Layout,
    pub lines: usize,
    pub line_len: usize,
    pub stride: usize,
}

impl Shape {
    /// The pixel stored at position `pos` of line `line`.
    #[inline]
    pub fn pixel(&self, line: usize, pos: usize) -> Pixel {
        let (dx, dy) = match self.layout {
            Layout::RowMajor => (pos, line),
            Layout::ColumnMajor => (line, pos),
        };
        Pixel(
            (i64::from(self.origin.0) + dx as i64) as i32,
            (i64::from(self.origin.1) + dy as i64) as i32,
        )
    }

    /// The slot a pixel is stored in.
    #[inline]
    pub fn offset(&self, pixel: &Pixel) -> usize {
        let dx = (i64::from(pixel.0) - i64::from(self.origin.0)) as usize;
        let dy = (i64::from(pixel.1) - i64::from(self.origin.1)) as usize;
        match self.layout {
            Layout::RowMajor => dy * self.stride + dx,
            Layout::ColumnMajor => dx * self.stride + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_row_major_needs_exactly_the_pixel_count() {
        let rect = PixelRect::new(0, 0, 3, 1);
        let mut cells = vec![0; 8];
        let grid = IterationGrid::new(&mut cells);
        assert_eq!(grid.layout(), Layout::default());
        let shape = grid.shape(&rect).unwrap();
        assert_eq!((shape.lines, shape.line_len, shape.stride), (2, 4, 4));

        let mut cells = vec![0; 7];
        let grid = IterationGrid::new(&mut cells);
        assert_eq!(
            grid.shape(&rect).unwrap_err(),
            KernelError::BufferTooSmall {
                needed: 8,
                available: 7
            }
        );
    }

    #[test]
    fn last_line_does_not_need_stride_padding() {
        let rect = PixelRect::new(0, 0, 3, 1);
        let mut cells = vec![0; 10];
        let grid = IterationGrid::new(&mut cells).with_stride(6);
        assert!(grid.shape(&rect).is_ok());

        let mut cells = vec![0; 9];
        let grid = IterationGrid::new(&mut cells).with_stride(6);
        assert!(grid.shape(&rect).is_err());
    }

    #[test]
    fn narrow_stride_is_rejected() {
        let rect = PixelRect::new(0, 0, 3, 1);
        let mut cells = vec![0; 100];
        let grid = IterationGrid::new(&mut cells).with_stride(3);
        assert_eq!(
            grid.shape(&rect).unwrap_err(),
            KernelError::StrideTooNarrow { stride: 3, line: 4 }
        );
    }

    #[test]
    fn column_major_swaps_lines_and_positions() {
        let rect = PixelRect::new(10, 20, 13, 21);
        let mut cells = vec![0; 8];
        let grid = IterationGrid::new(&mut cells).with_layout(Layout::ColumnMajor);
        assert_eq!(grid.layout(), Layout::ColumnMajor);
        assert_eq!(grid.capacity(), 8);
        let shape = grid.shape(&rect).unwrap();
        assert_eq!((shape.lines, shape.line_len), (4, 2));
        assert_eq!(shape.pixel(3, 1), Pixel(13, 21));
        assert_eq!(shape.offset(&Pixel(13, 21)), 7);
        assert_eq!(shape.offset(&Pixel(11, 20)), 2);
    }

    #[test]
    fn offsets_invert_pixels() {
        let rect = PixelRect::new(-3, -2, 4, 5);
        let mut cells = vec![0; 200];
        let grid = IterationGrid::new(&mut cells).with_stride(11);
        let shape = grid.shape(&rect).unwrap();
        for line in 0..shape.lines {
            for pos in 0..shape.line_len {
                let p = shape.pixel(line, pos);
                assert_eq!(shape.offset(&p), line * 11 + pos);
            }
        }
    }

    #[test]
    fn get_reads_back_by_pixel() {
        let rect = PixelRect::new(1, 1, 2, 2);
        let mut cells = vec![1, 2, 3, 4];
        let grid = IterationGrid::new(&mut cells);
        assert_eq!(grid.get(&rect, &Pixel(2, 1)), Some(2));
        assert_eq!(grid.get(&rect, &Pixel(1, 2)), Some(3));
        assert_eq!(grid.get(&rect, &Pixel(0, 0)), None);
    }
}

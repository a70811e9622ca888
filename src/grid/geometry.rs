use crate::foundation::core::{Canvas, PixelRect};
use crate::foundation::error::{GridError, GridResult};

/// Per-page cell size derived from the surface and the grid shape.
///
/// Simple integer division: any remainder pixels on the right and bottom stay unused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageGeometry {
    /// Width of one grid column in pixels.
    pub cell_width: u32,
    /// Height of one grid row in pixels.
    pub cell_height: u32,
    /// Surface the grid divides.
    pub canvas: Canvas,
}

impl PageGeometry {
    /// Divide `canvas` into `rows x cols` equal cells.
    pub fn new(canvas: Canvas, rows: u32, cols: u32) -> GridResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::config("page rows and cols must be >= 1"));
        }
        let cell_width = canvas.width / cols;
        let cell_height = canvas.height / rows;
        if cell_width == 0 || cell_height == 0 {
            return Err(GridError::config(format!(
                "a {rows}x{cols} grid does not fit a {}x{} surface",
                canvas.width, canvas.height
            )));
        }
        Ok(Self {
            cell_width,
            cell_height,
            canvas,
        })
    }

    /// Pixel rectangle of a cell at 1-based `(row, col)` spanning `rowspan x colspan` cells.
    ///
    /// A cell reaching past the surface is a config error.
    pub fn cell_rect(&self, row: u32, col: u32, rowspan: u32, colspan: u32) -> GridResult<PixelRect> {
        let out_of_range = || {
            GridError::config(format!(
                "cell at row {row} col {col} spanning {rowspan}x{colspan} is out of range"
            ))
        };
        let x = col.saturating_sub(1).checked_mul(self.cell_width).ok_or_else(out_of_range)?;
        let y = row.saturating_sub(1).checked_mul(self.cell_height).ok_or_else(out_of_range)?;
        let width = colspan.max(1).checked_mul(self.cell_width).ok_or_else(out_of_range)?;
        let height = rowspan.max(1).checked_mul(self.cell_height).ok_or_else(out_of_range)?;
        let right = x.checked_add(width).ok_or_else(out_of_range)?;
        let bottom = y.checked_add(height).ok_or_else(out_of_range)?;
        if right > self.canvas.width || bottom > self.canvas.height {
            return Err(out_of_range());
        }
        Ok(PixelRect::new(x, y, width, height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/geometry.rs"]
mod tests;

//! Confusion-matrix rendering to a PNG heatmap.
//!
//! Each cell is a square whose blue intensity scales with its count, white
//! for zero through dark blue for the row maximum. Cell values themselves
//! live in the JSON report; the image is the at-a-glance artifact.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{RepertoireError, Result};

const CELL_SIZE: u32 = 48;
const GRID_LINE: Rgb<u8> = Rgb([200, 200, 200]);
const LOW_COLOR: [f64; 3] = [247.0, 251.0, 255.0];
const HIGH_COLOR: [f64; 3] = [8.0, 48.0, 107.0];

/// Render a square confusion matrix to `path` as a PNG.
pub fn render_confusion_matrix<P: AsRef<Path>>(matrix: &[Vec<usize>], path: P) -> Result<()> {
    let n = matrix.len();
    if n == 0 {
        return Err(RepertoireError::render("confusion matrix is empty"));
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(RepertoireError::render("confusion matrix must be square"));
    }

    let max = matrix
        .iter()
        .flat_map(|row| row.iter())
        .copied()
        .max()
        .unwrap_or(0);

    let side = n as u32 * CELL_SIZE + 1;
    let mut img = RgbImage::from_pixel(side, side, GRID_LINE);

    for (row, counts) in matrix.iter().enumerate() {
        for (col, &count) in counts.iter().enumerate() {
            let color = cell_color(count, max);
            let x0 = col as u32 * CELL_SIZE + 1;
            let y0 = row as u32 * CELL_SIZE + 1;

            for y in y0..y0 + CELL_SIZE - 1 {
                for x in x0..x0 + CELL_SIZE - 1 {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }

    if let Some(parent) = path.as_ref().parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    img.save(path.as_ref()).map_err(|e| {
        RepertoireError::render(format!(
            "failed to write confusion matrix to {}: {e}",
            path.as_ref().display()
        ))
    })
}

/// Linear blend between the low and high colors by `count / max`.
fn cell_color(count: usize, max: usize) -> Rgb<u8> {
    let t = if max == 0 { 0.0 } else { count as f64 / max as f64 };
    let channel = |i: usize| (LOW_COLOR[i] + (HIGH_COLOR[i] - LOW_COLOR[i]) * t).round() as u8;

    Rgb([channel(0), channel(1), channel(2)])
}

//! ASCII charting for exported artifacts.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x axis is the monthly grid; each series gets its own glyph, with a
//! legend below the grid. Mixed-scale columns chart poorly here, which is
//! exactly why the indexed and min-max views exist.

use crate::io::export::ArtifactTable;

/// Glyph per series, assigned in column order.
const GLYPHS: [char; 8] = ['o', 'x', '+', '*', '#', '@', '%', '&'];

/// Render a fixed-grid chart of every column in the artifact.
pub fn render_chart(artifact: &ArtifactTable, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = value_range(artifact).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let rows = artifact.dates.len();

    for (idx, (_, values)) in artifact.columns.iter().enumerate() {
        let glyph = GLYPHS[idx % GLYPHS.len()];
        let mut prev: Option<(usize, usize)> = None;
        for (i, &v) in values.iter().enumerate() {
            let x = map_x(i, rows, width);
            let y = map_y(v, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, x, y, glyph);
            }
            grid[y][x] = glyph;
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Chart: {} .. {} | y=[{y_min:.2}, {y_max:.2}]\n",
        artifact.dates.first().map(|d| d.to_string()).unwrap_or_default(),
        artifact.dates.last().map(|d| d.to_string()).unwrap_or_default(),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (idx, (label, _)) in artifact.columns.iter().enumerate() {
        out.push_str(&format!("{} {label}\n", GLYPHS[idx % GLYPHS.len()]));
    }

    out
}

fn value_range(artifact: &ArtifactTable) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, values) in &artifact.columns {
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else if min.is_finite() {
        // A single constant column still charts as a flat line.
        Some((min - 0.5, min + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, rows: usize, width: usize) -> usize {
    if rows <= 1 {
        return 0;
    }
    let u = index as f64 / (rows as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((v - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish); only fills blank cells so plotted
/// points stay visible.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

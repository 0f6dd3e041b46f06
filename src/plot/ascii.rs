//! ASCII plotting for terminal output.
//!
//! This is a fixed-size grid, optimized for:
//! - quick visual sanity checks of a calibration
//! - deterministic output (golden tests)
//!
//! Plot elements:
//! - observed rates: `o`
//! - selected fitted curve: `-` line

use crate::domain::FitSelection;
use crate::fit::fitted_grid;
use crate::io::FitFile;

/// Render observed rates and the selected curve for an in-memory fit.
pub fn render_calibration_plot(selection: &FitSelection, width: usize, height: usize) -> String {
    let observed = observed_points(selection);
    let (x_min, x_max) = x_range(&observed).unwrap_or((1.0, 5.0));
    let curve = fitted_grid(&selection.best, x_min, x_max, width.max(2));
    render_plot(&observed, &curve, x_min, x_max, width, height)
}

/// Render a previously exported fit file (stored grid plus observed rates).
pub fn render_fit_file_plot(file: &FitFile, width: usize, height: usize) -> String {
    let observed = observed_points(&file.selection);
    let curve = file.grid.points();
    let (x_min, x_max) = x_range(&curve).or_else(|| x_range(&observed)).unwrap_or((1.0, 5.0));
    render_plot(&observed, &curve, x_min, x_max, width, height)
}

fn observed_points(selection: &FitSelection) -> Vec<(f64, f64)> {
    selection
        .xs
        .iter()
        .zip(&selection.rates)
        .map(|(&x, &r)| (f64::from(x), r))
        .collect()
}

fn render_plot(
    observed: &[(f64, f64)],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(observed.iter().chain(curve)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so observed points overlay it.
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    for &(x, y) in observed {
        if !y.is_finite() {
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.0}, {x_max:.0}] valves | rate=[{y_min:.4}, {y_max:.4}]/s\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    (min_x.is_finite() && max_x.is_finite() && max_x > min_x).then_some((min_x, max_x))
}

fn y_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    (min_y.is_finite() && max_y.is_finite() && max_y > min_y).then_some((min_y, max_y))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (max).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;
    use crate::fit::fit_and_select;

    #[test]
    fn plot_golden_snapshot_small() {
        // rates 1, 2 on x = 1, 2: an exact line from bottom-left to top-right.
        let samples = vec![Sample::new(1, 1000.0), Sample::new(2, 500.0)];
        let selection = fit_and_select(&samples, 1.0).unwrap();

        let txt = render_calibration_plot(&selection, 10, 5);
        let expected = concat!(
            "Plot: x=[1, 2] valves | rate=[0.9500, 2.0500]/s\n",
            "         o\n",
            "      --- \n",
            "    --    \n",
            " ---      \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_data_still_renders() {
        let samples = vec![Sample::new(1, 1000.0), Sample::new(2, 1000.0)];
        let selection = fit_and_select(&samples, 1.0).unwrap();
        let txt = render_calibration_plot(&selection, 12, 6);
        assert_eq!(txt.lines().count(), 7);
        assert!(txt.contains('o'));
    }
}

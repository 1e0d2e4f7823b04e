//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden-testable).
//!
//! Plot elements:
//! - data points: `o`
//! - fitted or connecting line: `-`

use crate::domain::KeplerPair;
use crate::estimate::KeplerFit;
use crate::io::SweepPoint;

/// Kepler x vs y scatter with the least-squares line, if any.
pub fn render_kepler_plot(pairs: &[KeplerPair], fit: Option<&KeplerFit>, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = pairs.iter().map(|p| (p.x, p.y)).collect();
    let line = fit.and_then(|f| {
        let (x0, x1) = finite_range(points.iter().map(|p| p.0))?;
        Some(vec![(x0, f.intercept + f.slope * x0), (x1, f.intercept + f.slope * x1)])
    });
    render_xy_plot("Kepler", &points, line.as_deref(), width, height)
}

/// Eccentricity qualifier vs percent error of the mean, points joined in order.
pub fn render_sweep_plot(points: &[SweepPoint], width: usize, height: usize) -> String {
    let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.threshold, p.percent_error_mean)).collect();
    render_xy_plot("Sweep", &xy, Some(xy.as_slice()), width, height)
}

/// Render a scatter plus an optional polyline on one grid.
pub fn render_xy_plot(
    title: &str,
    scatter: &[(f64, f64)],
    line: Option<&[(f64, f64)]>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = || scatter.iter().chain(line.unwrap_or(&[]).iter());

    let (x_min, x_max) = match finite_range(all().map(|p| p.0)) {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, hi)) => pad_range(lo, hi, 0.05),
        None => (0.0, 1.0),
    };
    let (y_min, y_max) = finite_range(all().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so points overlay it.
    if let Some(line) = line {
        draw_polyline(&mut grid, line, x_min, x_max, y_min, y_max);
    }

    for &(x, y) in scatter {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = format!("{title}: x=[{x_min:.3e}, {x_max:.3e}] | y=[{y_min:.3e}, {y_max:.3e}]\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (min <= max).then_some((min, max))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { (min.abs() * frac).max(1e-12) };
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
    // max y is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
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

    #[test]
    fn plot_golden_snapshot_small() {
        let scatter = [(1.0, 100.0), (10.0, 110.0)];
        let line = [(1.0, 100.0), (10.0, 100.0)];
        let txt = render_xy_plot("Kepler", &scatter, Some(&line[..]), 10, 5);
        let expected = concat!(
            "Kepler: x=[1.000e0, 1.000e1] | y=[9.950e1, 1.105e2]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn kepler_plot_draws_fit_line() {
        let pairs = [KeplerPair { x: 1.0, y: 1.0 }, KeplerPair { x: 2.0, y: 2.0 }];
        let fit = KeplerFit {
            n: 2,
            slope: 1.0,
            intercept: 0.0,
            r_squared: 1.0,
            implied_mass_kg: std::f64::consts::PI,
        };
        let txt = render_kepler_plot(&pairs, Some(&fit), 20, 10);
        assert!(txt.starts_with("Kepler: "));
        assert!(txt.contains('-'));
        assert_eq!(txt.matches('o').count(), 2);
    }

    #[test]
    fn single_point_sweep_does_not_panic() {
        let points = [SweepPoint {
            threshold: 0.0,
            percent_error_mean: 1.0,
            disqualified: 4,
        }];
        let txt = render_sweep_plot(&points, 12, 6);
        assert_eq!(txt.lines().count(), 7);
        assert_eq!(txt.matches('o').count(), 1);
    }

    #[test]
    fn empty_input_renders_blank_grid() {
        let txt = render_xy_plot("Empty", &[], None, 10, 5);
        assert_eq!(txt.lines().count(), 6);
        assert!(!txt.contains('o'));
    }
}

//! SVG Chart Renderer
//!
//! Draws a computed `Chart` as an inline SVG document.

use std::fmt::Write;

use super::charts::{BoxPlot, Chart, Histogram, Regression, SeriesChart};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Chart colors for different series
const SERIES_COLORS: [&str; 6] = [
    "#FF9800", // Orange (primary)
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

const GRID_COLOR: &str = "#374151";
const LABEL_COLOR: &str = "#9ca3af";
const BACKGROUND: &str = "#1f2937";
const HIGHLIGHT: &str = "#ffffff";

/// Maps data coordinates onto the plot area
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    /// Fit the frame around the data with 10% vertical padding
    fn fit(xs: impl Iterator<Item = f64>, ys: impl Iterator<Item = f64>) -> Self {
        let (x_min, x_max) = padded_range(xs, 0.0);
        let (y_min, y_max) = padded_range(ys, 0.1);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn x(&self, value: f64) -> f64 {
        let chart_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (value - self.x_min) / (self.x_max - self.x_min) * chart_width
    }

    fn y(&self, value: f64) -> f64 {
        // Inverted because SVG y grows downward
        let chart_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + (self.y_max - value) / (self.y_max - self.y_min) * chart_height
    }
}

fn padded_range(values: impl Iterator<Item = f64>, padding: f64) -> (f64, f64) {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }

    let span = hi - lo;
    let pad = if span > 0.0 { span * padding } else { 1.0 };
    lo -= pad;
    hi += pad;

    if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }
    (lo, hi)
}

/// Render a chart to a standalone `<svg>` element
pub fn render(chart: &Chart) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><rect width="{w}" height="{h}" fill="{bg}"/>"#,
        w = WIDTH,
        h = HEIGHT,
        bg = BACKGROUND
    );

    match chart {
        Chart::Line(series) => draw_series(&mut out, series, true),
        Chart::Scatter(series) => draw_series(&mut out, series, false),
        Chart::Histogram(hist) => draw_histogram(&mut out, hist),
        Chart::BoxPlot(plot) => draw_box_plot(&mut out, plot),
        Chart::Regression(reg) => draw_regression(&mut out, reg),
    }

    draw_axis_labels(&mut out, chart.x_label(), chart.y_label());
    out.push_str("</svg>");
    out
}

fn draw_grid(out: &mut String, frame: &Frame, x_ticks: bool) {
    // Horizontal grid lines (5 lines)
    for i in 0..=5 {
        let y = MARGIN_TOP + (i as f64 / 5.0) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM);
        let value = frame.y_max - (i as f64 / 5.0) * (frame.y_max - frame.y_min);
        let _ = write!(
            out,
            r#"<line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="{c}" stroke-width="1"/><text x="5" y="{ty:.1}" fill="{lc}" font-size="12" font-family="sans-serif">{value:.1}</text>"#,
            x1 = MARGIN_LEFT,
            x2 = WIDTH - MARGIN_RIGHT,
            c = GRID_COLOR,
            ty = y + 4.0,
            lc = LABEL_COLOR,
        );
    }

    if x_ticks {
        for i in 0..=5 {
            let value = frame.x_min + (i as f64 / 5.0) * (frame.x_max - frame.x_min);
            let _ = write!(
                out,
                r#"<text x="{x:.1}" y="{y:.1}" fill="{lc}" font-size="12" font-family="sans-serif" text-anchor="middle">{value:.1}</text>"#,
                x = frame.x(value),
                y = HEIGHT - MARGIN_BOTTOM + 16.0,
                lc = LABEL_COLOR,
            );
        }
    }
}

fn draw_axis_labels(out: &mut String, x_label: &str, y_label: &str) {
    let _ = write!(
        out,
        r#"<text x="{x:.1}" y="{y:.1}" fill="{lc}" font-size="13" font-family="sans-serif" text-anchor="middle">{label}</text>"#,
        x = MARGIN_LEFT + (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
        y = HEIGHT - 6.0,
        lc = LABEL_COLOR,
        label = escape(x_label),
    );
    let _ = write!(
        out,
        r#"<text x="14" y="{y:.1}" fill="{lc}" font-size="13" font-family="sans-serif" text-anchor="middle" transform="rotate(-90 14 {y:.1})">{label}</text>"#,
        y = MARGIN_TOP + (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / 2.0,
        lc = LABEL_COLOR,
        label = escape(y_label),
    );
}

fn draw_points(out: &mut String, frame: &Frame, points: &[(f64, f64)], color: &str) {
    for (x, y) in points {
        let _ = write!(
            out,
            r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"/>"#,
            frame.x(*x),
            frame.y(*y),
            color
        );
    }
}

fn polyline(out: &mut String, frame: &Frame, points: &[(f64, f64)], color: &str) {
    if points.is_empty() {
        return;
    }
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", frame.x(*x), frame.y(*y)))
        .collect();
    let _ = write!(
        out,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        coords.join(" "),
        color
    );
}

fn draw_series(out: &mut String, series: &SeriesChart, connect: bool) {
    let frame = Frame::fit(
        series.points.iter().map(|p| p.0),
        series.points.iter().map(|p| p.1),
    );
    draw_grid(out, &frame, true);

    let color = SERIES_COLORS[if connect { 0 } else { 2 }];
    if connect {
        polyline(out, &frame, &series.points, color);
    }
    draw_points(out, &frame, &series.points, color);
}

fn draw_histogram(out: &mut String, hist: &Histogram) {
    let Some(first) = hist.bins.first() else {
        return;
    };
    let last = hist.bins[hist.bins.len() - 1];

    let max_count = hist.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let max_density = hist.density.iter().map(|d| d.1).fold(0.0, f64::max);
    let frame = Frame {
        x_min: first.start,
        x_max: last.end,
        y_min: 0.0,
        y_max: max_count.max(max_density).max(1.0) * 1.1,
    };
    draw_grid(out, &frame, true);

    for bin in &hist.bins {
        let x = frame.x(bin.start);
        let w = frame.x(bin.end) - x;
        let y = frame.y(bin.count as f64);
        let h = frame.y(0.0) - y;
        let _ = write!(
            out,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{c}" fill-opacity="0.6" stroke="{bg}"/>"#,
            c = SERIES_COLORS[2],
            bg = BACKGROUND,
        );
    }

    polyline(out, &frame, &hist.density, SERIES_COLORS[0]);
}

fn draw_box_plot(out: &mut String, plot: &BoxPlot) {
    let values = plot.groups.iter().flat_map(|g| {
        [g.whisker_low, g.whisker_high]
            .into_iter()
            .chain(g.outliers.iter().copied())
    });
    let (y_min, y_max) = padded_range(values, 0.1);
    let frame = Frame {
        x_min: 0.0,
        x_max: plot.groups.len().max(1) as f64,
        y_min,
        y_max,
    };
    draw_grid(out, &frame, false);

    for (i, group) in plot.groups.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let center = frame.x(i as f64 + 0.5);
        let half = (frame.x(1.0) - frame.x(0.0)) * 0.2;

        let (top, bottom) = (frame.y(group.q3), frame.y(group.q1));
        let _ = write!(
            out,
            r#"<line x1="{center:.1}" y1="{hi:.1}" x2="{center:.1}" y2="{lo:.1}" stroke="{LABEL_COLOR}" stroke-width="1.5"/><rect x="{x:.1}" y="{top:.1}" width="{w:.1}" height="{h:.1}" fill="{color}" fill-opacity="0.7" stroke="{LABEL_COLOR}"/><line x1="{x:.1}" y1="{m:.1}" x2="{x2:.1}" y2="{m:.1}" stroke="{HIGHLIGHT}" stroke-width="2"/>"#,
            hi = frame.y(group.whisker_high),
            lo = frame.y(group.whisker_low),
            x = center - half,
            x2 = center + half,
            w = half * 2.0,
            h = bottom - top,
            m = frame.y(group.median),
        );

        for outlier in &group.outliers {
            let _ = write!(
                out,
                r#"<circle cx="{center:.1}" cy="{:.1}" r="3" fill="none" stroke="{color}"/>"#,
                frame.y(*outlier)
            );
        }

        let _ = write!(
            out,
            r#"<text x="{center:.1}" y="{y:.1}" fill="{LABEL_COLOR}" font-size="12" font-family="sans-serif" text-anchor="middle">{label}</text>"#,
            y = HEIGHT - MARGIN_BOTTOM + 16.0,
            label = escape(&group.label),
        );
    }
}

fn draw_regression(out: &mut String, reg: &Regression) {
    let frame = Frame::fit(
        reg.points.iter().map(|p| p.0),
        reg.points.iter().map(|p| p.1),
    );
    draw_grid(out, &frame, true);
    draw_points(out, &frame, &reg.points, SERIES_COLORS[2]);

    let (x_lo, x_hi) = reg
        .points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.0), hi.max(p.0))
        });
    polyline(
        out,
        &frame,
        &[(x_lo, reg.fit.at(x_lo)), (x_hi, reg.fit.at(x_hi))],
        SERIES_COLORS[0],
    );

    let _ = write!(
        out,
        r#"<text x="{x:.1}" y="{y:.1}" fill="{HIGHLIGHT}" font-size="14" font-family="sans-serif">r = {r:.2}</text>"#,
        x = MARGIN_LEFT + 10.0,
        y = MARGIN_TOP + 18.0,
        r = reg.correlation,
    );
}

/// Escape text for HTML and SVG content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::charts::{box_stats, histogram, LinearFit};

    #[test]
    fn test_render_line() {
        let chart = Chart::Line(SeriesChart {
            x_label: "Index".to_string(),
            y_label: "Age".to_string(),
            points: vec![(0.0, 20.0), (1.0, 35.0), (2.0, 40.0)],
        });

        let svg = render(&chart);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_render_histogram_bars() {
        let chart = Chart::Histogram(Histogram {
            x_label: "Age".to_string(),
            bins: histogram(&[1.0, 2.0, 3.0], 20),
            density: Vec::new(),
        });

        let svg = render(&chart);
        assert_eq!(svg.matches("<rect").count(), 21); // background + 20 bars
    }

    #[test]
    fn test_render_box_plot_labels_escaped() {
        let chart = Chart::BoxPlot(BoxPlot {
            x_label: "Age Group".to_string(),
            y_label: "Weight".to_string(),
            groups: vec![box_stats("<30", &[50.0, 60.0, 70.0]).unwrap()],
        });

        let svg = render(&chart);
        assert!(svg.contains("&lt;30"));
        assert!(!svg.contains("><30<"));
    }

    #[test]
    fn test_render_regression_shows_r() {
        let chart = Chart::Regression(Regression {
            x_label: "Height".to_string(),
            y_label: "Weight".to_string(),
            points: vec![(150.0, 50.0), (160.0, 60.0)],
            fit: LinearFit {
                slope: 1.0,
                intercept: -100.0,
            },
            correlation: 0.98765,
        });

        assert!(render(&chart).contains("r = 0.99"));
    }

    #[test]
    fn test_padded_range_degenerate() {
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        assert_eq!(padded_range([5.0].into_iter(), 0.1), (4.0, 6.0));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}

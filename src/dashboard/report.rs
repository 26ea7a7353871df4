//! Dashboard Rendering
//!
//! Two views of the same `Dashboard`: a self-contained HTML page with inline
//! SVG charts, and a plain-text summary for the terminal.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::charts::{Chart, ChartPanel};
use super::svg;
use super::{Dashboard, StatisticsOutcome};

pub const TITLE: &str = "Obesity Data Dashboard";

const STYLE: &str = "
body { font-family: system-ui, sans-serif; background: #111827; color: #e5e7eb; margin: 2rem; }
h1, h2 { color: #f9fafb; }
table { border-collapse: collapse; font-size: 0.85rem; }
th, td { border: 1px solid #374151; padding: 0.25rem 0.5rem; text-align: right; }
th { background: #1f2937; }
.table-wrap { max-height: 24rem; overflow: auto; margin-bottom: 2rem; }
.panel { margin-bottom: 2rem; }
.error { background: #7f1d1d; color: #fecaca; padding: 0.75rem; border-radius: 4px; }
.stats li { font-family: monospace; }
";

/// Full HTML page
pub fn render_html(dashboard: &Dashboard, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{TITLE}</h1>\n"
    );
    let _ = writeln!(
        out,
        "<p>Generated {} from {} rows.</p>",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        dashboard.table.len()
    );

    // Columns
    let columns: Vec<String> = dashboard.table.columns().iter().map(|c| svg::escape(c)).collect();
    let _ = writeln!(out, "<h2>Available Columns</h2>\n<p>{}</p>", columns.join(", "));

    if let Some(outcome) = &dashboard.statistics {
        html_statistics(&mut out, outcome);
    }

    html_table(&mut out, dashboard);

    for panel in &dashboard.charts {
        html_panel(&mut out, panel);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn html_statistics(out: &mut String, outcome: &StatisticsOutcome) {
    let _ = writeln!(out, "<h2>Statistics for {}</h2>", outcome.column());
    match outcome {
        StatisticsOutcome::Summary { summary, .. } => {
            let _ = writeln!(
                out,
                "<ul class=\"stats\">\n<li>Mean: {:.2}</li>\n<li>Standard Deviation: {:.2}</li>\n<li>Median: {:.2}</li>\n</ul>",
                summary.mean, summary.std, summary.median
            );
        }
        StatisticsOutcome::Rejected { message, .. } | StatisticsOutcome::Failed { message, .. } => {
            let _ = writeln!(out, "<div class=\"error\">{}</div>", svg::escape(message));
        }
    }
}

fn html_table(out: &mut String, dashboard: &Dashboard) {
    let table = &dashboard.table;

    out.push_str("<h2>Dataset</h2>\n<div class=\"table-wrap\">\n<table>\n<thead><tr>");
    for column in table.columns() {
        let _ = write!(out, "<th>{}</th>", svg::escape(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for row in 0..table.len() {
        out.push_str("<tr>");
        for column in table.columns() {
            let _ = write!(out, "<td>{}</td>", svg::escape(&table.display_cell(row, column)));
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n</div>\n");
}

fn html_panel(out: &mut String, panel: &ChartPanel) {
    let _ = writeln!(out, "<section class=\"panel\">\n<h2>{}</h2>", svg::escape(panel.title));
    match &panel.result {
        Ok(chart) => {
            out.push_str(&svg::render(chart));
            out.push('\n');
            if let Chart::Regression(reg) = chart {
                let _ = writeln!(out, "<p>Correlation Coefficient: {:.2}</p>", reg.correlation);
            }
        }
        Err(e) => {
            let _ = writeln!(
                out,
                "<div class=\"error\">Could not draw {}: {}</div>",
                svg::escape(panel.title),
                svg::escape(&e.to_string())
            );
        }
    }
    out.push_str("</section>\n");
}

/// Terminal view; the table is cut off after `max_rows`
pub fn render_text(dashboard: &Dashboard, max_rows: usize) -> String {
    let mut out = String::new();
    let table = &dashboard.table;

    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));
    let _ = writeln!(out);
    let _ = writeln!(out, "Available columns: {}", table.columns().join(", "));
    let _ = writeln!(out);

    // Header
    let mut header = String::new();
    for (i, column) in table.columns().iter().enumerate() {
        if i > 0 {
            header.push_str(" | ");
        }
        let _ = write!(header, "{:<12}", column);
    }
    let _ = writeln!(out, "{}", header.trim_end());
    let _ = writeln!(out, "{}", "-".repeat(table.columns().len() * 15));

    // Data rows
    for row in 0..table.len().min(max_rows) {
        let mut line = String::new();
        for (i, column) in table.columns().iter().enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            let _ = write!(line, "{:<12}", table.display_cell(row, column));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    if table.len() > max_rows {
        let _ = writeln!(out, "... {} more rows", table.len() - max_rows);
    }

    if let Some(outcome) = &dashboard.statistics {
        let _ = writeln!(out);
        let _ = writeln!(out, "Statistics for {}:", outcome.column());
        match outcome {
            StatisticsOutcome::Summary { summary, .. } => {
                let _ = writeln!(out, "  Mean:               {:.2}", summary.mean);
                let _ = writeln!(out, "  Standard Deviation: {:.2}", summary.std);
                let _ = writeln!(out, "  Median:             {:.2}", summary.median);
            }
            StatisticsOutcome::Rejected { message, .. }
            | StatisticsOutcome::Failed { message, .. } => {
                let _ = writeln!(out, "  Error: {}", message);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Charts:");
    for panel in &dashboard.charts {
        match &panel.result {
            Ok(chart) => {
                let _ = writeln!(out, "  {}: {}", panel.title, describe(chart));
            }
            Err(e) => {
                let _ = writeln!(out, "  {}: error: {}", panel.title, e);
            }
        }
    }

    out
}

/// One-line summary of a chart for the terminal
fn describe(chart: &Chart) -> String {
    match chart {
        Chart::Line(s) | Chart::Scatter(s) => format!("{} points", s.points.len()),
        Chart::Histogram(h) => format!(
            "{} bins, {} values",
            h.bins.len(),
            h.bins.iter().map(|b| b.count).sum::<usize>()
        ),
        Chart::BoxPlot(b) => b
            .groups
            .iter()
            .map(|g| format!("{} (n={}, median {:.1})", g.label, g.count, g.median))
            .collect::<Vec<_>>()
            .join(", "),
        Chart::Regression(r) => format!(
            "y = {:.3}x + {:.3}, Correlation Coefficient: {:.2}",
            r.fit.slope, r.fit.intercept, r.correlation
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{render_charts, Table};
    use crate::dataset::{Column, Summary};
    use chrono::TimeZone;
    use serde_json::json;

    fn dashboard(statistics: Option<StatisticsOutcome>) -> Dashboard {
        let table = Table::from_json(json!([
            {"Height": 150.0, "Weight": 50.0, "Age": 20.0, "Gender": "<F>", "Age_Group_30": "Under 30"},
            {"Height": 160.0, "Weight": 60.0, "Age": 35.0, "Gender": "M", "Age_Group_30": "30 and Above"},
            {"Height": 170.0, "Weight": 70.0, "Age": 40.0, "Gender": "F", "Age_Group_30": "30 and Above"}
        ]))
        .unwrap();
        let charts = render_charts(&table);
        Dashboard {
            table,
            statistics,
            charts,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_html_contains_every_section() {
        let html = render_html(
            &dashboard(Some(StatisticsOutcome::Summary {
                column: Column::Height,
                summary: Summary {
                    mean: 160.0,
                    std: 10.0,
                    median: 160.0,
                },
            })),
            generated_at(),
        );

        assert!(html.contains("<title>Obesity Data Dashboard</title>"));
        assert!(html.contains("Generated 2024-01-15 12:00:00 UTC from 3 rows."));
        assert!(html.contains("Statistics for Height"));
        assert!(html.contains("<li>Mean: 160.00</li>"));
        assert!(html.contains("<li>Standard Deviation: 10.00</li>"));
        assert!(html.contains("Line Plot of Age"));
        assert!(html.contains("Histogram of Age"));
        assert!(html.contains("Correlation Coefficient: 1.00"));
        assert_eq!(html.matches("<svg").count(), 5);
        // Cell text is escaped
        assert!(html.contains("&lt;F&gt;"));
        assert!(!html.contains("<F>"));
    }

    #[test]
    fn test_html_shows_statistics_error() {
        let html = render_html(
            &dashboard(Some(StatisticsOutcome::Rejected {
                column: Column::Age,
                message: "Error calculating statistics: column 'Age' has no values".to_string(),
            })),
            generated_at(),
        );

        assert!(html.contains("<div class=\"error\">Error calculating statistics"));
        assert!(!html.contains("<li>Mean"));
    }

    #[test]
    fn test_text_truncates_rows() {
        let text = render_text(&dashboard(None), 2);

        assert!(text.starts_with("Obesity Data Dashboard\n"));
        assert!(text.contains("... 1 more rows"));
        assert!(!text.contains("Statistics for"));
        assert!(text.contains("Histogram of Age: 20 bins, 3 values"));
    }

    #[test]
    fn test_text_reports_chart_errors() {
        let table = Table::from_json(json!([
            {"Height": 150.0, "Weight": 50.0, "Age": 20.0, "Age_Group_30": "Under 30"}
        ]))
        .unwrap();
        let charts = render_charts(&table);
        let text = render_text(
            &Dashboard {
                table,
                statistics: None,
                charts,
            },
            10,
        );

        assert!(text.contains("Height vs. Weight Linear Relationship: error:"));
        assert!(text.contains("Line Plot of Age: 1 points"));
    }
}

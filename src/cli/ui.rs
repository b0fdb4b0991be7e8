use crate::core::feed::RatePoint;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Fixed vertical chart domain. The USD/PEN pair has traded inside this band
/// for years; pinning the axis keeps day-to-day charts visually comparable.
pub const CHART_Y_MIN: f64 = 3.4;
pub const CHART_Y_MAX: f64 = 4.0;

const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 12;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Highlight,
    Positive,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Highlight => style(text).bold(),
        StyleType::Positive => style(text).green().bold(),
        StyleType::Warning => style(text).yellow().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for a rate value, 4 decimal digits.
pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a signed delta with color coding.
pub fn delta_cell(delta: f64) -> Cell {
    let text = format!("{delta:+.4}");
    if delta >= 0.0 {
        Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(text)
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right)
    }
}

/// Creates an `indicatif::ProgressBar` for the auto-refresh countdown.
pub fn new_countdown_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}s")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

/// Renders the history series as a text line chart with the fixed
/// [`CHART_Y_MIN`, `CHART_Y_MAX`] vertical domain and a dashed marker row at
/// the current rate. Values outside the domain are clamped onto its edge.
/// The caller handles the empty-series case.
pub fn render_chart(series: &[RatePoint], current_rate: f64) -> String {
    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let n = closes.len();
    let width = CHART_WIDTH;

    let row_of = |value: f64| -> usize {
        let clamped = value.clamp(CHART_Y_MIN, CHART_Y_MAX);
        let frac = (CHART_Y_MAX - clamped) / (CHART_Y_MAX - CHART_Y_MIN);
        (frac * (CHART_HEIGHT - 1) as f64).round() as usize
    };

    // Resample the series onto the chart width; short series repeat points
    let col_rows: Vec<usize> = (0..width)
        .map(|col| {
            let idx = if n <= 1 { 0 } else { col * (n - 1) / (width - 1) };
            row_of(closes[idx])
        })
        .collect();
    let marker_row = row_of(current_rate);

    let gutter = 7;
    let mut output = String::new();
    for row in 0..CHART_HEIGHT {
        let label = if row == 0 {
            format!("{CHART_Y_MAX:>gutter$.4}")
        } else if row == CHART_HEIGHT - 1 {
            format!("{CHART_Y_MIN:>gutter$.4}")
        } else if row == CHART_HEIGHT / 2 {
            let mid = (CHART_Y_MIN + CHART_Y_MAX) / 2.0;
            format!("{mid:>gutter$.4}")
        } else {
            " ".repeat(gutter)
        };
        output.push_str(&label);
        output.push('┤');
        for col in 0..width {
            if col_rows[col] == row {
                output.push_str(&style("●").cyan().to_string());
            } else if row == marker_row {
                output.push_str(&style("┄").red().to_string());
            } else {
                output.push(' ');
            }
        }
        output.push('\n');
    }

    // X axis with the window's date range
    output.push_str(&" ".repeat(gutter));
    output.push('└');
    output.push_str(&"─".repeat(width));
    output.push('\n');
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        let left = first.date.to_string();
        let right = last.date.to_string();
        let pad = (width + 1).saturating_sub(left.len() + right.len());
        output.push_str(&" ".repeat(gutter));
        output.push_str(&format!("{left}{}{right}\n", " ".repeat(pad)));
    }
    output.push_str(&style_text(
        &format!("┄ current rate (S/. {current_rate:.4})"),
        StyleType::Subtle,
    ));
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_from(closes: &[f64]) -> Vec<RatePoint> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| RatePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect()
    }

    #[test]
    fn test_chart_carries_axis_labels_and_marker() {
        let series = series_from(&[3.65, 3.70, 3.75, 3.72, 3.68]);
        let chart = render_chart(&series, 3.70);

        assert!(chart.contains("4.0000"));
        assert!(chart.contains("3.7000"));
        assert!(chart.contains("3.4000"));
        assert!(chart.contains("●"));
        assert!(chart.contains("┄ current rate (S/. 3.7000)"));
        assert!(chart.contains("2025-06-01"));
        assert!(chart.contains("2025-06-05"));
    }

    #[test]
    fn test_chart_clamps_values_outside_domain() {
        // Both closes and the marker sit outside [3.4, 4.0]
        let series = series_from(&[5.0, 2.0]);
        let chart = render_chart(&series, 4.5);
        assert!(chart.contains("●"));
        assert!(chart.contains("┄"));
    }

    #[test]
    fn test_chart_single_point_series() {
        let series = series_from(&[3.75]);
        let chart = render_chart(&series, 3.75);
        assert!(chart.contains("●"));
    }
}

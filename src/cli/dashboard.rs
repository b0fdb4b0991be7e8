use super::ui;
use crate::core::RateFeed;
use crate::core::dashboard::{self, DashboardData};
use crate::core::guidance::Recommendation;
use anyhow::Result;
use comfy_table::Cell;
use std::time::Instant;

/// One render cycle: fetch, compute, print. A fresh process starts with a
/// cold cache, so this is also the manual "refresh now" path.
pub async fn run(feed: &(dyn RateFeed), usd_amount: f64, window_days: u32) -> Result<()> {
    let mut controller = crate::core::RefreshController::new(false);

    // Cold start always triggers a fetch
    debug_assert!(controller.needs_refresh(Instant::now()));
    controller.begin_refresh();
    match dashboard::build(feed, usd_amount, window_days).await {
        Ok(data) => {
            controller.complete_refresh(Instant::now());
            println!("{}", render(&data));
            Ok(())
        }
        Err(e) => {
            controller.refresh_failed();
            Err(e)
        }
    }
}

/// Lays the view model out as terminal text: KPI lines, chart section,
/// averages table, recommendation banner, footer.
pub fn render(data: &DashboardData) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n\n",
        ui::style_text("USD → PEN Exchange Dashboard", ui::StyleType::Title)
    ));

    output.push_str(&format!(
        "Current rate: {}\n",
        ui::style_text(
            &format!("S/. {:.4} per USD", data.quote.rate),
            ui::StyleType::Highlight
        )
    ));
    output.push_str(&format!(
        "{}\n\n",
        ui::style_text(
            &format!("Last updated: {}", data.quote.observed_at_display()),
            ui::StyleType::Subtle
        )
    ));

    output.push_str(&format!(
        "Quick conversion: {}\n\n",
        ui::style_text(
            &format!("{:.2} USD → {:.2} PEN", data.usd_amount, data.converted),
            ui::StyleType::Highlight
        )
    ));

    output.push_str(&format!(
        "{}\n",
        ui::style_text(
            &format!("History ({} days)", data.chart.window_days),
            ui::StyleType::Title
        )
    ));
    if let Some(error) = &data.chart.error {
        output.push_str(&format!(
            "{}\n",
            ui::style_text(
                &format!("History unavailable: {error}"),
                ui::StyleType::Error
            )
        ));
    } else if data.chart.series.is_empty() {
        output.push_str(&format!(
            "{}\n",
            ui::style_text(
                "No historical data available for this window.",
                ui::StyleType::Error
            )
        ));
    } else {
        output.push_str(&ui::render_chart(&data.chart.series, data.quote.rate));
    }
    output.push('\n');

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Average"),
        ui::header_cell("Rate (PEN)"),
        ui::header_cell("Delta vs now"),
    ]);
    for (label, avg) in [
        ("7-day", data.averages.avg7),
        ("30-day", data.averages.avg30),
        ("365-day", data.averages.avg365),
    ] {
        table.add_row(vec![
            Cell::new(label),
            ui::rate_cell(avg),
            ui::delta_cell(data.quote.rate - avg),
        ]);
    }
    output.push_str(&table.to_string());
    output.push_str("\n\n");

    let banner = match data.recommendation {
        Recommendation::Buy => ui::style_text(
            &format!("BUY  (score {:.2} > 0.50)", data.score),
            ui::StyleType::Positive,
        ),
        Recommendation::WaitSell => ui::style_text(
            &format!("WAIT / SELL  (score {:.2} <= 0.50)", data.score),
            ui::StyleType::Warning,
        ),
    };
    output.push_str(&format!("Recommendation: {banner}\n\n"));

    output.push_str(&ui::style_text(
        &format!(
            "Data via Yahoo Finance (15 min delay) • Last updated {}",
            data.quote.observed_at_display()
        ),
        ui::StyleType::Subtle,
    ));

    output
}

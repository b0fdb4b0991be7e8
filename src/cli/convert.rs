use super::ui;
use crate::core::RateFeed;
use anyhow::Result;

/// Quick conversion without the full dashboard.
pub async fn run(feed: &(dyn RateFeed), usd_amount: f64) -> Result<()> {
    let quote = feed.latest().await?;
    let converted = usd_amount * quote.rate;

    println!(
        "{}",
        ui::style_text(
            &format!("{usd_amount:.2} USD → {converted:.2} PEN"),
            ui::StyleType::Highlight
        )
    );
    println!(
        "{}",
        ui::style_text(
            &format!(
                "S/. {:.4} per USD, as of {}",
                quote.rate,
                quote.observed_at_display()
            ),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

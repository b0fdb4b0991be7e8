use super::{dashboard::render, ui};
use crate::core::RateFeed;
use crate::core::dashboard;
use crate::core::refresh::{AUTO_REFRESH_CADENCE, RefreshController, RefreshPhase};
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::io::AsyncBufReadExt;
use tokio::time::sleep;
use tracing::{debug, info};

/// Auto-refresh loop: render, count down the 60-second cadence on a
/// one-second poll tick, re-render when it elapses. Pressing Enter forces an
/// immediate cycle; the force bypasses the cadence but not the feed cache's
/// TTLs, so a forced cycle may still serve cached values.
///
/// A feed failure is fatal to the render cycle and ends the loop, matching
/// the one-shot behavior; there is no last-known-good fallback.
pub async fn run(feed: &(dyn RateFeed), usd_amount: f64, window_days: u32) -> Result<()> {
    info!("Starting auto-refresh loop");
    println!(
        "{}",
        ui::style_text(
            "Auto-refresh every 60s. Press Enter to refresh now, Ctrl-C to quit.",
            ui::StyleType::Subtle
        )
    );

    // Reader task so the countdown select stays cancel-safe
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if tx.send(()).is_err() {
                break;
            }
        }
    });

    let mut controller = RefreshController::new(true);
    loop {
        if controller.needs_refresh(Instant::now()) {
            controller.begin_refresh();
            match dashboard::build(feed, usd_amount, window_days).await {
                Ok(data) => {
                    controller.complete_refresh(Instant::now());
                    println!("{}", render(&data));
                }
                Err(e) => {
                    controller.refresh_failed();
                    return Err(e);
                }
            }
        }

        let pb = ui::new_countdown_bar(AUTO_REFRESH_CADENCE.as_secs());
        loop {
            let now = Instant::now();
            if controller.phase() == RefreshPhase::Refreshing {
                debug!("Manual refresh requested");
                break;
            }
            if controller.refresh_due(now) {
                // Wait out the last fraction of a second, then rerun
                sleep(Duration::from_secs(1)).await;
                break;
            }
            let remaining = controller.remaining_seconds(now);
            pb.set_position(AUTO_REFRESH_CADENCE.as_secs() - remaining);
            pb.set_message(format!("{remaining}s until refresh"));

            tokio::select! {
                _ = sleep(Duration::from_secs(1)) => {}
                pressed = rx.recv() => {
                    match pressed {
                        Some(()) => controller.force_refresh(),
                        // stdin closed; fall back to the timer alone
                        None => sleep(Duration::from_secs(1)).await,
                    }
                }
            }
        }
        pb.finish_and_clear();
        ui::print_separator();
    }
}

//! Periodic refresh loop.
//!
//! Refreshes on every tick, prints the summary whenever it changes and
//! reports failed refreshes on stderr without stopping.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use coronatracker_core::{
    PieEntry, RefreshController, StatsClient, Subscription, Summary, SummaryData,
    SummaryRepository,
};

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output::{self, SummaryView};

use super::Context;

/// What the loop observes: one view model's controller and streams.
struct Feed {
    controller: RefreshController<SummaryRepository<StatsClient>>,
    summary: Subscription<SummaryData>,
    chart: Subscription<Vec<PieEntry>>,
}

pub async fn handle(ctx: &Context<'_>, args: WatchArgs) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    // Each view model stays alive for the whole loop.
    let result = if args.global {
        let vm = ctx.tracker.global_view_model();
        let feed = Feed {
            controller: vm.controller().clone(),
            summary: vm.summary(),
            chart: vm.pie_chart_data(),
        };
        run_loop(ctx, feed, "Worldwide", &args, &cancel).await
    } else {
        let vm = ctx.tracker.local_view_model();
        let region = vm.country().unwrap_or_default();
        let feed = Feed {
            controller: vm.controller().clone(),
            summary: vm.summary(),
            chart: vm.pie_chart_data(),
        };
        run_loop(ctx, feed, &region, &args, &cancel).await
    };

    ctrl_c.abort();
    result
}

async fn run_loop(
    ctx: &Context<'_>,
    mut feed: Feed,
    region: &str,
    args: &WatchArgs,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    let mut remaining = args.count;
    let mut shown: Option<Arc<Summary>> = None;

    info!(interval = args.interval, region, "watching");

    loop {
        if remaining == Some(0) {
            break;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // The first tick honours the cache; later ones are explicit refreshes.
        let force = ctx.global.force || shown.is_some();
        let handle = feed.controller.refresh(force);
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = handle.wait() => {}
        }
        remaining = remaining.map(|n| n.saturating_sub(1));

        if let Some(event) = feed.controller.consume_event() {
            output::print_fetch_event(event, ctx.color);
        }

        let current = feed.summary.latest().clone();
        if current != shown {
            debug!("summary changed");
            let chart = feed.chart.latest().clone();
            let view = SummaryView::new(region, current.as_deref(), chart);
            output::print_output(&output::render_summary(ctx.format, &view), ctx.global.quiet);
            shown = current;
        }
    }

    feed.controller.detach();
    Ok(())
}

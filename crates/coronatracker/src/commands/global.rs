//! Worldwide summary.

use crate::error::CliError;
use crate::output::{self, SummaryView};

use super::{Context, util};

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let vm = ctx.tracker.global_view_model();
    let handle = vm.refresh_global_summary(ctx.global.force);
    util::finish_refresh(vm.controller(), handle, "global").await?;

    let summary = vm.summary();
    let chart = vm.pie_chart_data();
    let view = SummaryView::new(
        "Worldwide",
        summary.current().as_deref(),
        chart.current().clone(),
    );
    output::print_output(&output::render_summary(ctx.format, &view), ctx.global.quiet);
    Ok(())
}

//! Per-country summary.

use crate::cli::LocalArgs;
use crate::error::CliError;
use crate::output::{self, SummaryView};

use super::{Context, util};

pub async fn handle(ctx: &Context<'_>, args: LocalArgs) -> Result<(), CliError> {
    let country = match args.country {
        Some(query) if args.lookup => Some(lookup(ctx, &query).await?),
        other => other,
    };

    let vm = ctx.tracker.local_view_model();
    let handle = match country {
        Some(ref name) => vm.select_country(name)?,
        None => None,
    }
    .unwrap_or_else(|| vm.refresh_local_summary(ctx.global.force));
    util::finish_refresh(vm.controller(), handle, "local").await?;

    let region = vm.country().unwrap_or_default();
    let summary = vm.summary();
    let chart = vm.pie_chart_data();
    let view = SummaryView::new(
        region,
        summary.current().as_deref(),
        chart.current().clone(),
    );
    output::print_output(&output::render_summary(ctx.format, &view), ctx.global.quiet);
    Ok(())
}

/// Resolve an ISO code or loosely typed name to the API's country name.
async fn lookup(ctx: &Context<'_>, query: &str) -> Result<String, CliError> {
    let vm = ctx.tracker.countries_view_model();
    let handle = vm.refresh_countries(ctx.global.force);
    util::finish_refresh(vm.controller(), handle, "countries").await?;

    ctx.tracker
        .store()
        .resolve_country(query)
        .map(|country| country.name.clone())
        .ok_or_else(|| CliError::CountryNotFound {
            query: query.into(),
        })
}

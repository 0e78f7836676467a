//! Country list.

use coronatracker_core::Country;

use crate::cli::CountriesArgs;
use crate::error::CliError;
use crate::output::{self, CountryRow};

use super::{Context, util};

pub async fn handle(ctx: &Context<'_>, args: CountriesArgs) -> Result<(), CliError> {
    let vm = ctx.tracker.countries_view_model();
    let handle = vm.refresh_countries(ctx.global.force);
    util::finish_refresh(vm.controller(), handle, "countries").await?;

    let store = ctx.tracker.store();
    let countries: Vec<Country> = match args.query {
        Some(query) => {
            let country = store
                .resolve_country(&query)
                .ok_or(CliError::CountryNotFound { query })?;
            vec![country.as_ref().clone()]
        }
        // Listed in the order the API returned them.
        None => vm
            .countries()
            .current()
            .iter()
            .map(|name| {
                store.resolve_country(name).map_or_else(
                    || Country {
                        name: name.clone(),
                        iso2: None,
                        iso3: None,
                    },
                    |c| c.as_ref().clone(),
                )
            })
            .collect(),
    };

    let out = output::render_list(ctx.format, &countries, |c| CountryRow::from(c), |c| c.name.clone());
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

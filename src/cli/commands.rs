use crate::cli::args::{Cli, Commands, QueryArgs};
use crate::client::CatalogClient;
use crate::config::ClientConfig;
use crate::models::{CatalogTable, Coordinate, RowView};
use crate::processors::{matches_all, BatchDownloader, Condition};
use crate::utils::coordinates::{decimal_to_sexagesimal, parse_dec, parse_ra};
use crate::utils::filename::generate_default_catalog_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{write_summary_json, CatalogWriter};
use anyhow::{bail, Context, Result};
use tracing::warn;
use validator::Validate;

pub async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Search {
            query,
            output,
            save,
            sample,
        } => {
            let (client, conditions) = prepare(&query, config)?;
            println!("Searching PTF images at {}", describe_position(client.coordinate()));

            let progress = ProgressReporter::new_spinner("Querying catalog...", false);
            let table = client.catalog().await.context("Catalog search failed")?;
            progress.finish_with_message(&format!("Found {} images", table.num_rows()));

            let table = if conditions.is_empty() {
                table
            } else {
                let filtered = table.filter(|row| matches_all(&conditions, row));
                println!("{} of {} rows match the filter", filtered.num_rows(), table.num_rows());
                filtered
            };

            print_catalog(&table, sample);

            let output = match (output, save) {
                (Some(path), _) => Some(path),
                (None, true) => Some(generate_default_catalog_filename()),
                (None, false) => None,
            };

            if let Some(path) = output {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                CatalogWriter::new()
                    .write_catalog(&table, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Catalog written to {}", path.display());
            }
        }

        Commands::Urls { query } => {
            let (client, conditions) = prepare(&query, config)?;
            let predicate = |row: &RowView<'_>| matches_all(&conditions, row);

            let urls = client
                .image_urls(Some(&predicate))
                .await
                .context("Failed to derive image URLs")?;

            for url in urls.ancillary.iter().chain(urls.processed.iter()) {
                println!("{}", url);
            }
        }

        Commands::Download {
            query,
            output_dir,
            summary,
            quiet,
        } => {
            let (client, conditions) = prepare(&query, config)?;
            let predicate = |row: &RowView<'_>| matches_all(&conditions, row);

            if !quiet {
                println!("Downloading PTF images at {}", describe_position(client.coordinate()));
                println!("Output directory: {}", output_dir.display());
            }

            let progress = ProgressReporter::new_spinner("Querying catalog...", quiet);
            let results = BatchDownloader::new(&client)
                .download_all(&output_dir, Some(&predicate), Some(&progress))
                .await
                .context("Batch download failed")?;

            let failed = results.iter().filter(|r| !r.is_success()).count();
            progress.finish_with_message(&format!(
                "Downloaded {} of {} files",
                results.len() - failed,
                results.len()
            ));

            if let Some(path) = summary {
                write_summary_json(&results, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Summary written to {}", path.display());
            }

            if results.is_empty() {
                println!("No images matched");
            } else if failed == 0 {
                println!("✅ All {} files downloaded", results.len());
            } else {
                for result in results.iter().filter(|r| !r.is_success()) {
                    println!("{}", result.summary());
                }
                bail!("{} of {} downloads failed", failed, results.len());
            }
        }
    }

    Ok(())
}

fn prepare(query: &QueryArgs, config: ClientConfig) -> Result<(CatalogClient, Vec<Condition>)> {
    let ra = parse_ra(&query.ra).with_context(|| format!("Invalid --ra '{}'", query.ra))?;
    let dec = parse_dec(&query.dec).with_context(|| format!("Invalid --dec '{}'", query.dec))?;
    let coordinate = Coordinate::new(ra, dec);

    if let Err(e) = coordinate.validate() {
        warn!(coordinate = %coordinate, error = %e, "Coordinate outside the usual range, querying anyway");
    }

    let conditions = query
        .filters
        .iter()
        .map(|f| f.parse::<Condition>())
        .collect::<crate::error::Result<Vec<_>>>()?;

    let client = CatalogClient::with_config(coordinate, config)?;
    Ok((client, conditions))
}

fn describe_position(coordinate: Coordinate) -> String {
    format!(
        "{} [{} / {}]",
        coordinate,
        decimal_to_sexagesimal(coordinate.ra / 15.0),
        decimal_to_sexagesimal(coordinate.dec)
    )
}

fn print_catalog(table: &CatalogTable, sample: usize) {
    println!("\nColumns ({}):", table.num_columns());
    for column in table.columns() {
        let unit = column.unit.as_deref().map(|u| format!(" [{}]", u)).unwrap_or_default();
        println!("  {:<20} {}{}", column.name, column.column_type(), unit);
    }

    if sample > 0 && !table.is_empty() {
        println!("\nSample rows (showing {} of {}):", sample.min(table.num_rows()), table.num_rows());
        for row in table.rows().take(sample) {
            let fields: Vec<String> = table
                .columns()
                .iter()
                .map(|c| row.get(&c.name).map(|cell| cell.to_string()).unwrap_or_default())
                .collect();
            println!("{}. {}", row.index() + 1, fields.join(" | "));
        }
    }
}

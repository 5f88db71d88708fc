use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod analytics;
mod detail;
mod enrich;
mod error;
mod filter;
mod ingest;
mod models;
mod predict;
mod report;

use error::PipelineError;
use filter::FilterCriteria;
use models::EnrichedRecord;

#[derive(Parser)]
#[command(name = "sales-analytics")]
#[command(about = "Prediction-backed analytics for pharmaceutical sales data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable filter values found in a dataset
    Dimensions {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Score a dataset and print its KPIs and monthly series
    Summary {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        product_class: Option<String>,
        #[arg(long)]
        sales_team: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Score a dataset and print the chronologically sorted detail view
    Detail {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        product_class: Option<String>,
        #[arg(long)]
        sales_team: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Score a dataset and write a markdown report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        product_class: Option<String>,
        #[arg(long)]
        sales_team: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dimensions { csv, json } => {
            let submission = ingest::load_submission(&csv)?;
            let values = filter::dimension_values(&submission.records);
            if json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                println!("Countries: {}", values.countries.join(", "));
                println!("Channels: {}", values.channels.join(", "));
                println!("Product classes: {}", values.product_classes.join(", "));
                println!("Sales teams: {}", values.sales_teams.join(", "));
            }
        }
        Commands::Summary {
            csv,
            country,
            channel,
            product_class,
            sales_team,
            json,
        } => {
            let criteria =
                FilterCriteria::from_selections(country, channel, product_class, sales_team);
            let filtered = run_pipeline(&csv, &criteria).await?;
            match analytics::summarize(&filtered) {
                Ok(summary) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        let kpis = &summary.kpis;
                        println!("Total predicted sales: ${:.0}", kpis.total_predicted_sales);
                        println!("Average monthly sales: ${:.0}", kpis.average_monthly_sales);
                        println!(
                            "Top distributor: {} (${:.0} in sales)",
                            kpis.top_distributor.name, kpis.top_distributor.total
                        );
                        println!(
                            "Best-selling product: {} (${:.0} in sales)",
                            kpis.top_product.name, kpis.top_product.total
                        );
                        println!("Predicted monthly sales:");
                        for point in &summary.series {
                            println!("- {}: ${:.0}", point.month_year, point.predicted_sales);
                        }
                    }
                }
                Err(PipelineError::NoData) => {
                    println!("No records match the current filter.");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Detail {
            csv,
            country,
            channel,
            product_class,
            sales_team,
            limit,
            json,
        } => {
            let criteria =
                FilterCriteria::from_selections(country, channel, product_class, sales_team);
            let filtered = run_pipeline(&csv, &criteria).await?;
            let rows = detail::project(&filtered)?;
            if json {
                let shown: Vec<_> = rows.iter().take(limit).collect();
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else if rows.is_empty() {
                println!("No records match the current filter.");
            } else {
                for row in rows.iter().take(limit) {
                    println!(
                        "{} | {} | {} | {} | {} | {} | {} | qty {:.0} | price {:.2} | predicted {:.2}",
                        row.month_year,
                        row.distributor,
                        row.customer_name,
                        row.country,
                        row.channel,
                        row.product_name,
                        row.product_class,
                        row.quantity,
                        row.price,
                        row.predicted_sales
                    );
                }
                if rows.len() > limit {
                    println!("({} more rows not shown)", rows.len() - limit);
                }
            }
        }
        Commands::Report {
            csv,
            country,
            channel,
            product_class,
            sales_team,
            out,
        } => {
            let criteria =
                FilterCriteria::from_selections(country, channel, product_class, sales_team);
            let filtered = run_pipeline(&csv, &criteria).await?;
            let report = report::build_report(&criteria, &filtered)?;
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Load one submission, score it, enrich it, and filter it. Re-filtering an
/// already enriched dataset never goes back to the scoring service; callers
/// holding the enriched vec re-run `filter::apply` directly.
async fn run_pipeline(csv: &Path, criteria: &FilterCriteria) -> anyhow::Result<Vec<EnrichedRecord>> {
    let base_url = std::env::var("PREDICTION_URL")
        .context("PREDICTION_URL must be set to the scoring service base URL")?;

    let submission = ingest::load_submission(csv)?;
    let client = predict::PredictionClient::new(&base_url)?;
    let predictions = client.predict(&submission).await?;
    let enriched = enrich::merge(submission.records, predictions)?;
    Ok(filter::apply(&enriched, criteria))
}

use std::{env::current_dir, fs::write, path::PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use gdf_core::{
    boyens,
    churchdesk_client::{ChurchDeskClient, Organization},
    spreadsheet,
};
use tracing_subscriber::EnvFilter;

static OUTPUT_FILE: &str = "gottesdienste_formatiert.txt";
static PREVIEW_LINES: usize = 20;

#[derive(Debug, Parser)]
#[command(about = "Formats church-service schedules into the Boyens Medien bulletin format")]
pub struct Arguments {
    /// CSV export of the schedule table
    pub file: Option<PathBuf>,
    /// fetch this year from ChurchDesk instead of reading a file
    #[arg(long, requires = "month")]
    pub year: Option<i32>,
    /// fetch this month (1-12) from ChurchDesk instead of reading a file
    #[arg(long, requires = "year")]
    pub month: Option<u32>,
    /// enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "gdf=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    init_logger(args.verbose);
    dotenvy::dotenv().ok();

    let records = if let Some(file) = &args.file {
        spreadsheet::read_file(file)?
    } else if let (Some(year), Some(month)) = (args.year, args.month) {
        let organizations = Organization::from_env()?;
        ChurchDeskClient::new()
            .get_monthly_records(&organizations, year, month)
            .await?
    } else {
        bail!("either a CSV file or --year and --month must be given");
    };

    let groups = boyens::day_groups(&records);
    let line_count: usize = groups.iter().map(|group| group.lines.len()).sum();
    let bulletin = boyens::format_bulletin(&records);

    let mut path = current_dir()?;
    path.push(OUTPUT_FILE);
    write(&path, &bulletin)?;
    tracing::info!(
        records = line_count,
        days = groups.len(),
        path = %path.display(),
        "bulletin written"
    );

    for line in bulletin.lines().take(PREVIEW_LINES) {
        println!("{line}");
    }
    let remaining = bulletin.lines().count().saturating_sub(PREVIEW_LINES);
    if remaining > 0 {
        println!("... ({remaining} weitere Zeilen in {OUTPUT_FILE})");
    }
    Ok(())
}

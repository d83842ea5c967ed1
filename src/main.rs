//! Binary entry point: resolve settings, start file logging, open the chosen
//! store, and drive the Ratatui event loop until the user exits.
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lead_tracker::config::DATA_DIR_ENV;
use lead_tracker::{ensure_schema, logging, run_app, App, Settings, Snapshot, StockApp, StockStore};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lead-tracker", version, about = "Terminal lead and inventory tracker")]
struct Cli {
    /// Directory holding the database, stock file, exports, and logs.
    #[arg(long, env = DATA_DIR_ENV, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    variant: Option<Variant>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    /// Real-estate leads in SQLite (default).
    Leads,
    /// Stock items in a CSV file.
    Stock,
}

/// Fatal setup problems (an unwritable data directory, a corrupt database)
/// surface here as an `anyhow` error instead of a half-drawn terminal.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.data_dir)?;
    let _log_guard = logging::init(&settings.log_dir())?;

    match cli.variant.unwrap_or(Variant::Leads) {
        Variant::Leads => {
            let conn = ensure_schema(&settings.db_path())
                .with_context(|| format!("failed to open {}", settings.db_path().display()))?;
            let snapshot = Snapshot::load(&conn).context("failed to load leads")?;
            info!(leads = snapshot.len(), "lead tracker started");

            let mut app = App::new(conn, snapshot, settings);
            run_app(&mut app)
        }
        Variant::Stock => {
            let mut app = StockApp::new(StockStore::new(settings.stock_path()))?;
            info!(items = app.items().len(), "inventory started");
            run_app(&mut app)
        }
    }
}

//! POS Bridge CLI - Operator tools for a configured POS integration.
//!
//! # Usage
//!
//! ```bash
//! # Check credentials and reachability
//! pos-cli test-connection
//!
//! # Pull every category once and report counts
//! pos-cli sync
//!
//! # Daily sales report for the last week
//! pos-cli sales --period day
//!
//! # Try everything against the seeded mock
//! pos-cli --provider mock orders --status completed --limit 5
//! ```
//!
//! # Commands
//!
//! - `test-connection` - Connect and measure vendor latency
//! - `sync` - Fetch menu, inventory, employees, orders and transactions
//! - `sales` - Aggregate sales over a time window
//! - `menu` - List menu items
//! - `orders` - List orders
//! - `inventory-alerts` - List items at or below their alert level
//! - `validate-config` - Validate the environment configuration without I/O
//!
//! Configuration is read from `POS_*` environment variables, after loading
//! `.env` if present. Results are printed to stdout as JSON envelopes; logs go
//! to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pos_bridge_core::{OrderStatus, PosProvider, ReportPeriod};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pos-cli")]
#[command(author, version, about = "POS Bridge operator tools")]
struct Cli {
    /// Provider override (`square`, `toast`, `mock`); defaults to `POS_PROVIDER`
    #[arg(short, long, global = true)]
    provider: Option<PosProvider>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "POS_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and measure vendor latency
    TestConnection,
    /// Fetch every data category once and report counts
    Sync,
    /// Aggregate sales over a time window
    Sales {
        /// Window start (RFC 3339); defaults to seven days before the end
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// Window end (RFC 3339); defaults to now
        #[arg(long)]
        end: Option<DateTime<Utc>>,

        /// Bucket size (`hour`, `day`, `week`, `month`)
        #[arg(long, default_value = "day")]
        period: ReportPeriod,
    },
    /// List menu items
    Menu {
        /// Only items that can currently be sold
        #[arg(long)]
        available: bool,
    },
    /// List orders
    Orders {
        /// Only orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,

        /// Maximum number of orders
        #[arg(short, long, default_value_t = pos_bridge_core::DEFAULT_LIMIT)]
        limit: usize,
    },
    /// List inventory items at or below their alert level
    InventoryAlerts,
    /// Validate configuration without contacting the vendor
    ValidateConfig,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let provider = cli.provider;
    let adapter = || commands::load_adapter(provider);
    match cli.command {
        Commands::ValidateConfig => commands::config::validate(provider),
        Commands::TestConnection => commands::connection::test(&adapter()?).await,
        Commands::Sync => commands::connection::sync(&adapter()?).await,
        Commands::Sales { start, end, period } => {
            commands::reports::sales(&adapter()?, start, end, period).await
        }
        Commands::Menu { available } => commands::listings::menu(&adapter()?, available).await,
        Commands::Orders { status, limit } => {
            commands::listings::orders(&adapter()?, status, limit).await
        }
        Commands::InventoryAlerts => commands::listings::inventory_alerts(&adapter()?).await,
    }
}

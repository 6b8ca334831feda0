use std::path::{Path, PathBuf};

use clap::Parser;
use slit_planner::config::{PlannerConfig, RollCatalog};
use slit_planner::{loader, planner, report};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(
    name = "slit_planner",
    about = "Plans two-order co-production slits of standard material rolls"
)]
struct Cli {
    /// Order file, one order per line: name... blank_type width length material count
    #[arg(long, default_value = "data.txt")]
    orders: PathBuf,

    /// Allowed quantity deviation in percent; acceptance ceiling is 4x this
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_ALLOWED_DEVIATION_PERCENT)]
    deviation: f64,

    /// Largest acceptable trim in mm
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_MAX_TRIM)]
    max_trim: u32,

    /// Smallest acceptable trim margin in mm
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_MIN_TRIM)]
    min_trim: u32,

    /// Cap on the combined lane count of both orders
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_MAX_LANES)]
    max_lanes: u32,

    /// Orders below this requested quantity are dropped
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_MIN_ORDER_COUNT)]
    min_count: u32,

    /// Roll width catalog as ascending comma-separated mm values
    #[arg(long, value_parser = parse_catalog)]
    catalog: Option<RollCatalog>,

    /// Durable diagnostic log, appended to on every run
    #[arg(long, default_value = "slit_planner.log")]
    log_file: PathBuf,
}

fn parse_catalog(s: &str) -> Result<RollCatalog, String> {
    let widths = s
        .split(',')
        .map(|w| {
            w.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid roll width '{}'", w.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    RollCatalog::new(widths).map_err(|e| e.to_string())
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(false),
        )
        .init();
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_file) {
        eprintln!("Error: cannot open log file {}: {}", cli.log_file.display(), e);
        std::process::exit(1);
    }

    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    // The catalog type can only be constructed validated, so an unsorted
    // --catalog has already been rejected at argument parsing.
    let config = PlannerConfig {
        allowed_deviation_percent: cli.deviation,
        max_trim: cli.max_trim,
        min_trim: cli.min_trim,
        max_lanes: cli.max_lanes,
        min_order_count: cli.min_count,
        catalog: cli.catalog.unwrap_or_default(),
        ..PlannerConfig::default()
    };

    tracing::info!("planner started");
    println!("\nConfiguration:");
    println!("Allowed deviation: ±{}%", config.allowed_deviation_percent);
    println!("Max trim: {}mm", config.max_trim);
    println!("Min trim: {}mm", config.min_trim);
    println!("Max lanes: {}", config.max_lanes);
    println!("Min order count: {}", config.min_order_count);
    println!("Roll widths: {:?}", config.catalog.widths());

    let outcome = match loader::load_orders_from_path(&cli.orders, config.min_order_count) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("cannot read order file {}: {}", cli.orders.display(), e);
            return 1;
        }
    };

    for skipped in &outcome.skipped {
        tracing::warn!(
            line = skipped.line_number,
            reason = %skipped.reason,
            "skipped order line: {}",
            skipped.content
        );
    }

    if outcome.orders.is_empty() {
        tracing::error!("order file is empty or contains no usable orders");
        return 0;
    }

    println!("\nLoaded orders:");
    for (i, order) in outcome.orders.iter().enumerate() {
        println!(
            "{}. {}, {} pcs, material: {}",
            i + 1,
            order,
            order.count,
            order.material
        );
    }

    let candidates = planner::plan(&outcome.orders, &config);
    tracing::info!(
        orders = outcome.orders.len(),
        candidates = candidates.len(),
        "search finished"
    );

    println!();
    print!("{}", report::render_report(&candidates, &config));

    tracing::info!("planner finished");
    0
}

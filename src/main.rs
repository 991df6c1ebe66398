use clap::{Parser, Subcommand};
use pourover::config::AppConfig;
use pourover::error::{Error, Result};
use pourover::pipeline::{self, AnalysisReport};
use pourover::square::{fetch_all_orders, order_for_payment, SquareApi, SquareClient};
use pourover::{export, flatten};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Square point-of-sale basket and time-of-day analytics
#[derive(Parser)]
#[command(name = "pourover")]
#[command(about = "Pull Square orders and analyze what sells together, and when", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all orders for a location and write the transaction table
    Pull {
        /// Location to fetch orders for (default: SQUARE_LOCATION_ID)
        #[arg(long)]
        location_id: Option<String>,

        /// Start of the created-at filter, RFC 3339 (requires --end)
        #[arg(long)]
        begin: Option<String>,

        /// End of the created-at filter, RFC 3339 (requires --begin)
        #[arg(long)]
        end: Option<String>,

        /// Output path for the transaction table
        #[arg(short, long, default_value = "orders.csv")]
        output: PathBuf,

        /// Run the analysis immediately after fetching
        #[arg(long)]
        analyze: bool,

        /// Directory for the analysis report tables
        #[arg(long, default_value = "reports")]
        report_dir: PathBuf,

        /// Anchor item put first in displayed pairs (default: POUROVER_ANCHOR_ITEM)
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Analyze a previously written transaction table
    Analyze {
        /// Transaction table to read
        #[arg(short, long, default_value = "orders.csv")]
        input: PathBuf,

        /// Directory for the analysis report tables
        #[arg(long, default_value = "reports")]
        report_dir: PathBuf,

        /// Anchor item put first in displayed pairs (default: POUROVER_ANCHOR_ITEM)
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Show the line items of the order behind a payment
    Payment {
        /// Payment id to look up
        payment_id: String,
    },
    /// List the most recent payments
    Payments {
        /// Maximum number of payments to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
    /// List customer profiles
    Customers {
        /// Maximum number of customers to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("Pourover started with verbosity level: {}", cli.verbose);

    let result = run(cli.command).await;

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = AppConfig::from_env()?;

    match command {
        Commands::Pull {
            location_id,
            begin,
            end,
            output,
            analyze,
            report_dir,
            anchor,
        } => {
            let location_id = location_id
                .or_else(|| config.location_id.clone())
                .ok_or_else(|| {
                    Error::Config(
                        "location id is required (--location-id or SQUARE_LOCATION_ID)".to_string(),
                    )
                })?;
            let begin = begin.or_else(|| config.begin_time.clone());
            let end = end.or_else(|| config.end_time.clone());
            let anchor = anchor.unwrap_or_else(|| config.anchor_item.clone());

            let client = SquareClient::new(&config.api_base, config.require_access_token()?)?;
            let orders =
                fetch_all_orders(&client, &location_id, begin.as_deref(), end.as_deref()).await?;
            info!(orders = orders.len(), location = %location_id, "Fetched orders");

            if analyze {
                let (rows, report) = pipeline::analyze_orders(&orders, &anchor, config.timezone);
                export::write_rows(&output, &rows)?;
                pipeline::write_report(&report_dir, &report)?;
                print_top_pairs(&report, 10);
            } else {
                let rows = flatten::to_flat_rows(&orders);
                export::write_rows(&output, &rows)?;
            }
            Ok(())
        }
        Commands::Analyze {
            input,
            report_dir,
            anchor,
        } => {
            let anchor = anchor.unwrap_or_else(|| config.anchor_item.clone());
            let rows = export::read_rows(&input)?;
            info!(rows = rows.len(), input = %input.display(), "Read transaction table");

            let report = pipeline::analyze_rows(&rows, &anchor, config.timezone);
            pipeline::write_report(&report_dir, &report)?;
            print_top_pairs(&report, 10);
            Ok(())
        }
        Commands::Payment { payment_id } => {
            let client = SquareClient::new(&config.api_base, config.require_access_token()?)?;
            let order = order_for_payment(&client, &payment_id).await?;
            for item in &order.line_items {
                println!(
                    "Item Name: {}, Variation: {}, Quantity: {}",
                    item.name,
                    item.variation_name.as_deref().unwrap_or("-"),
                    item.parsed_quantity()
                );
            }
            Ok(())
        }
        Commands::Payments { limit } => {
            let client = SquareClient::new(&config.api_base, config.require_access_token()?)?;
            let response = client.list_payments().await?;
            for payment in response.payments.iter().take(limit) {
                let amount = payment
                    .amount_money
                    .as_ref()
                    .map(|m| m.to_major_units())
                    .unwrap_or(0.0);
                let currency = payment
                    .amount_money
                    .as_ref()
                    .and_then(|m| m.currency.as_deref())
                    .unwrap_or("USD");
                println!(
                    "Payment ID: {}, Amount: {:.2} {}, Status: {}",
                    payment.id,
                    amount,
                    currency,
                    payment.status.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        Commands::Customers { limit } => {
            let client = SquareClient::new(&config.api_base, config.require_access_token()?)?;
            let response = client.list_customers().await?;
            for customer in response.customers.iter().take(limit) {
                println!("Customer ID: {}, Name: {}", customer.id, customer.display_name());
            }
            Ok(())
        }
    }
}

fn print_top_pairs(report: &AnalysisReport, limit: usize) {
    if report.pairs.is_empty() {
        println!("No item pairs found");
        return;
    }
    println!("Top item pairs:");
    for pc in report.pairs.iter().take(limit) {
        println!("{:>6}  {} + {}", pc.count, pc.pair.first, pc.pair.second);
    }
}

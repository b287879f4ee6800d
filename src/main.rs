use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table as ConsoleTable};
use console::style;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pricectl::config::{self, Config};
use pricectl::error::PricectlError;
use pricectl::exit_codes::exit_code_for_anyhow;
use pricectl::interrupt::Interrupt;
use pricectl::inventory::read_inventory;
use pricectl::pricing::{AwsPricingClient, LookupParams};
use pricectl::quote::{print_run_summary, run_quote};
use pricectl::{regions, report, storage};

#[derive(Parser)]
#[command(name = "pricectl")]
#[command(
    about = "On-demand AWS pricing for EC2 inventories",
    long_about = "pricectl prices an EC2 instance inventory against the AWS Price List API.\n\nReads a CSV or spreadsheet with an inst_type column (and optional count and\nenvironment columns), looks up the on-demand hourly price of every row and\nwrites the inventory back with hourly, monthly and total costs plus\nper-environment subtotals."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct AwsArgs {
    /// Region code to price, e.g. eu-west-1
    #[arg(short, long)]
    region: Option<String>,
    /// AWS profile used to reach the Price List API
    #[arg(short, long, env = "AWS_PROFILE")]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an instance inventory
    Quote {
        /// Inventory file (.csv, .xlsx, .xls, .xlsm, .ods)
        #[arg(short, long)]
        input: PathBuf,
        /// Report file (.csv or .xlsx); prints a console table when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        aws: AwsArgs,
        /// Operating system filter (Linux, Windows, RHEL, SUSE)
        #[arg(long = "os")]
        operating_system: Option<String>,
        /// Tenancy filter (Shared, Dedicated, Host)
        #[arg(short, long)]
        tenancy: Option<String>,
    },
    /// Show S3 storage price tiers for a region
    Storage {
        #[command(flatten)]
        aws: AwsArgs,
        /// S3 volume type, e.g. Standard
        #[arg(long)]
        volume_type: Option<String>,
    },
    /// List known region codes
    Regions,
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".pricectl.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Only warnings and errors unless --verbose
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(exit_code_for_anyhow(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Quote {
            input,
            output,
            aws,
            operating_system,
            tenancy,
        } => {
            let params = QuoteParams {
                input,
                output,
                region: aws.region.unwrap_or_else(|| config.aws.region.clone()),
                profile: aws.profile.or_else(|| config.aws.profile.clone()),
                operating_system: operating_system
                    .unwrap_or_else(|| config.quote.operating_system.clone()),
                tenancy: tenancy.unwrap_or_else(|| config.quote.tenancy.clone()),
            };
            quote(params, &config).await?;
        }
        Commands::Storage { aws, volume_type } => {
            let region = regions::resolve(&aws.region.unwrap_or_else(|| config.aws.region.clone()));
            let profile = aws.profile.or_else(|| config.aws.profile.clone());
            let volume_type =
                volume_type.unwrap_or_else(|| config.quote.storage_volume_type.clone());

            let client =
                AwsPricingClient::connect(profile.as_deref(), &config.aws.pricing_endpoint).await?;
            storage::show_storage_prices(
                &client,
                &region.name,
                &volume_type,
                &config.quote.currency,
                config.quote.max_results,
            )
            .await
            .with_context(|| format!("Failed to fetch S3 storage prices for {}", region.code))?;
        }
        Commands::Regions => {
            let mut table = ConsoleTable::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Code", "Location"]);
            for (code, name) in regions::known_regions() {
                table.add_row(vec![code, name]);
            }
            println!("{}", table);
        }
        Commands::Init { output } => {
            config::init_config(&output)?;
        }
    }

    Ok(())
}

struct QuoteParams {
    input: PathBuf,
    output: Option<PathBuf>,
    region: String,
    profile: Option<String>,
    operating_system: String,
    tenancy: String,
}

async fn quote(params: QuoteParams, config: &Config) -> Result<()> {
    // Fail on a bad destination before spending any API calls
    if let Some(output) = &params.output {
        report::check_destination(output)?;
    }

    let table = read_inventory(&params.input)?;
    info!(
        "Loaded {} rows from {}",
        table.len(),
        params.input.display()
    );

    let client =
        AwsPricingClient::connect(params.profile.as_deref(), &config.aws.pricing_endpoint).await?;

    let region = regions::resolve(&params.region);
    let lookup = LookupParams {
        location: region.name.clone(),
        operating_system: params.operating_system,
        tenancy: params.tenancy,
        currency: config.quote.currency.clone(),
        max_results: config.quote.max_results,
    };
    debug!("Lookup parameters: {:?}", lookup);

    let interrupt = Interrupt::new();
    interrupt.listen();

    let run = tokio::select! {
        run = run_quote(&client, table, &lookup) => run?,
        _ = interrupt.cancelled() => {
            return Err(PricectlError::Interrupted.into());
        }
    };

    print_run_summary(&run);
    // Ctrl-C after pricing still ends the run; the report write is atomic
    interrupt.check()?;

    let written = match &params.output {
        Some(output) => {
            let ok = report::write_report(&run.table, run.totals.as_ref(), output);
            if ok {
                println!("\nResults saved to {}", output.display());
            } else {
                println!("\nShowing results in the console instead:");
            }
            ok
        }
        None => false,
    };
    interrupt.check()?;
    if !written {
        println!("{}", report::console_summary(&run.table));
    }

    println!("\n{}", style("Done!").green().bold());
    Ok(())
}

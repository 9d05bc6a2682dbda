//! # Catalog Console CLI
//!
//! Drives a [`CatalogConsole`] from the command line, one operation per run.
//!
//! ## 🚀 Commands
//!
//! - **list**: Show every product
//! - **search**: Filter by name, color, price range, or any attribute path
//! - **show**: Print one product in full
//! - **create** / **update**: Submit a product form
//! - **delete**: Remove a product after confirmation
//!
//! Settings come from `CATALOG_API_URL` / `CATALOG_API_TIMEOUT_SECS`;
//! `--base-url` and `--timeout-secs` override them.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Instrument};

use catalog_console::codec::AttributePayloadCodec;
use catalog_console::config::ConsoleConfig;
use catalog_console::gateway::{CatalogGateway, HttpCatalogGateway};
use catalog_console::model::{
    AdvancedFilter, Product, ProductId, COLOR_FIELD, NAME_FIELD, PRICE_MAX_FIELD, PRICE_MIN_FIELD,
};
use catalog_console::runtime::{setup_tracing, CatalogConsole};
use catalog_console::search::SearchPredicateBuilder;
use catalog_console::session::{DeleteOutcome, ProductForm};

#[derive(Debug, Parser)]
#[command(name = "catalog-console", version, about = "Browse and edit a remote product catalog")]
struct Cli {
    /// Catalog service base URL [default: $CATALOG_API_URL or http://localhost:8000]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds [default: $CATALOG_API_TIMEOUT_SECS or none]
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every product
    List,
    /// Search products
    Search(SearchArgs),
    /// Show one product
    Show { id: String },
    /// Create a product
    Create(CreateArgs),
    /// Update a product; omitted fields keep their current values
    Update(UpdateArgs),
    /// Delete a product
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    price_min: Option<String>,
    #[arg(long)]
    price_max: Option<String>,
    /// Attribute filter as `path=value`, e.g. `specs.size=M`
    #[arg(long, value_parser = parse_attr)]
    attr: Option<AdvancedFilter>,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: String,
    #[arg(long, default_value = "0")]
    quantity: String,
    /// Attributes as a JSON object
    #[arg(long, default_value = "{}")]
    attributes: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    /// Attributes as a JSON object; replaces the current attributes
    #[arg(long)]
    attributes: Option<String>,
}

fn parse_attr(raw: &str) -> Result<AdvancedFilter, String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(AdvancedFilter::new(key.trim(), value)),
        _ => Err(format!("expected path=value, got {raw:?}")),
    }
}

/// Asks on stdin; anything but `y`/`yes` declines.
fn prompt_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_table(products: &[Product]) {
    for product in products {
        println!(
            "{:>6}  {:<30}  {:>10}  {:>6}  {}",
            product.id, product.name, product.price, product.quantity, product.attributes
        );
    }
}

fn print_product(product: &Product) -> anyhow::Result<()> {
    let value = serde_json::to_value(product).context("Failed to render product")?;
    println!("{}", AttributePayloadCodec::serialize(&value));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = ConsoleConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let gateway = HttpCatalogGateway::new(&config).context("Failed to build HTTP client")?;

    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let confirm = move |prompt: &str| assume_yes || prompt_stdin(prompt);
    let console = CatalogConsole::new(gateway.clone(), confirm);

    let span = tracing::info_span!("console");
    let result = run(&console, &gateway, cli.command).instrument(span).await;
    console.shutdown().await?;
    result
}

async fn run<G: CatalogGateway>(console: &CatalogConsole, gateway: &G, command: Command) -> anyhow::Result<()> {
    let session = &console.session;
    match command {
        Command::List => {
            session.load_all().await?;
            print_table(&session.snapshot().await?.visible_products);
        }
        Command::Search(args) => {
            let fields = [
                (NAME_FIELD, args.name),
                (COLOR_FIELD, args.color),
                (PRICE_MIN_FIELD, args.price_min),
                (PRICE_MAX_FIELD, args.price_max),
            ]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)));
            let criteria = SearchPredicateBuilder::build(fields, args.attr.as_ref());

            let count = session.run_search(criteria).await?;
            print_table(&session.snapshot().await?.visible_products);
            info!(count, "Search complete");
        }
        Command::Show { id } => {
            let product = gateway.get(&ProductId::from(id)).await?;
            print_product(&product)?;
        }
        Command::Create(args) => {
            let mut form = session.begin_create().await?;
            form.name = args.name;
            form.price = args.price;
            form.quantity = args.quantity;
            form.attributes.set_text(args.attributes);
            submit(console, form).await?;
        }
        Command::Update(args) => {
            let mut form = session.begin_edit_by_id(ProductId::from(args.id)).await?;
            if let Some(name) = args.name {
                form.name = name;
            }
            if let Some(price) = args.price {
                form.price = price;
            }
            if let Some(quantity) = args.quantity {
                form.quantity = quantity;
            }
            if let Some(attributes) = args.attributes {
                form.attributes.set_text(attributes);
            }
            submit(console, form).await?;
        }
        Command::Delete { id, .. } => {
            let id = ProductId::from(id);
            match session.request_delete(id.clone()).await? {
                DeleteOutcome::Deleted => info!(%id, "Product deleted"),
                DeleteOutcome::Declined => println!("Delete of product {id} cancelled"),
            }
        }
    }
    Ok(())
}

async fn submit(console: &CatalogConsole, form: ProductForm) -> anyhow::Result<()> {
    let (_, result) = console.session.submit_form(form).await;
    let saved = result?;
    info!(id = %saved.id, "Product saved");
    print_product(&saved)
}

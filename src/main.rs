//! Spendy main entry point

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{info, warn};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use spendy_config::{Config, ConfigError, CurrencyConfig};
use spendy_core::{
    CoreError, DateRange, PageSize, SortField, SortOrder, Transaction, TransactionBook,
    TransactionFormData, TransactionType, VisibleRows,
};
use spendy_utils::{format_amount, generate_id, truncate_text};
use std::path::{Path, PathBuf};

/// Notes longer than this are cut in table output
const NOTES_PREVIEW_CHARS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "spendy")]
#[command(version = "0.1.0")]
#[command(about = "Query and edit a personal transaction ledger", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// JSON file with an array of transactions; overrides `data.path`
    #[arg(short, long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the filtered, sorted transactions
    List {
        #[command(flatten)]
        query: QueryArgs,
        /// Render as a text table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Print income and expense totals of the filtered transactions
    Summary {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Print the categories and tags available for filtering
    Facets,
    /// Add a transaction and print the first page
    Add(AddArgs),
    /// Print the default configuration file
    DefaultConfig,
}

#[derive(ClapArgs, Debug)]
struct QueryArgs {
    /// Case-insensitive text matched against name, category and tags
    #[arg(short, long)]
    search: Option<String>,
    /// Earliest transaction date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest transaction date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// name, transactionDate, type, category or amount
    #[arg(long)]
    sort_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    order: Option<String>,
    /// 25, 50 or 100
    #[arg(long)]
    page_size: Option<usize>,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: Decimal,
    /// income or expense
    #[arg(long = "type", default_value = "expense")]
    kind: String,
    #[arg(long)]
    category: String,
    #[arg(long, default_value = "")]
    account: String,
    /// Defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    notes: String,
    #[arg(long = "tag")]
    tags: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_missing) = if args.config.exists() {
        let config =
            Config::load(&args.config).map_err(|e| config_failure(&args.config, e))?;
        (config, false)
    } else {
        (Config::default(), true)
    };

    let filter = env_logger::Env::default().default_filter_or(config.logging.level.as_str());
    env_logger::Builder::from_env(filter).init();
    if config_missing {
        warn!("Config file {} not found, using defaults", args.config.display());
    }

    let mut book = TransactionBook::from_config(&config).map_err(core_failure)?;
    if let Some(path) = args.data.as_ref().or(config.data.path.as_ref()) {
        book.replace_all(load_transactions(path)?);
    }

    match args.command {
        Command::List { query, table } => {
            apply_query(&mut book, query)?;
            if table {
                print_table(&config, book.view());
            } else {
                println!("{}", serde_json::to_string_pretty(book.view())?);
            }
        }
        Command::Summary { query } => {
            apply_query(&mut book, query)?;
            let summary = book.summary();
            let currency = &config.currency;
            let net_income = !summary.net.is_sign_negative() || summary.net.is_zero();
            let output = json!({
                "summary": &summary,
                "formatted": {
                    "income": money(currency, summary.total_income, true),
                    "expense": money(currency, summary.total_expense, false),
                    "net": money(currency, summary.net, net_income),
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Facets => {
            let output = json!({
                "categories": book.available_categories(),
                "tags": book.available_tags(),
                "knownCategories": book.categories().names(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Add(add) => {
            let category = add.category.trim().to_string();
            book.register_category(&category);
            let form = TransactionFormData {
                name: add.name,
                amount: add.amount,
                account: add.account,
                kind: add.kind.parse::<TransactionType>().map_err(core_failure)?,
                category,
                transaction_date: add.date.unwrap_or_else(|| Utc::now().date_naive()),
                notes: add.notes,
                tags: add.tags,
            };
            let created = book
                .create(form, generate_id(), Utc::now())
                .map_err(core_failure)?;
            info!("Added transaction {}", created.summary());
            println!("{}", serde_json::to_string_pretty(book.view())?);
        }
        Command::DefaultConfig => print!("{}", Config::generate_default()),
    }

    Ok(())
}

fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    if !path.exists() {
        warn!("Data file not found: {}", path.display());
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<Transaction> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse transactions in {}", path.display()))?;
    info!("Loaded {} transactions from {}", records.len(), path.display());
    Ok(records)
}

fn apply_query(book: &mut TransactionBook, query: QueryArgs) -> Result<()> {
    if let Some(search) = query.search {
        book.set_search(search);
    }
    if query.from.is_some() || query.to.is_some() {
        book.set_date_range(DateRange::new(query.from, query.to))
            .map_err(core_failure)?;
    }
    if !query.categories.is_empty() {
        book.set_selected_categories(query.categories);
    }
    if !query.tags.is_empty() {
        book.set_selected_tags(query.tags);
    }
    if let Some(field) = query.sort_by {
        let field = field.parse::<SortField>().map_err(core_failure)?;
        book.set_sort_field(Some(field));
    }
    if let Some(order) = query.order {
        book.set_sort_order(order.parse::<SortOrder>().map_err(core_failure)?);
    }
    if let Some(size) = query.page_size {
        book.set_page_size(PageSize::try_from(size).map_err(core_failure)?);
    }
    if query.page > 0 {
        book.set_page(query.page);
    }
    Ok(())
}

/// Structured form of a rejected operation, printed on stderr
fn core_error_report(err: &CoreError) -> Value {
    json!({ "severity": err.severity(), "error": err.to_details() })
}

fn config_error_report(err: &ConfigError) -> Value {
    json!({ "severity": err.severity(), "error": err.to_details() })
}

fn core_failure(err: CoreError) -> anyhow::Error {
    eprintln!("{}", core_error_report(&err));
    err.into()
}

fn config_failure(path: &Path, err: ConfigError) -> anyhow::Error {
    eprintln!("{}", config_error_report(&err));
    anyhow::Error::new(err)
        .context(format!("Failed to load configuration from {}", path.display()))
}

fn money(currency: &CurrencyConfig, amount: Decimal, is_income: bool) -> String {
    format_amount(
        amount,
        is_income,
        &currency.symbol,
        currency.decimal_places,
        &currency.thousands_separator,
    )
}

fn print_table(config: &Config, view: &VisibleRows) {
    let currency = &config.currency;
    for tx in &view.rows {
        println!(
            "{}  {:<24} {:<18} {:>14}  {:<13} {}",
            tx.transaction_date,
            tx.name,
            tx.category,
            money(currency, tx.amount, tx.kind.is_income()),
            truncate_text(&tx.notes, NOTES_PREVIEW_CHARS),
            tx.tags.join(", ")
        );
    }
    println!("{} matched, {} page(s)", view.total_matched, view.page_count);
}

//! tally CLI: browse, summarize, and search a transaction ledger.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tally_rs::config::Config;
use tally_rs::llm::{
    AnthropicModel, CategorySuggester, FilterExtractor, LanguageModel, anthropic_client,
};
use tally_rs::model::Transaction;
use tally_rs::model::filter::{TransactionFilter, apply_filter};
use tally_rs::model::parse_iso_date;
use tally_rs::search::TransactionSearch;
use tally_rs::store::{MemoryStore, TransactionStore};
use tally_rs::summary::{Summary, category_breakdown};
use tally_rs::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "tally", about = "Personal finance ledger with natural-language search")]
struct Cli {
    /// TOML ledger to load. Uses the built-in demo data when omitted.
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List transactions, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Transactions per page
        #[arg(long, default_value_t = 15)]
        limit: usize,
    },
    /// Search with a natural-language query (calls the model)
    Search {
        /// e.g. "dining out last month" or "groceries over $50"
        query: String,
    },
    /// Filter with explicit criteria (no model call)
    Filter {
        /// Text to find in titles and notes
        #[arg(long)]
        text: Option<String>,
        /// Category, case-insensitive
        #[arg(long)]
        category: Option<String>,
        /// Minimum signed amount, inclusive
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,
        /// Maximum signed amount, inclusive
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,
        /// First day, YYYY-MM-DD
        #[arg(long, value_parser = parse_day)]
        from: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD
        #[arg(long, value_parser = parse_day)]
        to: Option<NaiveDate>,
    },
    /// Suggest categories for a transaction (calls the model)
    Suggest {
        title: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Income, expenses, and spending by category
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _guard = init_telemetry(TelemetryConfig::from_env("tally"))?;
    let store = open_store(cli.ledger.as_deref())?;

    match cli.command {
        Command::List { page, limit } => {
            let transactions = store.page(page, limit)?;
            render(&transactions, cli.json)
        }
        Command::Search { query } => cmd_search(&store, &query, cli.json).await,
        Command::Filter {
            text,
            category,
            min,
            max,
            from,
            to,
        } => {
            let filter = TransactionFilter {
                text_search: text,
                category,
                min_amount: min,
                max_amount: max,
                start_date: from,
                end_date: to,
            };
            let matched = apply_filter(&store.list()?, &filter);
            render(&matched, cli.json)
        }
        Command::Suggest { title, notes } => cmd_suggest(&title, notes.as_deref(), cli.json).await,
        Command::Summary => cmd_summary(&store, cli.json),
    }
}

fn open_store(ledger: Option<&Path>) -> anyhow::Result<MemoryStore> {
    Ok(match ledger {
        Some(path) => MemoryStore::from_ledger(path)?,
        None => MemoryStore::demo(),
    })
}

fn language_model(config: &Config) -> anyhow::Result<Arc<dyn LanguageModel>> {
    let client = anthropic_client(&config.anthropic_api_key)
        .map_err(|e| anyhow::anyhow!("failed to create Anthropic client: {e}"))?;
    Ok(Arc::new(AnthropicModel::new(client, &config.model)))
}

async fn cmd_search(store: &MemoryStore, query: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let extractor = FilterExtractor::new(language_model(&config)?).with_timeout(config.llm_timeout);
    let search = TransactionSearch::new(extractor);

    let result = search.search_detailed(query, &store.list()?).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "filter": result.filter,
                "transactions": result.transactions,
            }))?
        );
        return Ok(());
    }

    println!("Filter: {}", serde_json::to_string(&result.filter)?);
    println!();
    render(&result.transactions, false)
}

async fn cmd_suggest(title: &str, notes: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let suggester =
        CategorySuggester::new(language_model(&config)?).with_timeout(config.llm_timeout);

    let categories = suggester.suggest_categories(title, notes).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        for (rank, category) in categories.iter().enumerate() {
            println!("{}. {category}", rank + 1);
        }
    }
    Ok(())
}

fn cmd_summary(store: &MemoryStore, json: bool) -> anyhow::Result<()> {
    let transactions = store.list()?;
    let summary = Summary::of(&transactions);
    let breakdown = category_breakdown(&transactions);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "summary": summary,
                "categories": breakdown,
            }))?
        );
        return Ok(());
    }

    println!("Income:    {:>12.2}", summary.income);
    println!("Expenses:  {:>12.2}", summary.expenses);
    println!("Net:       {:>12.2}", summary.net);

    if !breakdown.is_empty() {
        println!();
        println!("{:<24}  {:>10}", "CATEGORY", "SPENT");
        println!("{}", "-".repeat(36));
        for entry in &breakdown {
            println!("{:<24}  {:>10.2}", entry.category, entry.total);
        }
    }
    Ok(())
}

fn render(transactions: &[Transaction], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(transactions)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<10}  {:<12}  {:<32}  {:<16}  {:>10}",
        "DATE", "ID", "TITLE", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(88));

    for t in transactions {
        println!(
            "{:<10}  {:<12}  {:<32}  {:<16}  {:>10.2}",
            t.date.day().format("%Y-%m-%d"),
            truncate(t.id.as_str(), 12),
            truncate(&t.title, 32),
            truncate(&t.category, 16),
            t.amount
        );
    }

    println!("\n{} transaction(s)", transactions.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    parse_iso_date("date", s).map_err(|e| e.to_string())
}

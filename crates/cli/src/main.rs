use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::FilterCriteria;
use rand::Rng;
use records::{DateLike, ListRecord, NumberLike, load_records};
use serde_json::json;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use worker::{ListProcessor, ProcessorClient, ProcessorConfig, RequestEnvelope};

/// listproc - Off-thread search, filter and sort for listing batches
#[derive(Parser)]
#[command(name = "listproc")]
#[command(about = "Search, filter and sort job and service listings on a background worker", long_about = None)]
struct Cli {
    /// Request timeout in milliseconds (waits forever when unset)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer JSON Lines request envelopes from stdin or a file
    Process {
        /// Read requests from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Search, filter and sort a listings file
    Search {
        /// JSON file holding an array of listings, or an object with a `data` or `posts` array
        #[arg(long)]
        records: PathBuf,

        /// Case-insensitive text to look for
        #[arg(long)]
        term: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        experience_level: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        budget_min: Option<String>,

        #[arg(long)]
        budget_max: Option<String>,

        /// One of date, budget, title, views
        #[arg(long)]
        sort_by: Option<String>,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        sort_order: String,

        /// Number of listings to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark against synthetic listings
    Benchmark {
        /// Listings per batch
        #[arg(long, default_value = "5000")]
        records: usize,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for responses
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ProcessorConfig::default();
    if let Some(ms) = cli.timeout_ms {
        config = config.with_request_timeout(Duration::from_millis(ms));
    }

    match cli.command {
        Commands::Process { input } => handle_process(config, input).await?,
        Commands::Search {
            records,
            term,
            category,
            experience_level,
            location,
            budget_min,
            budget_max,
            sort_by,
            sort_order,
            limit,
        } => {
            let mut criteria = FilterCriteria::default();
            if let Some(term) = &term {
                criteria = criteria.with_search_term(term);
            }
            if let Some(category) = &category {
                criteria = criteria.with_category(category);
            }
            if let Some(level) = &experience_level {
                criteria = criteria.with_experience_level(level);
            }
            if let Some(location) = &location {
                criteria = criteria.with_location(location);
            }
            if let Some(min) = budget_min.as_deref() {
                criteria = criteria.with_budget_min(min);
            }
            if let Some(max) = budget_max.as_deref() {
                criteria = criteria.with_budget_max(max);
            }
            if let Some(sort_by) = &sort_by {
                criteria = criteria.with_sort(sort_by, &sort_order);
            }
            handle_search(config, records, criteria, limit).await?
        }
        Commands::Benchmark { records, requests } => {
            handle_benchmark(config, records, requests).await?
        }
    }

    Ok(())
}

/// Handle the 'process' command
///
/// Requests are read on a blocking task and posted as they are decoded;
/// responses are printed as they arrive. Any JSON object gets a response;
/// lines that are not JSON objects are reported on stderr and skipped.
async fn handle_process(config: ProcessorConfig, input: Option<PathBuf>) -> Result<()> {
    let (responses, mut outbox) = mpsc::unbounded_channel();
    let processor = ListProcessor::spawn(&config, responses)?;

    let reader = tokio::task::spawn_blocking(move || -> Result<usize> {
        let source: Box<dyn BufRead> = match &input {
            Some(path) => Box::new(BufReader::new(
                File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?,
            )),
            None => Box::new(io::stdin().lock()),
        };

        let mut posted = 0;
        for (index, line) in source.lines().enumerate() {
            let line = line.context("Failed to read request line")?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RequestEnvelope>(&line) {
                Ok(request) => {
                    processor.post(request)?;
                    posted += 1;
                }
                Err(err) => eprintln!("{} line {}: {}", "skipped".yellow(), index + 1, err),
            }
        }

        // Lets queued requests finish, then closes the response channel.
        processor.shutdown()?;
        Ok(posted)
    });

    while let Some(response) = outbox.recv().await {
        println!("{}", serde_json::to_string(&response)?);
    }

    let posted = reader.await??;
    tracing::info!("Answered {} requests", posted);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    config: ProcessorConfig,
    path: PathBuf,
    criteria: FilterCriteria,
    limit: usize,
) -> Result<()> {
    let start = Instant::now();
    let listings = load_records(&path)
        .with_context(|| format!("Failed to load listings from {}", path.display()))?;
    println!(
        "{} Loaded {} listings in {:?}",
        "✓".green(),
        listings.len(),
        start.elapsed()
    );

    let client = ProcessorClient::start(config)?;
    let results = client.search_and_filter(listings, criteria).await?;
    client.shutdown().await?;

    print_listings(&results, limit);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(config: ProcessorConfig, records: usize, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    let batch = synthetic_listings(records);
    let plans = random_criteria(requests);
    println!(
        "Running {} requests over {} synthetic listings...",
        requests,
        batch.len()
    );

    let client = Arc::new(ProcessorClient::start(config)?);
    let batch = Arc::new(batch);

    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for criteria in plans {
        let client = client.clone();
        let batch = batch.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            let results = client.search_and_filter(batch.as_ref().clone(), criteria).await?;
            Ok::<_, anyhow::Error>((start.elapsed(), results.len()))
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    let mut matched = 0;
    for handle in handles {
        let (elapsed, count) = handle.await??;
        timings.push(elapsed);
        matched += count;
    }
    let total_time = wall_clock.elapsed();

    if let Ok(client) = Arc::try_unwrap(client) {
        client.shutdown().await?;
    }

    timings.sort();
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);
    println!("Average matches: {:.1}", matched as f64 / requests as f64);

    Ok(())
}

fn percentile(sorted: &[Duration], quantile: f64) -> Duration {
    let index = ((sorted.len() as f64 * quantile) as usize).min(sorted.len() - 1);
    sorted[index]
}

const CATEGORIES: [&str; 5] = ["Logo Design", "Web Development", "3D Design", "Copywriting", "Video Editing"];
const LEVELS: [&str; 3] = ["entry", "intermediate", "expert"];
const LOCATIONS: [&str; 4] = ["Remote", "Berlin", "Lagos", "Toronto"];
const WORDS: [&str; 8] = ["brand", "rust", "shopify", "animation", "landing", "api", "figma", "blog"];
const SORT_FIELDS: [&str; 4] = ["date", "budget", "title", "views"];

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

fn synthetic_listings(count: usize) -> Vec<ListRecord> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let word = pick(&mut rng, &WORDS);
            ListRecord {
                title: Some(format!("{} project {}", word, i).into()),
                description: Some(format!("Looking for help with {} work", pick(&mut rng, &WORDS)).into()),
                skills: Some(format!("{}, {}", word, pick(&mut rng, &WORDS)).into()),
                category: Some(pick(&mut rng, &CATEGORIES).into()),
                owner: Some(json!({"name": format!("client-{}", rng.random_range(1..500))})),
                location: Some(pick(&mut rng, &LOCATIONS).into()),
                experience_level: Some(pick(&mut rng, &LEVELS).into()),
                budget: Some(NumberLike::from(rng.random_range(50..5_000_i64))),
                created_at: Some(DateLike::from(
                    format!(
                        "2024-{:02}-{:02}",
                        rng.random_range(1..=12),
                        rng.random_range(1..=28)
                    )
                    .as_str(),
                )),
                views: Some(NumberLike::from(rng.random_range(0..1_000_i64))),
                ..Default::default()
            }
        })
        .collect()
}

fn random_criteria(count: usize) -> Vec<FilterCriteria> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let mut criteria = FilterCriteria::default().with_sort(
                pick(&mut rng, &SORT_FIELDS),
                if rng.random::<bool>() { "asc" } else { "desc" },
            );
            if rng.random::<bool>() {
                criteria = criteria.with_search_term(pick(&mut rng, &WORDS));
            }
            if rng.random::<bool>() {
                criteria = criteria.with_category(pick(&mut rng, &CATEGORIES));
            }
            if rng.random::<bool>() {
                criteria = criteria.with_budget_min(rng.random_range(100..2_000_i64));
            }
            criteria
        })
        .collect()
}

/// Helper function to format and print listings
fn print_listings(listings: &[ListRecord], limit: usize) {
    println!(
        "{}",
        format!("{} matching listings:", listings.len()).bold().blue()
    );
    for (rank, listing) in listings.iter().take(limit).enumerate() {
        let budget = listing.budget_value();
        let budget = if budget.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.0}", budget)
        };
        let date = listing
            .parsed_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{}. {} [{}] - Budget: {} - {} - {}",
            (rank + 1).to_string().green(),
            listing
                .title_text()
                .unwrap_or(Cow::Borrowed("(untitled)"))
                .bold(),
            listing.category_label().unwrap_or("-"),
            budget.yellow(),
            listing.location_text().unwrap_or(Cow::Borrowed("-")),
            date
        );
        if let Some(owner) = listing.owner_name() {
            println!("   Posted by {} ({} views)", owner.cyan(), listing.view_count());
        }
    }
    if listings.len() > limit {
        println!("... and {} more", listings.len() - limit);
    }
}

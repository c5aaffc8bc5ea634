//! memorise CLI
//!
//! Inspect cache keys and watch memoization at work from the command line.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memorise::{
    cache_key, memoize, memoize_async, resolve_key, Arg, CacheConfig, CacheStats, LruTtlCache,
    MemoizeOptions, Pending,
};

/// memorise - memoize functions over a bounded LRU/TTL cache
#[derive(Parser)]
#[command(name = "memorise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cache key for an argument list
    Key {
        /// Arguments as JSON; anything that does not parse is taken as a string
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Run a slow function through the cache, one call per argument
    Demo {
        #[command(flatten)]
        limits: Limits,
        /// Simulated work per invocation, in milliseconds
        #[arg(long, default_value = "200")]
        delay_ms: u64,
        /// Issue every call at once through the async wrapper
        #[arg(long)]
        concurrent: bool,
        /// Call arguments as JSON; anything that does not parse is taken as a string
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },
}

/// Cache limits for the demo cache.
#[derive(clap::Args, Debug, Default)]
struct Limits {
    /// Maximum number of cached entries (0 = unbounded)
    #[arg(long, env = "MEMORISE_CAPACITY")]
    capacity: Option<usize>,
    /// Entry time-to-live in milliseconds
    #[arg(long, env = "MEMORISE_TTL_MS")]
    ttl_ms: Option<u64>,
    /// JSON cache configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Limits {
    fn resolve(&self) -> Result<CacheConfig> {
        let mut config = match &self.config {
            Some(path) => CacheConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => CacheConfig::default(),
        };
        if let Some(capacity) = self.capacity {
            config.max_entries = capacity;
        }
        if let Some(ttl_ms) = self.ttl_ms {
            config.ttl = Some(Duration::from_millis(ttl_ms));
        }
        config.validate()?;
        Ok(config)
    }
}

/// What a demo run did.
#[derive(Debug, Default, PartialEq, Eq)]
struct DemoReport {
    calls: usize,
    invocations: usize,
    hits: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "memorise=debug,info"
    } else {
        "memorise=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Key { args } => cmd_key(&args),
        Commands::Demo {
            limits,
            delay_ms,
            concurrent,
            args,
        } => cmd_demo(&limits, Duration::from_millis(delay_ms), concurrent, &args).await,
    }
}

/// Parses a command-line argument as JSON, falling back to a plain string.
fn parse_arg(raw: &str) -> Arg {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => Arg::from(value),
        Err(_) => Arg::string(raw),
    }
}

/// Print the default cache key
fn cmd_key(raw: &[String]) -> Result<()> {
    let args: Vec<Arg> = raw.iter().map(|s| parse_arg(s)).collect();
    println!("{}", resolve_key(&args));
    Ok(())
}

/// Run the memoization demo
async fn cmd_demo(limits: &Limits, delay: Duration, concurrent: bool, raw: &[String]) -> Result<()> {
    if raw.is_empty() {
        bail!("Nothing to call: pass at least one argument");
    }
    let config = limits.resolve()?;

    println!("{}", "🧠 Running memoization demo...".cyan().bold());
    println!(
        "   {} {}",
        "Capacity:".green(),
        if config.is_unbounded() {
            "unbounded".to_string()
        } else {
            config.max_entries.to_string()
        }
    );
    if let Some(ttl) = config.ttl() {
        println!("   {} {:?}", "TTL:".green(), ttl);
    }
    println!("   {} {:?}\n", "Work per call:".green(), delay);

    let inputs: Vec<Arg> = raw.iter().map(|s| parse_arg(s)).collect();
    let start = Instant::now();
    let (report, stats) = if concurrent {
        run_concurrent(config, delay, inputs).await
    } else {
        tokio::task::spawn_blocking(move || run_sequential(config, delay, inputs))
            .await
            .context("Demo task failed")?
    };

    print_summary(&report, &stats, start.elapsed());
    Ok(())
}

/// The deliberately slow function's result.
fn describe(args: &[Arg]) -> String {
    format!("{} arg(s), key of {} bytes", args.len(), cache_key(args).len())
}

fn run_sequential(
    config: CacheConfig,
    delay: Duration,
    inputs: Vec<Arg>,
) -> (DemoReport, CacheStats) {
    let cache = Arc::new(LruTtlCache::<String>::with_config(config));
    let invocations = Arc::new(AtomicUsize::new(0));
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&invocations);
    let hit_counter = Arc::clone(&hits);
    let slow = memoize(
        move |args: Vec<Arg>| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(delay);
            describe(&args)
        },
        MemoizeOptions::<Vec<Arg>, String>::new()
            .cache(Arc::clone(&cache))
            .on_hit(move |key: &str, _, _| {
                hit_counter.fetch_add(1, Ordering::SeqCst);
                debug!(key, "Served from cache");
            }),
    );

    let calls = inputs.len();
    for arg in inputs {
        let args = vec![arg];
        let key = cache_key(&args);
        let before = hits.load(Ordering::SeqCst);
        let start = Instant::now();
        let value = slow.call(args);
        let hit = hits.load(Ordering::SeqCst) > before;
        print_call(hit, &key, &value, Some(start.elapsed()));
    }

    let report = DemoReport {
        calls,
        invocations: invocations.load(Ordering::SeqCst),
        hits: hits.load(Ordering::SeqCst),
    };
    (report, cache.stats())
}

async fn run_concurrent(
    config: CacheConfig,
    delay: Duration,
    inputs: Vec<Arg>,
) -> (DemoReport, CacheStats) {
    let cache = Arc::new(LruTtlCache::<Pending<String>>::with_config(config));
    let invocations = Arc::new(AtomicUsize::new(0));
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&invocations);
    let hit_counter = Arc::clone(&hits);
    let slow = memoize_async(
        move |args: Vec<Arg>| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(delay).await;
                describe(&args)
            }
        },
        MemoizeOptions::<Vec<Arg>, Pending<String>>::new()
            .cache(Arc::clone(&cache))
            .on_hit(move |key: &str, _, _| {
                hit_counter.fetch_add(1, Ordering::SeqCst);
                debug!(key, "Joined pending call");
            }),
    );

    let calls = inputs.len();
    let mut keys = Vec::with_capacity(calls);
    let mut sources = Vec::with_capacity(calls);
    let mut pending = Vec::with_capacity(calls);
    for arg in inputs {
        let args = vec![arg];
        keys.push(cache_key(&args));
        let before = hits.load(Ordering::SeqCst);
        pending.push(slow.call(args));
        sources.push(hits.load(Ordering::SeqCst) > before);
    }

    let values = futures::future::join_all(pending).await;
    for ((key, hit), value) in keys.iter().zip(sources).zip(&values) {
        print_call(hit, key, value, None);
    }

    let report = DemoReport {
        calls,
        invocations: invocations.load(Ordering::SeqCst),
        hits: hits.load(Ordering::SeqCst),
    };
    (report, cache.stats())
}

fn print_call(hit: bool, key: &str, value: &str, elapsed: Option<Duration>) {
    let status = if hit {
        "hit ".green().bold()
    } else {
        "miss".yellow().bold()
    };
    match elapsed {
        Some(elapsed) => println!("   {} {} -> {} ({:?})", status, key.cyan(), value, elapsed),
        None => println!("   {} {} -> {}", status, key.cyan(), value),
    }
}

fn print_summary(report: &DemoReport, stats: &CacheStats, elapsed: Duration) {
    println!("\n{}", "📈 Results:".green().bold());
    println!("   Calls: {}", report.calls);
    println!("   Invocations: {}", report.invocations);
    println!("   Cache hits: {}", report.hits);
    println!("   Total time: {:?}", elapsed);
    println!(
        "   Entries: {} ({} live, {} expired)",
        stats.total_entries, stats.valid_entries, stats.expired_entries
    );
}

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use memmap2::Mmap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use splay_ring::{
    parse_keys, FullSplay, InputError, Policy, SemiSplay, SplayPolicy, SplayTree,
    TreeSummary, DEFAULT_BENCH_COUNT, DEFAULT_BENCH_LOOKUPS, DEFAULT_DEMO_SIZE,
};

// ── errors ───────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum CliError {
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Input {
        path: String,
        #[source]
        source: InputError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ── mmap helpers ─────────────────────────────────────────────────────────

/// Memory-map `path` read-only.  Returns `None` for an empty file, which
/// cannot be mapped.
fn mmap_open(path: &str) -> io::Result<Option<Mmap>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    // SAFETY: the mapping is read-only and dropped before we return from
    // the command; concurrent truncation by another process is not guarded.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(Some(mmap))
}

fn read_keys(path: &str) -> Result<Vec<i64>, CliError> {
    let map = mmap_open(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    let bytes: &[u8] = map.as_deref().unwrap_or(&[]);
    parse_keys(bytes).map_err(|source| CliError::Input {
        path: path.to_string(),
        source,
    })
}

// ── CLI types ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Full,
    Semi,
}

impl From<PolicyArg> for Policy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Full => Policy::Full,
            PolicyArg::Semi => Policy::Semi,
        }
    }
}

fn parse_positive(s: &str) -> Result<usize, String> {
    s.parse::<usize>()
        .map_err(|e| e.to_string())
        .and_then(|n| if n >= 1 { Ok(n) } else { Err("must be >= 1".to_string()) })
}

#[derive(Parser)]
#[command(about = "Splay and semi-splay trees over a ring-buffer worklist")]
struct Cli {
    /// Print diagnostic messages to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a shuffled range into both tree kinds and show the result
    Demo {
        /// Number of values to insert (1..=size)
        #[arg(long, default_value_t = DEFAULT_DEMO_SIZE)]
        size: usize,

        /// RNG seed for the shuffle (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sort integers from a file by inserting and draining a splay tree
    Sort {
        /// Input file of whitespace-separated integers
        input: String,

        /// Output file, one integer per line (stdout if omitted)
        #[arg(long)]
        output: Option<String>,

        /// Splay policy used while inserting
        #[arg(long, value_enum, default_value_t = PolicyArg::Full)]
        policy: PolicyArg,
    },

    /// Time random lookups and an ordered drain on balanced trees
    Bench {
        /// Number of values in each tree
        #[arg(long, default_value_t = DEFAULT_BENCH_COUNT, value_parser = parse_positive)]
        count: usize,

        /// Number of random lookups
        #[arg(long, default_value_t = DEFAULT_BENCH_LOOKUPS)]
        lookups: usize,

        /// RNG seed for the lookup keys (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn join<'a>(values: impl IntoIterator<Item = &'a i64>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── commands ─────────────────────────────────────────────────────────────

fn demo(size: usize, seed: Option<u64>) {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<i64> = (1..=size as i64).collect();
    order.shuffle(&mut rng);
    debug!(size, seed, "shuffled demo input");

    let mut full: SplayTree<i64, FullSplay> = SplayTree::new();
    let mut semi: SplayTree<i64, SemiSplay> = SplayTree::new();
    for &v in &order {
        full.insert(v);
        semi.insert(v);
    }

    println!("Insert order:                  {}", join(&order));
    println!("In-order traversal full splay: {}", join(&full));
    println!("In-order traversal semi splay: {}", join(&semi));
    println!("{}", full.summary());
    println!("{}", semi.summary());
}

/// Insert every key, then drain ascending with `delete_min_no_splay`.
fn sort_keys<P: SplayPolicy>(keys: Vec<i64>) -> (Vec<i64>, TreeSummary) {
    let mut tree: SplayTree<i64, P> = SplayTree::new();
    tree.extend(keys);
    let summary = tree.summary();
    let mut sorted = Vec::with_capacity(tree.len());
    while let Some(k) = tree.delete_min_no_splay() {
        sorted.push(k);
    }
    (sorted, summary)
}

fn sort(input: &str, output: Option<&str>, policy: Policy) -> Result<(), CliError> {
    let keys = read_keys(input)?;
    info!(input, keys = keys.len(), %policy, "sorting");

    let t0 = Instant::now();
    let (sorted, summary) = match policy {
        Policy::Full => sort_keys::<FullSplay>(keys),
        Policy::Semi => sort_keys::<SemiSplay>(keys),
    };
    let elapsed = t0.elapsed();

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);
    for k in &sorted {
        writeln!(out, "{}", k)?;
    }
    out.flush()?;

    eprintln!("Input:        {} ({} keys)", input, sorted.len());
    eprintln!("Tree:         {}", summary);
    eprintln!("Time:         {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn bench_policy<P: SplayPolicy>(count: usize, lookups: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    // Start balanced so the build itself stays out of the timings.
    let mut tree: SplayTree<i64, P> = SplayTree::from_sorted((1..=count as i64).collect());
    println!("{}", tree.summary());

    let t0 = Instant::now();
    let mut hits = 0usize;
    for _ in 0..lookups {
        if tree.contains(&rng.gen_range(1..=count as i64)) {
            hits += 1;
        }
    }
    let lookup_time = t0.elapsed();
    println!("  Lookups:    {} ({} hits) in {:.3}s", lookups, hits, lookup_time.as_secs_f64());
    println!("  Height:     {} after lookups", tree.height());

    let t0 = Instant::now();
    let mut drained = 0usize;
    while tree.delete_min_no_splay().is_some() {
        drained += 1;
    }
    println!(
        "  Drain:      {} values in {:.3}s",
        drained,
        t0.elapsed().as_secs_f64()
    );
}

fn bench(count: usize, lookups: usize, seed: Option<u64>) {
    let seed = seed.unwrap_or_else(rand::random);
    debug!(count, lookups, seed, "benchmark parameters");
    bench_policy::<FullSplay>(count, lookups, seed);
    println!();
    bench_policy::<SemiSplay>(count, lookups, seed);
}

// ── main ─────────────────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Demo { size, seed } => demo(size, seed),
        Commands::Sort {
            input,
            output,
            policy,
        } => sort(&input, output.as_deref(), policy.into())?,
        Commands::Bench {
            count,
            lookups,
            seed,
        } => bench(count, lookups, seed),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

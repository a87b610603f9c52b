//! Benchmark harness for the matching strategies.
//!
//! Generates a synthetic dataset per configured size, times every strategy
//! against it with a fresh random query, and writes an aligned text table
//! consumed by the external speed-report tool. Only the Match Engine is
//! exercised; the server never runs here.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use haystackd::matcher::Algorithm;

#[derive(Parser, Debug)]
#[command(name = "benchmark")]
#[command(about = "Time every matching strategy against synthetic datasets", long_about = None)]
struct BenchArgs {
    /// Dataset sizes in lines, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = vec![10_000, 50_000, 100_000, 250_000, 500_000, 750_000, 1_000_000]
    )]
    sizes: Vec<usize>,

    /// Length of each generated line
    #[arg(long, default_value_t = 20)]
    line_len: usize,

    /// Where to write the results table
    #[arg(short, long, default_value = "benchmark_results.txt")]
    output: PathBuf,

    /// Directory for the transient dataset files
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = BenchArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut rng = rand::thread_rng();
    let mut results = Vec::with_capacity(args.sizes.len() * Algorithm::ALL.len());

    for &size in &args.sizes {
        let path = args.work_dir.join(format!("test_file_{size}.txt"));
        generate_dataset(&path, size, args.line_len, &mut rng)?;

        let contents = fs::read_to_string(&path)?;
        let lines: Vec<String> = contents.lines().map(|l| l.trim().to_string()).collect();

        for algorithm in Algorithm::ALL {
            // a fresh random query per run; at 20 random alphanumeric
            // characters a collision with the dataset is vanishingly rare,
            // so this times the miss path, the worst case for every scan
            let query = random_line(&mut rng, args.line_len);

            let started = Instant::now();
            let matches = algorithm.find_matches(&lines, &query);
            let elapsed = started.elapsed().as_secs_f64();

            info!(
                algorithm = %algorithm,
                size,
                elapsed_s = elapsed,
                matches = matches.len(),
                "Timed strategy"
            );
            results.push((algorithm.name(), size, elapsed));
        }

        fs::remove_file(&path)?;
    }

    write_report(&args.output, &results)?;
    info!(output = %args.output.display(), "Benchmark report written");
    Ok(())
}

fn random_line(rng: &mut impl Rng, len: usize) -> String {
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .take(len)
        .map(char::from)
        .collect()
}

fn generate_dataset(
    path: &Path,
    num_lines: usize,
    line_len: usize,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    for _ in 0..num_lines {
        writeln!(writer, "{}", random_line(rng, line_len))?;
    }
    writer.flush()
}

/// Aligned table the speed-report tool parses: two header lines, then one
/// `strategy size seconds` row per timing. The trailing footer splits into
/// two fields and is ignored by the parser.
fn write_report(path: &Path, results: &[(&str, usize, f64)]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;

    writeln!(
        file,
        "{:<20} {:<15} {:<20}",
        "Algorithm", "File Size", "Execution Time (s)"
    )?;
    writeln!(file, "{}", "=".repeat(55))?;

    for (name, size, elapsed) in results {
        writeln!(file, "{name:<20} {size:<15} {elapsed:<20.4}")?;
    }

    writeln!(file)?;
    writeln!(file, "Generated {}", chrono::Local::now().to_rfc3339())?;
    Ok(())
}

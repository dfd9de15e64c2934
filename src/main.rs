mod bench;
mod error;
mod parallel;
mod report;
mod result;
mod sieve;
mod storage;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::SieveError;
use crate::parallel::{sieve_eratosthenes_parallel, sieve_euler_parallel};
use crate::result::SieveResult;
use crate::sieve::{sieve_eratosthenes, sieve_euler};

#[derive(Parser)]
#[command(name = "sievebench")]
#[command(
    about = "Prime sieve benchmarks - Eratosthenes and Euler, sequential and parallel",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Eratosthenes,
    Euler,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run one sieve up to a given limit")]
    Run {
        #[arg(help = "The upper bound to sieve up to")]
        limit: usize,
        #[arg(
            short,
            long,
            value_enum,
            default_value = "eratosthenes",
            help = "Sieve algorithm to use"
        )]
        algorithm: Algorithm,
        #[arg(short, long, help = "Sieve the range above sqrt(limit) concurrently")]
        parallel: bool,
        #[arg(
            short,
            long,
            default_value = "4",
            help = "Number of worker threads (parallel only)"
        )]
        threads: usize,
        #[arg(long, help = "Save the primes to primes.txt in the data directory")]
        save: bool,
    },
    #[command(about = "Compare sequential and parallel runs over a ladder of limits")]
    Compare {
        #[arg(long, default_value = "100", help = "First limit in the ladder")]
        start: usize,
        #[arg(long, default_value = "1000000000", help = "Last limit in the ladder")]
        limit: usize,
        #[arg(
            long,
            default_value = "10",
            help = "Multiply the limit by this factor each step"
        )]
        factor: usize,
        #[arg(short, long, default_value = "2", help = "Worker threads for the parallel runs")]
        threads: usize,
        #[arg(short, long, value_enum, default_value = "eratosthenes")]
        algorithm: Algorithm,
    },
    #[command(about = "Sweep the Euler sieve and append CSV rows to a benchmark file")]
    Bench {
        #[arg(short, long, default_value = "bench.csv", help = "CSV file to append to")]
        output: PathBuf,
        #[arg(long, default_value = "100")]
        start: usize,
        #[arg(long, default_value = "1000000000")]
        limit: usize,
        #[arg(long, default_value = "10")]
        factor: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            limit,
            algorithm,
            parallel,
            threads,
            save,
        } => run_once(limit, algorithm, parallel, threads, save),
        Commands::Compare {
            start,
            limit,
            factor,
            threads,
            algorithm,
        } => compare(start, limit, factor, threads, algorithm),
        Commands::Bench {
            output,
            start,
            limit,
            factor,
        } => {
            if factor < 2 {
                eprintln!("Error: factor must be at least 2");
                return ExitCode::FAILURE;
            }
            let started = Instant::now();
            if let Err(e) = bench::run(&output, start, limit, factor) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!("Benchmark results appended to {}", output.display());
            if let Err(e) = storage::log_execution(
                "bench",
                &format!("start={} limit={}", start, limit),
                started.elapsed().as_micros(),
            ) {
                eprintln!("Warning: Failed to log execution: {}", e);
            }
            ExitCode::SUCCESS
        }
    }
}

fn sieve(
    limit: usize,
    algorithm: Algorithm,
    parallel: bool,
    threads: usize,
) -> Result<SieveResult, SieveError> {
    match (algorithm, parallel) {
        (Algorithm::Eratosthenes, false) => sieve_eratosthenes(limit),
        (Algorithm::Eratosthenes, true) => sieve_eratosthenes_parallel(limit, threads),
        (Algorithm::Euler, false) => sieve_euler(limit),
        (Algorithm::Euler, true) => sieve_euler_parallel(limit, threads),
    }
}

fn run_once(
    limit: usize,
    algorithm: Algorithm,
    parallel: bool,
    threads: usize,
    save: bool,
) -> ExitCode {
    let started = Instant::now();

    println!("Finding primes up to {} ({:?})...", limit, algorithm);

    let result = match sieve(limit, algorithm, parallel, threads) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    report::print_result(&result, parallel, threads, result.prime_count(), true);

    if save {
        match storage::save_primes(&result.primes()) {
            Ok(path) => println!("Saved {} primes to {}", result.prime_count(), path.display()),
            Err(e) => eprintln!("Error saving primes: {}", e),
        }
    }

    if let Err(e) = storage::log_execution(
        "run",
        &limit.to_string(),
        started.elapsed().as_micros(),
    ) {
        eprintln!("Warning: Failed to log execution: {}", e);
    }

    ExitCode::SUCCESS
}

fn compare(
    start: usize,
    limit: usize,
    factor: usize,
    threads: usize,
    algorithm: Algorithm,
) -> ExitCode {
    if factor < 2 {
        eprintln!("Error: factor must be at least 2");
        return ExitCode::FAILURE;
    }

    let started = Instant::now();

    if let Some((rss_mb, vm_mb)) = storage::process_memory_mb() {
        println!("Process memory: RSS={:.2} MB, VM={:.2} MB", rss_mb, vm_mb);
    }
    println!("Algorithm: {:?}", algorithm);
    println!();

    let mut n = start.max(2);
    while n <= limit {
        println!("====== Limit (N) = {} ======", n);

        let sequential = match sieve(n, algorithm, false, 1) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let expected = sequential.prime_count();
        report::print_result(&sequential, false, 1, expected, false);

        match sieve(n, algorithm, true, threads) {
            Ok(result) => report::print_result(&result, true, threads, expected, false),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }

        n = match n.checked_mul(factor) {
            Some(next) => next,
            None => break,
        };
    }

    if let Err(e) = storage::log_execution(
        "compare",
        &format!("start={} limit={} threads={}", start, limit, threads),
        started.elapsed().as_micros(),
    ) {
        eprintln!("Warning: Failed to log execution: {}", e);
    }

    ExitCode::SUCCESS
}

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::error::SieveError;
use crate::parallel::sieve_euler_parallel;
use crate::report;
use crate::sieve::sieve_euler;

/// Thread counts swept by the parallel half of the benchmark.
const BENCH_THREADS: [usize; 4] = [2, 3, 4, 8];

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("could not write benchmark file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sieve(#[from] SieveError),
}

/// Sweep the Euler sieve over a geometric ladder of limits, sequential
/// first and then once per thread count, appending one CSV row per run.
pub fn run(output: &Path, start: usize, limit: usize, factor: usize) -> Result<(), BenchError> {
    let file = OpenOptions::new().create(true).append(true).open(output)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "limit,found,parallel,threads,exec_time_ms")?;

    let mut n = start.max(1);
    while n <= limit {
        println!("====== N = {} ======", n);

        let result = sieve_euler(n)?;
        let found = result.prime_count();
        writeln!(
            writer,
            "{},{},false,1,{}",
            n,
            found,
            result.algorithm_time().as_millis()
        )?;
        report::print_result(&result, false, 1, found, false);

        n = match n.checked_mul(factor) {
            Some(next) => next,
            None => break,
        };
    }

    for &num_threads in &BENCH_THREADS {
        let mut n = start.max(1);
        while n <= limit {
            println!("====== N = {} ======", n);

            let result = sieve_euler_parallel(n, num_threads)?;
            let found = result.prime_count();
            report::print_result(&result, true, num_threads, found, false);
            writeln!(
                writer,
                "{},{},true,{},{}",
                n,
                found,
                num_threads,
                result.algorithm_time().as_millis()
            )?;

            n = match n.checked_mul(factor) {
                Some(next) => next,
                None => break,
            };
        }
    }

    writer.flush()?;
    Ok(())
}

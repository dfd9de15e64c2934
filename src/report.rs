use crate::result::SieveResult;

/// Console summary of one sieve call. `expected` is the reference count the
/// found total is printed against (a sequential run's count when comparing,
/// otherwise the result's own).
pub fn print_result(
    result: &SieveResult,
    parallel: bool,
    num_threads: usize,
    expected: usize,
    include_total: bool,
) {
    println!("{}", if parallel { "Parallel" } else { "Sequential" });

    if parallel {
        println!("Threads: {}", num_threads);
    }

    if include_total {
        println!("Total time taken: {} ms.", result.total_time().as_millis());
    }
    println!(
        "Algorithm execution time: {} ms.",
        result.algorithm_time().as_millis()
    );
    println!("Found: {} out of: {}", result.prime_count(), expected);
    println!();
}

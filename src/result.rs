use std::time::Duration;

use crate::sieve::to_primes_list;

/// Outcome of one sieve call: the primality table plus timing around the
/// algorithm-only phase and the whole call. Immutable once built.
pub struct SieveResult {
    is_prime: Vec<bool>,
    primes: Vec<usize>,
    algorithm_time: Duration,
    total_time: Duration,
}

impl SieveResult {
    /// Wrap a finished table; the prime list stays lazy and is derived on
    /// demand by scanning.
    pub fn from_table(is_prime: Vec<bool>, algorithm_time: Duration, total_time: Duration) -> Self {
        SieveResult {
            is_prime,
            primes: Vec::new(),
            algorithm_time,
            total_time,
        }
    }

    /// Wrap a finished table together with an already-materialized prime
    /// list (the linear sieve produces one as it runs).
    pub fn from_table_and_list(
        is_prime: Vec<bool>,
        primes: Vec<usize>,
        algorithm_time: Duration,
        total_time: Duration,
    ) -> Self {
        SieveResult {
            is_prime,
            primes,
            algorithm_time,
            total_time,
        }
    }

    pub fn prime_count(&self) -> usize {
        if self.primes.is_empty() {
            self.is_prime.iter().skip(2).filter(|&&p| p).count()
        } else {
            self.primes.len()
        }
    }

    /// Ascending primes, scanning the table when no list was materialized.
    pub fn primes(&self) -> Vec<usize> {
        if self.primes.is_empty() {
            to_primes_list(&self.is_prime)
        } else {
            self.primes.clone()
        }
    }

    pub fn table(&self) -> &[bool] {
        &self.is_prime
    }

    pub fn algorithm_time(&self) -> Duration {
        self.algorithm_time
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }
}

use std::time::Instant;

use crate::error::SieveError;
use crate::result::SieveResult;

/// Largest integer r with r*r <= n, found by binary search so no float
/// rounding can creep in near perfect squares.
pub fn integer_sqrt(n: usize) -> usize {
    let mut low = 0usize;
    let mut high = n;
    while low <= high {
        let mid = (low + high) >> 1;
        match mid.checked_mul(mid) {
            Some(sq) if sq == n => return mid,
            Some(sq) if sq < n => low = mid + 1,
            _ => high = mid - 1,
        }
    }
    high
}

/// Smallest integer r with r*r >= n. The marker limit: every composite <= n
/// has a prime factor <= this bound.
pub fn ceil_sqrt(n: usize) -> usize {
    let r = integer_sqrt(n);
    if r * r < n { r + 1 } else { r }
}

/// Allocate the n+1 entry primality table with every index a candidate and
/// 0 and 1 already ruled out. Exhaustion is reported, not aborted on.
pub fn alloc_table(n: usize) -> Result<Vec<bool>, SieveError> {
    let len = n + 1;
    let mut table = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| SieveError::Allocation(len))?;
    table.resize(len, true);
    for slot in table.iter_mut().take(2) {
        *slot = false;
    }
    Ok(table)
}

/// Collect the true indices of a primality table, ascending.
pub fn to_primes_list(table: &[bool]) -> Vec<usize> {
    table
        .iter()
        .enumerate()
        .skip(2)
        .filter_map(|(i, &p)| p.then_some(i))
        .collect()
}

/// Eratosthenes elimination over table[2..=limit]: for each surviving p,
/// clear 2p, 3p, ... up to limit. The same double loop serves the full
/// sequential sieve (limit = n) and the marker prefix (limit = ceil_sqrt(n)).
pub fn eliminate_multiples(table: &mut [bool], limit: usize) {
    for p in 2..=limit {
        if table[p] {
            let mut j = p + p;
            while j <= limit {
                table[j] = false;
                j += p;
            }
        }
    }
}

/// Euler linear construction over table[2..=limit]. Returns the ascending
/// primes found. Each i is multiplied by the known primes in ascending
/// order, stopping once the product leaves the range or after the first
/// prime dividing i; the divisibility stop is what guarantees every
/// composite is flagged exactly once, by its smallest prime factor.
pub fn euler_construct(table: &mut [bool], limit: usize) -> Result<Vec<usize>, SieveError> {
    let mut composite = Vec::new();
    composite
        .try_reserve_exact(limit + 1)
        .map_err(|_| SieveError::Allocation(limit + 1))?;
    composite.resize(limit + 1, false);

    let mut primes = Vec::new();
    for i in 2..=limit {
        if !composite[i] {
            primes.push(i);
        }
        for &p in &primes {
            let c = i * p;
            if c > limit {
                break;
            }
            debug_assert!(!composite[c], "composite {} flagged twice", c);
            composite[c] = true;
            table[c] = false;
            if i % p == 0 {
                break;
            }
        }
    }
    Ok(primes)
}

/// Sequential Sieve of Eratosthenes up to n.
pub fn sieve_eratosthenes(n: usize) -> Result<SieveResult, SieveError> {
    let start_total = Instant::now();
    let mut table = alloc_table(n)?;

    let start_alg = Instant::now();
    eliminate_multiples(&mut table, n);
    let algorithm_time = start_alg.elapsed();

    Ok(SieveResult::from_table(
        table,
        algorithm_time,
        start_total.elapsed(),
    ))
}

/// Sequential linear Sieve of Euler up to n. The prime list falls out of the
/// construction, so the result carries it materialized.
pub fn sieve_euler(n: usize) -> Result<SieveResult, SieveError> {
    let start_total = Instant::now();
    let mut table = alloc_table(n)?;

    let start_alg = Instant::now();
    let primes = euler_construct(&mut table, n)?;
    let algorithm_time = start_alg.elapsed();

    Ok(SieveResult::from_table_and_list(
        table,
        primes,
        algorithm_time,
        start_total.elapsed(),
    ))
}

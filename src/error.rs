use std::time::Duration;

use thiserror::Error;

/// Failures a sieve call can surface. A timed-out parallel call never hands
/// back a partially sieved table; it fails with `JoinTimeout` and the caller
/// must start over.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("thread count must be at least 1, got {0}")]
    InvalidThreadCount(usize),
    #[error("parallel sieve did not finish within {0:?}")]
    JoinTimeout(Duration),
    #[error("could not allocate primality table of {0} entries")]
    Allocation(usize),
}

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::SieveError;
use crate::result::SieveResult;
use crate::sieve::{alloc_table, ceil_sqrt, eliminate_multiples, euler_construct, to_primes_list};

/// Upper bound on the wait for all segment workers to report back. Expiry is
/// fatal for the call; the partially merged table is dropped with the error.
const JOIN_WAIT: Duration = Duration::from_secs(100);

/// Which algorithm produces the sequential marker prefix up to ceil_sqrt(n).
/// Past the markers both variants sieve segments the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerMode {
    Eratosthenes,
    Euler,
}

/// Inclusive sub-range of (marker_limit, n] owned by one worker. Empty when
/// start > end, which happens whenever n <= marker_limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }
}

/// Split (marker_limit, n] into exactly num_threads contiguous segments.
/// The ceiling-biased size makes the last segment the short one (clamped to
/// n); together the segments tile the range with no gaps and no overlaps,
/// which is what licenses lock-free concurrent sieving.
pub fn partition_segments(marker_limit: usize, n: usize, num_threads: usize) -> Vec<Segment> {
    let segment_size = n.saturating_sub(marker_limit) / num_threads + 1;
    (0..num_threads)
        .map(|k| Segment {
            start: marker_limit + k * segment_size + 1,
            end: (marker_limit + (k + 1) * segment_size).min(n),
        })
        .collect()
}

/// Clear every multiple of every marker inside the segment. buf[i] stands
/// for the number segment.start + i and arrives all-true. The closed-form
/// first-multiple computation keeps each worker inside its own range; no
/// scan from 2 is ever needed.
pub fn sieve_segment(markers: &[usize], segment: Segment, buf: &mut [bool]) {
    if segment.is_empty() {
        return;
    }
    for &m in markers {
        let first = segment.start + ((m - segment.start % m) % m);
        let mut j = first;
        while j <= segment.end {
            buf[j - segment.start] = false;
            j += m;
        }
    }
}

fn generate_markers(
    table: &mut [bool],
    limit: usize,
    mode: MarkerMode,
) -> Result<Vec<usize>, SieveError> {
    match mode {
        MarkerMode::Eratosthenes => {
            eliminate_multiples(table, limit);
            Ok(to_primes_list(&table[..=limit]))
        }
        MarkerMode::Euler => euler_construct(table, limit),
    }
}

/// Segmented parallel sieve: sequential marker prefix, one worker per
/// segment, merge over a channel. Workers own their segment buffers
/// outright, so the table has a single writer and needs no locks or
/// atomics; disjointness of the merge targets is guaranteed by the
/// partition. On timeout the receiver is dropped, which makes any straggler
/// fail its send and wind down.
fn sieve_parallel(
    n: usize,
    num_threads: usize,
    mode: MarkerMode,
) -> Result<SieveResult, SieveError> {
    if num_threads < 1 {
        return Err(SieveError::InvalidThreadCount(num_threads));
    }

    let start_total = Instant::now();
    let mut table = alloc_table(n)?;
    let marker_limit = ceil_sqrt(n);

    let start_markers = Instant::now();
    let markers = generate_markers(&mut table, marker_limit, mode)?;
    let mut algorithm_time = start_markers.elapsed();

    let segments = partition_segments(marker_limit, n, num_threads);
    let markers = Arc::new(markers);

    let start_segments = Instant::now();
    let (tx, rx) = mpsc::channel();
    for (k, &segment) in segments.iter().enumerate() {
        let tx = tx.clone();
        let markers = Arc::clone(&markers);
        thread::spawn(move || {
            let mut buf = vec![true; segment.len()];
            sieve_segment(&markers, segment, &mut buf);
            let _ = tx.send((k, buf));
        });
    }
    drop(tx);

    let deadline = Instant::now() + JOIN_WAIT;
    for _ in 0..segments.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let (k, buf) = rx
            .recv_timeout(remaining)
            .map_err(|_| SieveError::JoinTimeout(JOIN_WAIT))?;
        let segment = segments[k];
        if !segment.is_empty() {
            table[segment.start..=segment.end].copy_from_slice(&buf);
        }
    }
    algorithm_time += start_segments.elapsed();

    Ok(SieveResult::from_table(
        table,
        algorithm_time,
        start_total.elapsed(),
    ))
}

/// Parallel Sieve of Eratosthenes up to n with num_threads workers.
pub fn sieve_eratosthenes_parallel(
    n: usize,
    num_threads: usize,
) -> Result<SieveResult, SieveError> {
    sieve_parallel(n, num_threads, MarkerMode::Eratosthenes)
}

/// Parallel Sieve of Euler up to n with num_threads workers. The marker
/// prefix is the linear construction; segment sieving itself reverts to
/// plain multiple-marking, which the segment workers share with the
/// Eratosthenes variant.
pub fn sieve_euler_parallel(n: usize, num_threads: usize) -> Result<SieveResult, SieveError> {
    sieve_parallel(n, num_threads, MarkerMode::Euler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sieve::{sieve_eratosthenes, sieve_euler};

    #[test]
    fn test_partition_tiles_range_exactly() {
        for n in [0, 1, 2, 3, 10, 30, 100, 10_000] {
            for num_threads in [1, 2, 3, 4, 8] {
                let marker_limit = ceil_sqrt(n);
                let segments = partition_segments(marker_limit, n, num_threads);
                assert_eq!(segments.len(), num_threads);

                let mut covered = Vec::new();
                for segment in &segments {
                    if !segment.is_empty() {
                        assert!(segment.start > marker_limit);
                        assert!(segment.end <= n);
                        covered.extend(segment.start..=segment.end);
                    }
                }
                let expected: Vec<usize> = (marker_limit + 1..=n.max(marker_limit)).collect();
                // Ascending extension order doubles as the disjointness
                // check: any overlap or gap would break the exact match.
                assert_eq!(
                    covered, expected,
                    "bad partition for n={} threads={}",
                    n, num_threads
                );
            }
        }
    }

    #[test]
    fn test_partition_last_segment_clamped() {
        let segments = partition_segments(10, 100, 3);
        assert_eq!(
            segments,
            vec![
                Segment { start: 11, end: 41 },
                Segment { start: 42, end: 72 },
                Segment { start: 73, end: 100 },
            ]
        );
    }

    #[test]
    fn test_partition_empty_when_nothing_remains() {
        for segment in partition_segments(6, 6, 4) {
            assert!(segment.is_empty());
            assert_eq!(segment.len(), 0);
        }
    }

    #[test]
    fn test_sieve_segment_first_multiple() {
        let segment = Segment { start: 11, end: 30 };
        let mut buf = vec![true; segment.len()];
        sieve_segment(&[2, 3, 5], segment, &mut buf);
        let survivors: Vec<usize> = buf
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| p.then_some(segment.start + i))
            .collect();
        assert_eq!(survivors, vec![11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for n in [0, 1, 2, 3, 10, 100, 10_000] {
            let sequential = sieve_eratosthenes(n).unwrap().primes();
            for num_threads in [1, 2, 3, 4, 8] {
                let eratosthenes = sieve_eratosthenes_parallel(n, num_threads).unwrap();
                assert_eq!(
                    eratosthenes.primes(),
                    sequential,
                    "eratosthenes n={} threads={}",
                    n,
                    num_threads
                );

                let euler = sieve_euler_parallel(n, num_threads).unwrap();
                assert_eq!(
                    euler.primes(),
                    sequential,
                    "euler n={} threads={}",
                    n,
                    num_threads
                );
            }
        }
    }

    #[test]
    fn test_euler_parallel_thirty() {
        let result = sieve_euler_parallel(30, 4).unwrap();
        assert_eq!(result.primes(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(result.prime_count(), 10);
    }

    #[test]
    fn test_eratosthenes_parallel_hundred() {
        let result = sieve_eratosthenes_parallel(100, 3).unwrap();
        assert_eq!(result.prime_count(), 25);
        assert_eq!(
            result.primes(),
            vec![
                2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73,
                79, 83, 89, 97
            ]
        );
    }

    #[test]
    fn test_single_thread_degenerates_to_one_segment() {
        let marker_limit = ceil_sqrt(10_000);
        let segments = partition_segments(marker_limit, 10_000, 1);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, marker_limit + 1);
        assert_eq!(segments[0].end, 10_000);

        let result = sieve_eratosthenes_parallel(10_000, 1).unwrap();
        assert_eq!(result.primes(), sieve_eratosthenes(10_000).unwrap().primes());
    }

    #[test]
    fn test_more_threads_than_range() {
        // n <= marker_limit leaves every segment empty; the call must still
        // come back with the right primes.
        let result = sieve_eratosthenes_parallel(3, 8).unwrap();
        assert_eq!(result.primes(), vec![2, 3]);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(
            sieve_eratosthenes_parallel(100, 0),
            Err(SieveError::InvalidThreadCount(0))
        ));
        assert!(matches!(
            sieve_euler_parallel(100, 0),
            Err(SieveError::InvalidThreadCount(0))
        ));
    }

    #[test]
    fn test_parallel_idempotence() {
        let first = sieve_euler_parallel(10_000, 4).unwrap();
        let second = sieve_euler_parallel(10_000, 4).unwrap();
        assert_eq!(first.table(), second.table());
    }

    #[test]
    fn test_parallel_agrees_with_sequential_euler() {
        let sequential = sieve_euler(10_000).unwrap();
        let parallel = sieve_euler_parallel(10_000, 8).unwrap();
        assert_eq!(sequential.primes(), parallel.primes());
        assert_eq!(sequential.table(), parallel.table());
    }
}

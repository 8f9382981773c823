//! Stress helpers for obuf.
//!
//! These helpers drive a buffer from many threads at once, mixing pushes
//! with full read passes and random lookups.

use obuf_codec::Codec;
use obuf_core::Buffer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of pushes per thread.
    pub pushes_per_thread: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Run a read operation after every this many pushes (0 = never).
    pub read_every: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            pushes_per_thread: 1_000,
            threads: 4,
            read_every: 100,
        }
    }
}

/// Pushes `(thread, sequence)` pairs from several threads at once.
///
/// Every `read_every` pushes a thread also runs a full read pass, checking
/// that it sees at least as many records as that thread has pushed so far,
/// then looks up the record halfway through what the pass saw.
pub fn stress_concurrent_pushes<C>(
    buffer: Arc<Buffer<(usize, usize), C>>,
    config: &StressConfig,
) -> StressTestResult
where
    C: Codec<(usize, usize)> + 'static,
{
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let buffer = Arc::clone(&buffer);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let pushes = config.pushes_per_thread;
            let read_every = config.read_every;

            thread::spawn(move || {
                for i in 0..pushes {
                    match buffer.push((t, i)) {
                        Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };

                    if read_every == 0 || (i + 1) % read_every != 0 {
                        continue;
                    }

                    let seen = buffer.iter().map(Iterator::count).unwrap_or(0);
                    if seen > i {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }

                    match buffer.get(seen / 2) {
                        Ok(Some(_)) => successful.fetch_add(1, Ordering::Relaxed),
                        _ => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Stress thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

use portable_atomic::{AtomicU64, Ordering};

use crate::generator::Generator;

/// A lock-free counter rendered as lowercase hex.
///
/// The first token is `start`, then `start + 1`, and so on. Tokens are unique
/// for the lifetime of one generator, which makes this a good fit for tests
/// and single-process tooling. It is not unique across processes.
///
/// # Example
///
/// ```
/// use shardid::{CounterGenerator, Generator};
///
/// let generator = CounterGenerator::new(100_001);
/// assert_eq!(generator.generate(), "186a1");
/// assert_eq!(generator.generate(), "186a2");
/// ```
#[derive(Debug)]
pub struct CounterGenerator {
    next: AtomicU64,
}

impl CounterGenerator {
    pub const fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Returns the next value without generating it.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for CounterGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Generator for CounterGenerator {
    fn generate(&self) -> String {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{value:x}")
    }
}

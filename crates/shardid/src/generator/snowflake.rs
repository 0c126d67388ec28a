use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    base32,
    generator::{Generator, IdGenStatus},
    time::TimeSource,
};

/// Bits reserved for the timestamp (milliseconds since the clock's epoch).
pub const TIMESTAMP_BITS: u32 = 41;
/// Bits reserved for the machine ID.
pub const MACHINE_ID_BITS: u32 = 10;
/// Bits reserved for the per-millisecond sequence.
pub const SEQUENCE_BITS: u32 = 12;

const SEQUENCE_SHIFT: u32 = 0;
const MACHINE_ID_SHIFT: u32 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + MACHINE_ID_BITS;

pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;
pub const MAX_MACHINE_ID: u64 = (1 << MACHINE_ID_BITS) - 1;
pub const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

/// Packs the three Snowflake components into one `u64`.
///
/// Each component is masked to its field width.
pub const fn pack_snowflake(timestamp: u64, machine_id: u64, sequence: u64) -> u64 {
    ((timestamp & MAX_TIMESTAMP) << TIMESTAMP_SHIFT)
        | ((machine_id & MAX_MACHINE_ID) << MACHINE_ID_SHIFT)
        | ((sequence & MAX_SEQUENCE) << SEQUENCE_SHIFT)
}

/// Splits a packed ID into `(timestamp, machine_id, sequence)`.
pub const fn unpack_snowflake(raw: u64) -> (u64, u64, u64) {
    (
        (raw >> TIMESTAMP_SHIFT) & MAX_TIMESTAMP,
        (raw >> MACHINE_ID_SHIFT) & MAX_MACHINE_ID,
        (raw >> SEQUENCE_SHIFT) & MAX_SEQUENCE,
    )
}

/// A lock-free Snowflake generator using the Twitter layout.
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
/// ```
///
/// State lives in a single [`AtomicU64`] advanced by compare-and-swap, so one
/// generator can be shared by every thread minting IDs for a cluster. As a
/// [`Generator`] it renders each ID as 13 Crockford base32 characters, which
/// keeps tokens fixed width and sortable by time.
///
/// When the sequence for the current millisecond is exhausted,
/// [`Self::try_next_id`] reports [`IdGenStatus::Pending`] and
/// [`Generator::generate`] waits for the clock to move on.
///
/// # Example
///
/// ```
/// use shardid::{Generator, SnowflakeGenerator, SystemClock};
///
/// let generator = SnowflakeGenerator::new(7, SystemClock::default());
/// let token = generator.generate();
/// assert_eq!(token.len(), 13);
/// ```
pub struct SnowflakeGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    time: T,
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `machine_id`, starting at timestamp and
    /// sequence zero.
    ///
    /// `machine_id` is masked to [`MACHINE_ID_BITS`]; callers running several
    /// generators against the same cluster must give each a distinct value
    /// within `0..=MAX_MACHINE_ID`.
    pub fn new(machine_id: u64, time: T) -> Self {
        Self::from_components(0, machine_id, 0, time)
    }

    /// Creates a generator from explicit component values, e.g. to resume
    /// from a persisted high-water mark.
    pub fn from_components(timestamp: u64, machine_id: u64, sequence: u64, time: T) -> Self {
        let initial = pack_snowflake(timestamp, machine_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial),
            time,
        }
    }

    pub fn machine_id(&self) -> u64 {
        unpack_snowflake(self.state.load(Ordering::Relaxed)).1
    }

    /// Attempts to generate the next raw ID without blocking.
    ///
    /// Returns [`IdGenStatus::Pending`] when the sequence is exhausted for the
    /// current millisecond, when the clock reads behind the last issued
    /// timestamp, or when another thread won the compare-and-swap.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> IdGenStatus {
        let now = self.time.current_millis() & MAX_TIMESTAMP;

        let current = self.state.load(Ordering::Relaxed);
        let (current_ts, machine_id, sequence) = unpack_snowflake(current);

        let next = match now.cmp(&current_ts) {
            cmp::Ordering::Equal => {
                if sequence < MAX_SEQUENCE {
                    pack_snowflake(current_ts, machine_id, sequence + 1)
                } else {
                    return IdGenStatus::Pending { yield_for: 1 };
                }
            }
            cmp::Ordering::Greater => pack_snowflake(now, machine_id, 0),
            cmp::Ordering::Less => {
                return Self::cold_clock_behind(now, current_ts);
            }
        };

        if self
            .state
            .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            IdGenStatus::Ready { id: next }
        } else {
            // Another thread won the race; retry immediately.
            IdGenStatus::Pending { yield_for: 0 }
        }
    }

    /// Generates the next raw ID, spinning until one is ready.
    pub fn next_id(&self) -> u64 {
        loop {
            match self.try_next_id() {
                IdGenStatus::Ready { id } => break id,
                IdGenStatus::Pending { yield_for: 0 } => core::hint::spin_loop(),
                IdGenStatus::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, current_ts: u64) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_for: current_ts - now,
        }
    }
}

impl<T> Generator for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn generate(&self) -> String {
        base32::encode_u64(self.next_id())
    }
}

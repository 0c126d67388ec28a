use rand::Rng;

use crate::{base32, generator::Generator, time::TimeSource};

/// Bits reserved for the ULID timestamp.
pub const ULID_TIMESTAMP_BITS: u32 = 48;
/// Bits of randomness in each ULID.
pub const ULID_RANDOM_BITS: u32 = 80;

const ULID_TIMESTAMP_MASK: u128 = (1 << ULID_TIMESTAMP_BITS) - 1;
const ULID_RANDOM_MASK: u128 = (1 << ULID_RANDOM_BITS) - 1;

/// A ULID-style generator: 48 bits of time followed by 80 random bits from
/// the thread-local RNG, rendered as 26 Crockford base32 characters.
///
/// Unlike [`SnowflakeGenerator`], this needs no machine ID coordination
/// between processes, at the cost of relying on randomness for uniqueness
/// within a millisecond. Tokens sort by time at millisecond granularity.
///
/// # Example
///
/// ```
/// use shardid::{Generator, SystemClock, UlidGenerator, UNIX_EPOCH_MILLIS};
///
/// let generator = UlidGenerator::new(SystemClock::with_epoch(UNIX_EPOCH_MILLIS));
/// assert_eq!(generator.generate().len(), 26);
/// ```
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
#[derive(Clone, Debug)]
pub struct UlidGenerator<T>
where
    T: TimeSource,
{
    time: T,
}

impl<T> UlidGenerator<T>
where
    T: TimeSource,
{
    pub const fn new(time: T) -> Self {
        Self { time }
    }

    /// Returns the next ULID as a raw `u128`.
    pub fn next_id(&self) -> u128 {
        let timestamp = u128::from(self.time.current_millis()) & ULID_TIMESTAMP_MASK;
        let random = rand::rng().random::<u128>() & ULID_RANDOM_MASK;
        (timestamp << ULID_RANDOM_BITS) | random
    }
}

impl<T> Generator for UlidGenerator<T>
where
    T: TimeSource,
{
    fn generate(&self) -> String {
        base32::encode_u128(self.next_id())
    }
}

use shardid::{
    CounterGenerator, Generator, SnowflakeGenerator, SystemClock, UNIX_EPOCH_MILLIS, UlidGenerator,
};

use crate::config::GeneratorKind;

/// The generator picked on the command line.
pub enum AnyGenerator {
    Counter(CounterGenerator),
    Snowflake(SnowflakeGenerator<SystemClock>),
    Ulid(UlidGenerator<SystemClock>),
}

impl AnyGenerator {
    pub fn new(kind: GeneratorKind, machine_id: u64) -> Self {
        match kind {
            GeneratorKind::Counter => Self::Counter(CounterGenerator::default()),
            GeneratorKind::Snowflake => {
                Self::Snowflake(SnowflakeGenerator::new(machine_id, SystemClock::default()))
            }
            // ULID timestamps count from the Unix epoch.
            GeneratorKind::Ulid => Self::Ulid(UlidGenerator::new(SystemClock::with_epoch(
                UNIX_EPOCH_MILLIS,
            ))),
        }
    }
}

impl Generator for AnyGenerator {
    fn generate(&self) -> String {
        match self {
            Self::Counter(g) => g.generate(),
            Self::Snowflake(g) => g.generate(),
            Self::Ulid(g) => g.generate(),
        }
    }
}

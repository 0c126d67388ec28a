use crate::{
    CounterGenerator, Generator, IdGenStatus, MAX_MACHINE_ID, MAX_SEQUENCE, SnowflakeGenerator,
    TimeSource, pack_snowflake, unpack_snowflake,
};
use core::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Mutex;
use std::thread::scope;

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.get()]
    }
}

trait IdGenStatusExt {
    fn unwrap_ready(self) -> u64;
    fn unwrap_pending(self) -> u64;
}

impl IdGenStatusExt for IdGenStatus {
    fn unwrap_ready(self) -> u64 {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_for } => yield_for,
        }
    }
}

#[test]
fn pack_masks_components() {
    let raw = pack_snowflake(42, MAX_MACHINE_ID + 1, MAX_SEQUENCE + 2);
    assert_eq!(unpack_snowflake(raw), (42, 0, 1));
    assert_eq!(unpack_snowflake(pack_snowflake(1, 2, 3)), (1, 2, 3));
}

#[test]
fn snowflake_sequence_increments_within_same_tick() {
    let generator = SnowflakeGenerator::new(1, MockTime { millis: 42 });

    let id1 = generator.try_next_id().unwrap_ready();
    let id2 = generator.try_next_id().unwrap_ready();
    let id3 = generator.try_next_id().unwrap_ready();

    assert_eq!(unpack_snowflake(id1), (42, 1, 0));
    assert_eq!(unpack_snowflake(id2), (42, 1, 1));
    assert_eq!(unpack_snowflake(id3), (42, 1, 2));
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn snowflake_pending_when_sequence_exhausted() {
    let generator = SnowflakeGenerator::from_components(0, 1, MAX_SEQUENCE, MockTime { millis: 0 });
    assert_eq!(generator.try_next_id().unwrap_pending(), 1);
}

#[test]
fn snowflake_pending_when_clock_behind() {
    let generator = SnowflakeGenerator::from_components(50, 1, 0, MockTime { millis: 42 });
    assert_eq!(generator.try_next_id().unwrap_pending(), 8);
}

#[test]
fn snowflake_rolls_over_to_next_tick() {
    let shared = SharedMockStepTime {
        clock: Rc::new(MockStepTime {
            values: vec![42, 43],
            index: Cell::new(0),
        }),
    };
    let generator = SnowflakeGenerator::new(3, shared.clone());

    for i in 0..=MAX_SEQUENCE {
        let (ts, machine, seq) = unpack_snowflake(generator.try_next_id().unwrap_ready());
        assert_eq!((ts, machine, seq), (42, 3, i));
    }
    assert_eq!(generator.try_next_id().unwrap_pending(), 1);

    shared.clock.index.set(1);
    let (ts, machine, seq) = unpack_snowflake(generator.try_next_id().unwrap_ready());
    assert_eq!((ts, machine, seq), (43, 3, 0));
}

#[test]
fn snowflake_tokens_are_fixed_width_and_sorted() {
    let generator = SnowflakeGenerator::new(9, MockTime { millis: 1_000 });
    let tokens: Vec<_> = (0..100).map(|_| generator.generate()).collect();
    assert!(tokens.iter().all(|t| t.len() == 13));
    assert!(tokens.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn snowflake_threaded_ids_are_unique() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 2_000;

    let generator = SnowflakeGenerator::new(0, crate::SystemClock::default());
    let seen = Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let local: Vec<_> = (0..IDS_PER_THREAD).map(|_| generator.generate()).collect();
                let mut seen = seen.lock().unwrap();
                for token in local {
                    assert!(seen.insert(token), "duplicate token");
                }
            });
        }
    });

    assert_eq!(seen.into_inner().unwrap().len(), THREADS * IDS_PER_THREAD);
}

#[test]
fn counter_counts_in_hex() {
    let generator = CounterGenerator::new(100_001);
    assert_eq!(generator.generate(), "186a1");
    assert_eq!(generator.generate(), "186a2");
    assert_eq!(generator.peek(), 100_003);

    let generator = CounterGenerator::default();
    assert_eq!(generator.generate(), "1");
}

#[test]
fn counter_threaded_ids_are_unique() {
    let generator = CounterGenerator::default();
    let seen = Mutex::new(HashSet::new());

    scope(|s| {
        for _ in 0..num_cpus::get().max(2) {
            s.spawn(|| {
                for _ in 0..1_000 {
                    assert!(seen.lock().unwrap().insert(generator.generate()));
                }
            });
        }
    });
}

#[test]
fn closures_are_generators() {
    let next = Cell::new(0_u32);
    let generator = || {
        next.set(next.get() + 1);
        format!("t{}", next.get())
    };
    assert_eq!(generator.generate(), "t1");
    assert_eq!(generator.generate(), "t2");
}

#[cfg(feature = "ulid")]
#[test]
fn ulid_tokens_embed_time_and_are_unique() {
    use crate::UlidGenerator;

    let generator = UlidGenerator::new(MockTime { millis: 1 });
    let raw = generator.next_id();
    assert_eq!(raw >> crate::ULID_RANDOM_BITS, 1);

    let tokens: HashSet<_> = (0..1_000).map(|_| generator.generate()).collect();
    assert_eq!(tokens.len(), 1_000);
    // 48-bit timestamp of 1 leaves the leading characters at zero.
    assert!(tokens.iter().all(|t| t.len() == 26 && t.starts_with("000000000")));
}

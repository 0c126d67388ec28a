//! Shard-aware composite IDs.
//!
//! A [`Cluster`] owns a fixed list of [`Shard`]s and does two things:
//!
//! - **Route**: given a composite ID such as `01JD5Q3M8Z@000001`, find the
//!   shard whose ID is embedded after the last separator ([`Cluster::one`],
//!   or [`Cluster::many`] for a batch).
//! - **Allocate**: pick the next writable shard round robin and mint a fresh
//!   composite ID for it ([`Cluster::next`]).
//!
//! How IDs are joined and split is up to a [`Combiner`]; the default
//! ([`DelimitedCombiner`]) uses `@` and six alphanumeric characters per shard
//! ID. Where the fragment comes from is up to a [`Generator`]:
//! [`CounterGenerator`], [`SnowflakeGenerator`], [`UlidGenerator`] (feature
//! `ulid`), or any `Fn() -> String`.
//!
//! ```
//! use std::sync::Arc;
//! use shardid::{Cluster, Shard, SnowflakeGenerator, SystemClock};
//!
//! let shards = vec![
//!     Arc::new(Shard::new("000001", "postgres://db-1/app", false)),
//!     Arc::new(Shard::new("000002", "postgres://db-2/app", false)),
//! ];
//! let cluster = Cluster::new(SnowflakeGenerator::new(1, SystemClock::default()), shards)?;
//!
//! let (id, shard) = cluster.next()?;
//! assert_eq!(shard.id(), "000001");
//! assert!(id.ends_with("@000001"));
//!
//! let owner = cluster.one(&id)?;
//! assert_eq!(owner.connection(), Some(&"postgres://db-1/app"));
//! # Ok::<(), shardid::Error>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod base32;
mod cluster;
mod combiner;
mod config;
mod error;
mod generator;
mod shard;
mod time;

pub use crate::base32::{U64_CHARS, U128_CHARS, encode_u64, encode_u128};
pub use crate::cluster::*;
pub use crate::combiner::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::shard::*;
pub use crate::time::*;

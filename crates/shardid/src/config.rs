use std::sync::Arc;

use crate::{
    cluster::Cluster,
    combiner::{Alphanumeric, DEFAULT_SEPARATOR, DEFAULT_SHARD_ID_LEN, DelimitedCombiner},
    error::Result,
    generator::Generator,
    shard::Shard,
};

/// Declarative description of one shard.
///
/// The connection is represented by its DSN string; processes that need a
/// live handle map the DSN to one themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShardConfig {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dsn: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub read_only: bool,
}

impl ShardConfig {
    pub fn new(id: impl Into<String>, dsn: Option<String>, read_only: bool) -> Self {
        Self {
            id: id.into(),
            dsn,
            read_only,
        }
    }

    pub fn to_shard(&self) -> Shard<String> {
        Shard::new(&self.id, self.dsn.clone(), self.read_only)
    }
}

/// Declarative description of a cluster using a [`DelimitedCombiner`] with
/// an [`Alphanumeric`] shard ID format.
///
/// With the `serde` feature this is the shape of a cluster file:
///
/// ```json
/// {
///   "separator": "@",
///   "shard_id_len": 6,
///   "shards": [
///     { "id": "000001", "dsn": "postgres://db-1/app" },
///     { "id": "000002", "dsn": "postgres://db-2/app", "read_only": true }
///   ]
/// }
/// ```
///
/// `separator` and `shard_id_len` may be omitted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterConfig {
    #[cfg_attr(feature = "serde", serde(default = "default_separator"))]
    pub separator: String,
    #[cfg_attr(feature = "serde", serde(default = "default_shard_id_len"))]
    pub shard_id_len: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shards: Vec<ShardConfig>,
}

#[cfg(feature = "serde")]
fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_owned()
}

#[cfg(feature = "serde")]
fn default_shard_id_len() -> usize {
    DEFAULT_SHARD_ID_LEN
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            shard_id_len: DEFAULT_SHARD_ID_LEN,
            shards: Vec::new(),
        }
    }
}

impl ClusterConfig {
    /// Builds the configured combiner.
    ///
    /// # Errors
    /// - [`ConfigError::EmptySeparator`](crate::ConfigError::EmptySeparator)
    pub fn combiner(&self) -> Result<DelimitedCombiner> {
        DelimitedCombiner::new(&self.separator, Alphanumeric::new(self.shard_id_len))
    }

    /// Creates one shard per entry, in order.
    pub fn to_shards(&self) -> Vec<Arc<Shard<String>>> {
        self.shards.iter().map(|s| Arc::new(s.to_shard())).collect()
    }

    /// Assembles a cluster from this description.
    ///
    /// # Errors
    /// Everything [`DelimitedCombiner::new`] and [`Cluster::with_combiner`]
    /// report.
    pub fn build<G>(&self, generator: G) -> Result<Cluster<String, G>>
    where
        G: Generator,
    {
        Cluster::with_combiner(generator, self.combiner()?, self.to_shards())
    }
}

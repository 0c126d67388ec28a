use std::sync::Arc;

use crate::{
    cluster::Cluster,
    combiner::{Combiner, DelimitedCombiner},
    error::{ConfigError, Result},
    generator::Generator,
    shard::Shard,
};

/// Assembles a [`Cluster`] step by step.
///
/// The combiner defaults to [`DelimitedCombiner::default`]. The generator has
/// no default: [`Self::build`] fails with [`ConfigError::MissingGenerator`]
/// if none was given.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shardid::{Alphanumeric, Cluster, CounterGenerator, DelimitedCombiner, Shard};
///
/// let cluster = Cluster::builder()
///     .generator(CounterGenerator::default())
///     .combiner(DelimitedCombiner::new("#", Alphanumeric::new(4))?)
///     .shard(Shard::new("eu01", "db-eu", false))
///     .shard(Shard::new("us01", "db-us", false))
///     .build()?;
///
/// let (id, _) = cluster.next()?;
/// assert_eq!(id, "1#eu01");
/// # Ok::<(), shardid::Error>(())
/// ```
pub struct ClusterBuilder<C, G, M = DelimitedCombiner> {
    generator: Option<G>,
    combiner: M,
    shards: Vec<Arc<Shard<C>>>,
}

impl<C, G> ClusterBuilder<C, G> {
    pub fn new() -> Self {
        Self {
            generator: None,
            combiner: DelimitedCombiner::default(),
            shards: Vec::new(),
        }
    }
}

impl<C, G> Default for ClusterBuilder<C, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, G, M> ClusterBuilder<C, G, M> {
    /// Sets the generator for new ID fragments.
    #[must_use]
    pub fn generator(mut self, generator: G) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replaces the combiner.
    #[must_use]
    pub fn combiner<N>(self, combiner: N) -> ClusterBuilder<C, G, N> {
        ClusterBuilder {
            generator: self.generator,
            combiner,
            shards: self.shards,
        }
    }

    /// Appends one shard.
    #[must_use]
    pub fn shard(mut self, shard: impl Into<Arc<Shard<C>>>) -> Self {
        self.shards.push(shard.into());
        self
    }

    /// Appends shards in iteration order.
    #[must_use]
    pub fn shards<I, S>(mut self, shards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<Shard<C>>>,
    {
        self.shards.extend(shards.into_iter().map(Into::into));
        self
    }
}

impl<C, G, M> ClusterBuilder<C, G, M>
where
    G: Generator,
    M: Combiner,
{
    /// Validates the configuration and creates the cluster.
    ///
    /// # Errors
    /// - [`ConfigError::MissingGenerator`] if no generator was set.
    /// - Anything [`Cluster::with_combiner`] reports.
    pub fn build(self) -> Result<Cluster<C, G, M>> {
        let generator = self.generator.ok_or(ConfigError::MissingGenerator)?;
        Cluster::with_combiner(generator, self.combiner, self.shards)
    }
}

mod builder;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

pub use builder::*;

use crate::{
    combiner::{Combiner, DelimitedCombiner},
    error::{ConfigError, Error, ManyError, Result, ValidationError},
    generator::Generator,
    shard::Shard,
};

/// Composite IDs grouped by the shard that owns them.
///
/// Within each group, IDs keep the relative order in which they were given.
pub type Groups<C> = HashMap<Arc<Shard<C>>, Vec<String>>;

/// A fixed set of shards with ID routing and round-robin allocation.
///
/// - `C`: the connection type each [`Shard`] carries.
/// - `G`: the [`Generator`] that supplies the fragment of new IDs.
/// - `M`: the [`Combiner`] that joins fragments and shard IDs.
///
/// The shard set is supplied once and never changes. New IDs are spread over
/// the shards that were writable **when the cluster was built**, in
/// construction order. Flipping a shard's read-only flag afterwards does not
/// add it to or remove it from that rotation; build a new cluster to change
/// it.
///
/// All operations take `&self` and can be called from many threads at once.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shardid::{Cluster, CounterGenerator, Error, Shard};
///
/// let shards = vec![
///     Arc::new(Shard::new("000001", "db-1", false)),
///     Arc::new(Shard::new("000002", "db-2", true)),
/// ];
/// let cluster = Cluster::new(CounterGenerator::new(100), shards)?;
///
/// let (id, shard) = cluster.next()?;
/// assert_eq!(id, "64@000001");
/// assert_eq!(shard.id(), "000001");
///
/// assert_eq!(cluster.one("abc@000002")?.id(), "000002");
/// assert_eq!(cluster.one("abc@999999").unwrap_err(), Error::ShardNotFound);
/// # Ok::<(), Error>(())
/// ```
pub struct Cluster<C, G, M = DelimitedCombiner> {
    generator: G,
    combiner: M,
    shards: Vec<Arc<Shard<C>>>,
    writable: Vec<Arc<Shard<C>>>,
    index: HashMap<String, Arc<Shard<C>>>,
    #[cfg(feature = "cache-padded")]
    counter: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    counter: AtomicU64,
}

impl<C, G> Cluster<C, G>
where
    G: Generator,
{
    /// Creates a cluster using the default combiner (`@` separator, six
    /// alphanumeric characters per shard ID).
    ///
    /// # Errors
    /// - [`ConfigError::NoShards`] if `shards` is empty.
    /// - [`Error::Validation`] for the first shard that has an empty or
    ///   malformed ID, no connection, or an ID already used earlier in the
    ///   list.
    pub fn new(generator: G, shards: impl IntoIterator<Item = Arc<Shard<C>>>) -> Result<Self> {
        Self::with_combiner(generator, DelimitedCombiner::default(), shards)
    }

    /// Starts a [`ClusterBuilder`] with the default combiner.
    pub fn builder() -> ClusterBuilder<C, G> {
        ClusterBuilder::new()
    }
}

impl<C, G, M> Cluster<C, G, M>
where
    G: Generator,
    M: Combiner,
{
    /// Creates a cluster with a custom [`Combiner`].
    ///
    /// # Errors
    /// Same as [`Cluster::new`], with shard IDs checked by
    /// `combiner.validate`.
    pub fn with_combiner(
        generator: G,
        combiner: M,
        shards: impl IntoIterator<Item = Arc<Shard<C>>>,
    ) -> Result<Self> {
        let shards: Vec<_> = shards.into_iter().collect();
        if shards.is_empty() {
            return Err(ConfigError::NoShards.into());
        }
        validate(&combiner, &shards)?;

        let index = shards
            .iter()
            .map(|s| (s.id().to_owned(), Arc::clone(s)))
            .collect();
        let writable: Vec<_> = shards.iter().filter(|s| !s.read_only()).cloned().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            shards = shards.len(),
            writable = writable.len(),
            "cluster assembled"
        );

        Ok(Self {
            generator,
            combiner,
            shards,
            writable,
            index,
            #[cfg(feature = "cache-padded")]
            counter: crossbeam_utils::CachePadded::new(AtomicU64::new(0)),
            #[cfg(not(feature = "cache-padded"))]
            counter: AtomicU64::new(0),
        })
    }

    /// Returns the shard that owns a composite ID.
    ///
    /// # Errors
    /// - [`Error::IdParseFailed`] if the combiner cannot split `id`.
    /// - [`Error::ShardNotFound`] if the embedded shard ID is not registered.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn one(&self, id: &str) -> Result<Arc<Shard<C>>> {
        let (_, shard_id) = self.combiner.extract(id)?;
        self.index
            .get(shard_id)
            .cloned()
            .ok_or(Error::ShardNotFound)
    }

    /// Groups many composite IDs by their owning shard.
    ///
    /// IDs are resolved in order, exactly like [`Self::one`]. Resolution stops
    /// at the first ID that fails; the returned [`ManyError`] carries that
    /// error together with everything grouped before it.
    ///
    /// # Errors
    /// - [`ManyError`] wrapping [`Error::IdParseFailed`] or
    ///   [`Error::ShardNotFound`] for the first unresolvable ID.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use shardid::{Cluster, CounterGenerator, Error, Shard};
    ///
    /// let shards: Vec<_> = ["000001", "000002"]
    ///     .into_iter()
    ///     .map(|id| Arc::new(Shard::new(id, (), false)))
    ///     .collect();
    /// let cluster = Cluster::new(CounterGenerator::default(), shards.clone())?;
    ///
    /// let groups = cluster.many(["1@000001", "2@000002", "3@000001"]).unwrap();
    /// assert_eq!(groups[&shards[0]], ["1@000001", "3@000001"]);
    /// assert_eq!(groups[&shards[1]], ["2@000002"]);
    ///
    /// let err = cluster.many(["1@000001", "bad", "2@000002"]).unwrap_err();
    /// assert_eq!(err.error, Error::IdParseFailed);
    /// assert_eq!((err.id.as_str(), err.index), ("bad", 1));
    /// assert_eq!(err.partial[&shards[0]], ["1@000001"]);
    /// # Ok::<(), Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    pub fn many<I, S>(&self, ids: I) -> Result<Groups<C>, ManyError<C>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups = Groups::new();
        for (index, id) in ids.into_iter().enumerate() {
            let id = id.as_ref();
            match self.one(id) {
                Ok(shard) => groups.entry(shard).or_default().push(id.to_owned()),
                Err(error) => {
                    return Err(ManyError {
                        partial: groups,
                        id: id.to_owned(),
                        index,
                        error,
                    });
                }
            }
        }
        Ok(groups)
    }

    /// Returns every shard in construction order.
    ///
    /// The vector is a copy; changing it does not affect the cluster.
    pub fn all(&self) -> Vec<Arc<Shard<C>>> {
        self.shards.clone()
    }

    /// Mints a new composite ID on the next writable shard.
    ///
    /// Shards are chosen round robin over the writable set fixed at
    /// construction: the first call picks its first shard, the second call
    /// the second, and so on, wrapping around.
    ///
    /// # Errors
    /// - [`Error::NoWritableShard`] if every shard was read-only when the
    ///   cluster was built.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next(&self) -> Result<(String, Arc<Shard<C>>)> {
        if self.writable.is_empty() {
            return Err(Error::NoWritableShard);
        }
        let shard = self.next_writable();
        let id = self.combiner.combine(&self.generator.generate(), shard.id());
        Ok((id, Arc::clone(shard)))
    }

    fn next_writable(&self) -> &Arc<Shard<C>> {
        // `fetch_add` returns the pre-increment value, i.e. `counter - 1`.
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        &self.writable[(n % self.writable.len() as u64) as usize]
    }

    /// Looks up a shard by its bare shard ID (not a composite ID).
    pub fn get(&self, shard_id: &str) -> Option<&Arc<Shard<C>>> {
        self.index.get(shard_id)
    }

    /// Returns the shards used for new IDs, in rotation order.
    pub fn writable(&self) -> &[Arc<Shard<C>>] {
        &self.writable
    }

    /// Returns the number of shards in the cluster. Never zero.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn combiner(&self) -> &M {
        &self.combiner
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

/// Checks each shard in order and reports the first rule it breaks.
fn validate<C, M>(combiner: &M, shards: &[Arc<Shard<C>>]) -> Result<(), ValidationError>
where
    M: Combiner,
{
    let mut seen = HashSet::with_capacity(shards.len());
    for shard in shards {
        let id = shard.id();
        if id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !combiner.validate(id) {
            return Err(ValidationError::InvalidId { id: id.to_owned() });
        }
        if shard.connection().is_none() {
            return Err(ValidationError::MissingConnection { id: id.to_owned() });
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId { id: id.to_owned() });
        }
    }
    Ok(())
}

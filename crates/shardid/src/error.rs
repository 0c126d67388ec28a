use core::fmt;

use crate::cluster::Groups;

/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `shardid` can produce.
///
/// Every variant is terminal: nothing in this crate retries, logs, or
/// swallows an error. Construction errors ([`Error::Config`] and
/// [`Error::Validation`]) mean no [`Cluster`] was created.
///
/// [`Cluster`]: crate::Cluster
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The cluster was assembled without a required collaborator.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A shard supplied at construction was rejected.
    #[error("shard validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A composite ID could not be split into a fragment and a valid shard ID.
    #[error("failed to parse id")]
    IdParseFailed,

    /// The embedded shard ID is well formed but no such shard is registered.
    #[error("shard not found")]
    ShardNotFound,

    /// A new ID was requested but no shard was writable at construction.
    #[error("could not find a writable shard")]
    NoWritableShard,
}

/// Missing or unusable construction parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("id generator cannot be nil")]
    MissingGenerator,

    #[error("cannot init cluster without shards")]
    NoShards,

    #[error("separator cannot be empty")]
    EmptySeparator,
}

/// The first rule a shard broke during cluster validation.
///
/// Rules are checked per shard in this order: non-empty ID, ID format,
/// connection present, ID unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("shard id is empty")]
    EmptyId,

    #[error("invalid shard id '{id}'")]
    InvalidId { id: String },

    #[error("database connection is nil for shard '{id}'")]
    MissingConnection { id: String },

    #[error("duplicate shard id '{id}'")]
    DuplicateId { id: String },
}

/// Returned by [`Cluster::many`] when an ID in the batch cannot be resolved.
///
/// Resolution stops at the first failing ID. Everything grouped before it is
/// kept in [`ManyError::partial`] so callers can inspect how far the batch
/// got, but the grouping is incomplete and should not be used as a routing
/// answer.
///
/// [`Cluster::many`]: crate::Cluster::many
pub struct ManyError<C> {
    /// Groups accumulated before the failing ID, in the same shape a
    /// successful call returns.
    pub partial: Groups<C>,
    /// The ID that failed to resolve, exactly as supplied.
    pub id: String,
    /// Position of [`ManyError::id`] in the input.
    pub index: usize,
    /// What [`Cluster::one`] reported for the failing ID.
    ///
    /// [`Cluster::one`]: crate::Cluster::one
    pub error: Error,
}

impl<C> ManyError<C> {
    /// Discards the partial grouping and returns the underlying error.
    pub fn into_error(self) -> Error {
        self.error
    }
}

// Hand-written so `C` (the connection type) never needs `Debug`.
impl<C> fmt::Debug for ManyError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManyError")
            .field("partial", &self.partial)
            .field("id", &self.id)
            .field("index", &self.index)
            .field("error", &self.error)
            .finish()
    }
}

impl<C> fmt::Display for ManyError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id '{}' at index {}: {}", self.id, self.index, self.error)
    }
}

impl<C> core::error::Error for ManyError<C> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<C> From<ManyError<C>> for Error {
    fn from(err: ManyError<C>) -> Self {
        err.error
    }
}

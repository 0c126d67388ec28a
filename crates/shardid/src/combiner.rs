#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{ConfigError, Error, Result};

/// Separator used by [`DelimitedCombiner::default`].
pub const DEFAULT_SEPARATOR: &str = "@";

/// Shard ID length used by [`Alphanumeric::default`].
pub const DEFAULT_SHARD_ID_LEN: usize = 6;

/// Builds and parses composite IDs.
///
/// A composite ID is an opaque fragment followed by a separator and the ID of
/// the shard that owns the record, e.g. `01JD5Q3M8Z@000001`. Implementations
/// also decide which strings are acceptable shard IDs.
pub trait Combiner {
    /// Returns `true` if `shard_id` is a well-formed shard ID.
    fn validate(&self, shard_id: &str) -> bool;

    /// Joins a fragment and a shard ID into a composite ID.
    ///
    /// This is purely syntactic; neither input is validated.
    fn combine(&self, fragment: &str, shard_id: &str) -> String;

    /// Splits a composite ID into its fragment and shard ID.
    ///
    /// # Errors
    /// - [`Error::IdParseFailed`] if the ID does not split into a non-empty
    ///   fragment and a valid shard ID.
    fn extract<'a>(&self, id: &'a str) -> Result<(&'a str, &'a str)>;
}

/// Decides whether a string is an acceptable shard ID.
///
/// Implemented for [`Alphanumeric`], for closures, and for [`regex::Regex`]
/// when the `regex` feature is enabled.
///
/// # Example
///
/// ```
/// use shardid::ShardIdValidator;
///
/// let numeric = |id: &str| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
/// assert!(numeric.is_valid("42"));
/// assert!(!numeric.is_valid("4a"));
/// ```
pub trait ShardIdValidator {
    fn is_valid(&self, shard_id: &str) -> bool;
}

impl<F> ShardIdValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, shard_id: &str) -> bool {
        self(shard_id)
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "regex")))]
#[cfg(feature = "regex")]
impl ShardIdValidator for regex::Regex {
    /// The pattern decides on its own anchoring, so supply `^...$` to match
    /// the whole shard ID.
    fn is_valid(&self, shard_id: &str) -> bool {
        self.is_match(shard_id)
    }
}

/// Accepts shard IDs made of exactly `len` ASCII letters or digits.
///
/// The default (`len == 6`) is the cluster-wide format: `[a-zA-Z0-9]{6}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Alphanumeric {
    len: usize,
}

impl Alphanumeric {
    pub const fn new(len: usize) -> Self {
        Self { len }
    }

    pub const fn width(&self) -> usize {
        self.len
    }
}

impl Default for Alphanumeric {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_ID_LEN)
    }
}

impl ShardIdValidator for Alphanumeric {
    fn is_valid(&self, shard_id: &str) -> bool {
        shard_id.len() == self.len && shard_id.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

/// A [`Combiner`] producing `fragment + separator + shard_id`.
///
/// Parsing always splits at the **last** separator, so a fragment may itself
/// contain the separator as long as the trailing segment alone is a valid
/// shard ID. Input is trimmed of surrounding whitespace in both directions.
///
/// # Example
///
/// ```
/// use shardid::{Combiner, DelimitedCombiner, Error};
///
/// let combiner = DelimitedCombiner::default();
///
/// let id = combiner.combine(" user@example.com ", "000001");
/// assert_eq!(id, "user@example.com@000001");
/// assert_eq!(combiner.extract(&id), Ok(("user@example.com", "000001")));
///
/// assert_eq!(combiner.extract("no-separator"), Err(Error::IdParseFailed));
/// assert_eq!(combiner.extract("100@00001"), Err(Error::IdParseFailed));
/// assert_eq!(combiner.extract("@000001"), Err(Error::IdParseFailed));
/// ```
#[derive(Clone, Debug)]
pub struct DelimitedCombiner<V = Alphanumeric> {
    separator: String,
    validator: V,
}

impl<V> DelimitedCombiner<V>
where
    V: ShardIdValidator,
{
    /// Creates a combiner with the given separator and shard ID validator.
    /// Surrounding whitespace is trimmed from the separator.
    ///
    /// # Errors
    /// - [`ConfigError::EmptySeparator`] if the separator is empty after
    ///   trimming.
    pub fn new(separator: &str, validator: V) -> Result<Self> {
        let separator = separator.trim();
        if separator.is_empty() {
            return Err(ConfigError::EmptySeparator.into());
        }
        Ok(Self {
            separator: separator.to_owned(),
            validator,
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }
}

impl Default for DelimitedCombiner {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            validator: Alphanumeric::default(),
        }
    }
}

impl<V> Combiner for DelimitedCombiner<V>
where
    V: ShardIdValidator,
{
    fn validate(&self, shard_id: &str) -> bool {
        self.validator.is_valid(shard_id)
    }

    fn combine(&self, fragment: &str, shard_id: &str) -> String {
        let (fragment, shard_id) = (fragment.trim(), shard_id.trim());
        let mut id = String::with_capacity(fragment.len() + self.separator.len() + shard_id.len());
        id.push_str(fragment);
        id.push_str(&self.separator);
        id.push_str(shard_id);
        id
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn extract<'a>(&self, id: &'a str) -> Result<(&'a str, &'a str)> {
        let (fragment, shard_id) = id
            .trim()
            .rsplit_once(self.separator.as_str())
            .ok_or(Error::IdParseFailed)?;
        if fragment.is_empty() || !self.validate(shard_id) {
            return Err(Error::IdParseFailed);
        }
        Ok((fragment, shard_id))
    }
}

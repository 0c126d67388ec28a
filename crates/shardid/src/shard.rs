use core::{
    fmt,
    hash::{Hash, Hasher},
};

use parking_lot::RwLock;

/// One partition of a sharded dataset.
///
/// A shard pairs an immutable identity with the connection (`C`) used to
/// reach its backing store, plus a read-only flag that can be flipped at any
/// time, e.g. to drain the shard. The connection is opaque here: the only
/// thing ever checked is that one is attached.
///
/// Shards are built by the owning process and handed to a [`Cluster`], which
/// keeps them behind an [`Arc`](std::sync::Arc) and never creates or drops
/// one itself.
///
/// Two shards are equal (and hash equally) when their IDs are equal, which is
/// what lets them key the map returned by [`Cluster::many`].
///
/// # Example
///
/// ```
/// use shardid::Shard;
///
/// let shard = Shard::new(" 000001 ", "postgres://db-1/app", false);
/// assert_eq!(shard.id(), "000001");
/// assert!(!shard.read_only());
///
/// shard.set_read_only(true);
/// assert!(shard.read_only());
/// ```
///
/// [`Cluster`]: crate::Cluster
/// [`Cluster::many`]: crate::Cluster::many
pub struct Shard<C> {
    id: String,
    connection: Option<C>,
    read_only: RwLock<bool>,
}

impl<C> Shard<C> {
    /// Creates a shard. Surrounding whitespace is trimmed from `id`.
    ///
    /// `connection` accepts either a connection value or `None`. A shard
    /// without a connection can be built but is rejected when the cluster is
    /// assembled.
    pub fn new(id: impl AsRef<str>, connection: impl Into<Option<C>>, read_only: bool) -> Self {
        Self {
            id: id.as_ref().trim().to_owned(),
            connection: connection.into(),
            read_only: RwLock::new(read_only),
        }
    }

    /// Returns the shard ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the connection to the backing store, if one is attached.
    pub fn connection(&self) -> Option<&C> {
        self.connection.as_ref()
    }

    /// Returns `true` if the shard currently refuses writes.
    pub fn read_only(&self) -> bool {
        *self.read_only.read()
    }

    /// Sets the read-only flag.
    ///
    /// The change is visible to [`Self::read_only`] immediately. It does not
    /// change which shards a cluster already built uses for new IDs; that
    /// set is fixed when the cluster is constructed.
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.write() = read_only;
    }
}

impl<C> PartialEq for Shard<C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C> Eq for Shard<C> {}

impl<C> Hash for Shard<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<C> fmt::Debug for Shard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shard")
            .field("id", &self.id)
            .field("connected", &self.connection.is_some())
            .field("read_only", &self.read_only())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread::scope;

    #[test]
    fn new_trims_id() {
        let shard = Shard::new("  000001\t", (), false);
        assert_eq!(shard.id(), "000001");
    }

    #[test]
    fn empty_id_is_kept_for_validation() {
        let shard = Shard::<()>::new("", None, false);
        assert_eq!(shard.id(), "");
        assert!(shard.connection().is_none());
    }

    #[test]
    fn connection_is_returned_untouched() {
        let shard = Shard::new("000001", String::from("db-1"), false);
        assert_eq!(shard.connection().map(String::as_str), Some("db-1"));
    }

    #[test]
    fn read_only_reflects_constructor() {
        for ro in [true, false] {
            let shard = Shard::new("000001", (), ro);
            assert_eq!(shard.read_only(), ro);
        }
    }

    #[test]
    fn set_read_only_toggles() {
        let shard = Shard::new("000001", (), false);
        for ro in [true, false, true, true, false] {
            shard.set_read_only(ro);
            assert_eq!(shard.read_only(), ro);
        }
    }

    #[test]
    fn equality_and_hash_follow_id() {
        use std::collections::HashSet;

        let a = Shard::new("000001", 1_u8, false);
        let b = Shard::new("000001", 2_u8, true);
        let c = Shard::new("000002", 1_u8, false);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn debug_does_not_require_debug_connection() {
        struct Opaque;
        let shard = Shard::new("000001", Opaque, true);
        let out = format!("{shard:?}");
        assert!(out.contains("000001"));
        assert!(out.contains("connected: true"));
        assert!(out.contains("read_only: true"));
    }

    #[test]
    fn flag_is_safe_under_concurrent_access() {
        let shard = Arc::new(Shard::new("000001", (), false));
        scope(|s| {
            for i in 0..8 {
                let shard = Arc::clone(&shard);
                s.spawn(move || {
                    for _ in 0..1_000 {
                        shard.set_read_only(i % 2 == 0);
                        let _ = shard.read_only();
                    }
                });
            }
        });
        shard.set_read_only(false);
        assert!(!shard.read_only());
    }
}

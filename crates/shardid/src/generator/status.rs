/// Outcome of a single non-blocking attempt to advance a generator.
///
/// - [`IdGenStatus::Ready`] carries the new raw ID.
/// - [`IdGenStatus::Pending`] means the current tick is exhausted (or another
///   thread won the race); retry after roughly `yield_for` milliseconds. A
///   `yield_for` of `0` means retry immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The raw 64-bit ID.
        id: u64,
    },
    /// No ID could be generated right now.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}

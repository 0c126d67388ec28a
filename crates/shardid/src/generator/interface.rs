/// Produces the raw, unique fragment of a new composite ID.
///
/// Every call must return a non-empty string, and results should never
/// repeat: the cluster appends a shard ID but does not check uniqueness.
/// Closures returning `String` implement this trait directly.
///
/// # Example
///
/// ```
/// use shardid::Generator;
///
/// let fixed = || String::from("abc");
/// assert_eq!(fixed.generate(), "abc");
/// ```
pub trait Generator {
    /// Returns a fresh token.
    fn generate(&self) -> String;
}

impl<F> Generator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}

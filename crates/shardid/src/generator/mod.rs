mod counter;
mod interface;
mod snowflake;
mod status;
#[cfg(test)]
mod tests;
#[cfg(feature = "ulid")]
mod ulid;

pub use counter::*;
pub use interface::*;
pub use snowflake::*;
pub use status::*;
#[cfg_attr(docsrs, doc(cfg(feature = "ulid")))]
#[cfg(feature = "ulid")]
pub use ulid::*;

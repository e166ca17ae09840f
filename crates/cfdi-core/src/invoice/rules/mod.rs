//! Field rules for CFDI documents.

pub mod amounts;
pub mod dates;
pub mod stamp;

pub use amounts::parse_amount;
pub use dates::split_timestamp;
pub use stamp::{find_stamp, STAMP_KEY, STAMP_SUFFIX};

//! Format converters for rule-set inputs.

mod list;
mod source;

pub use list::{AddressList, ListReader};
pub use source::{IpCidrRule, SourceDocument};

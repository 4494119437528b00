pub mod error;
pub mod expand;
pub mod facts;
pub mod labels;

#[cfg(test)]
mod test_util;

pub use error::CoreError;
pub use expand::{Expander, Token, DEFAULT_EXPANSION_CAPACITY};
pub use facts::{FactProvider, StaticFacts, SystemFacts};
pub use labels::{Label, LabelStore, LabelStoreError};

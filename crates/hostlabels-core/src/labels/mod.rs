//! Host label management.
//!
//! Provides the ordered in-memory [`LabelStore`], the line-oriented label
//! file codec (parse, raw serialise, expanded format), and the label types.

mod codec;
mod store;
mod types;

pub use codec::{
    format_labels, format_labels_into, load_labels, parse_labels, save_labels, serialize_labels,
};
pub use store::LabelStore;
pub use types::{Label, LabelStoreError};

//! Data-shaping stages between the loader and the renderer.
//!
//! - `operations`: column operations (trim, case, numeric/date coercion)
//! - `normalize`: sentinel replacement and declared column operations
//! - `partition`: rollup rows into disjoint views
//! - `order`: categorical and multi-key ordering
//! - `label`: composite display labels
//! - `reshape`: pivot, join and filters
//! - `pipeline`: load → normalize → partition in one call

pub mod label;
pub mod normalize;
pub mod operations;
pub mod order;
pub mod partition;
pub mod pipeline;
pub mod reshape;

pub use label::{LabelBuilder, LabelPart};
pub use normalize::{ColumnStep, Normalizer, NULL_SENTINEL};
pub use operations::ColumnOp;
pub use order::{OrderingSequence, Orderer, SortKey, UnmatchedPolicy};
pub use partition::{Partition, Partitioner, ViewKey};
pub use pipeline::Shaping;
pub use reshape::{filter_equals, filter_present, left_join, pivot, unique_in_order, Pivot};

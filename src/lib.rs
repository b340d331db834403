pub mod ibs_tree;
pub mod interval;
mod types;

pub use ibs_tree::IbsTree;
pub use interval::{Interval, IntervalBounds};

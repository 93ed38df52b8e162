pub mod group;
pub mod reorder;
pub mod token;

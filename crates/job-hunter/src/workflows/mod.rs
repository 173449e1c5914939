pub mod apply;
pub mod listings;

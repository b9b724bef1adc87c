pub mod cache;
pub mod catalog;

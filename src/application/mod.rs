//! Application services layer.

pub mod blog;
pub mod error;
pub mod pagination;
pub mod render;
pub mod repos;
pub mod site;

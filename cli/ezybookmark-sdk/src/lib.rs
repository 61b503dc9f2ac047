pub mod models;
pub mod utils;

pub use ezybookmark_catalog as catalog;

pub mod fixtures;
pub mod proptest;

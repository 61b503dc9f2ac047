pub mod catalog_state;
pub mod notice;
pub mod page;
pub mod search;
pub mod selection;
pub mod store;

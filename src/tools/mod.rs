pub mod analyst;
pub mod registry;
pub mod search;

pub mod backend;
pub mod limits;

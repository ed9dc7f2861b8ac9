pub mod schema;
pub mod types;

pub use schema::{ApiSchema, build_schema};

pub mod charts;
pub mod envelope;
pub mod schema;

pub mod clients;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod fallback;
pub mod normalize;
pub mod render;
pub mod strategies;

pub use config::ServiceConfig;
pub use dispatcher::{Collaborators, Dispatcher};
pub use errors::{DispatchError, Fault};

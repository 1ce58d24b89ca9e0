mod error;
mod model;
mod service;
mod store;

pub use error::*;
pub use model::*;
pub use service::*;

mod error;
mod run;
mod sync;

pub use error::*;
pub use sync::*;

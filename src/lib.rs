pub mod constraint;
pub mod domain;
pub mod error;
pub mod math;
pub mod sketch;
pub mod sync;

pub use error::{ParietisError, Result};

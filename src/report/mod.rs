//! Text reports for streamed measurement results.

pub use result::*;
pub use template::*;

mod result;
mod template;

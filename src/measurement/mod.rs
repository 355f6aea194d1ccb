pub use builder::*;
pub use types::*;

mod builder;
mod types;

pub mod client;
pub mod error;
pub mod json_extract;
pub mod prompts;

pub use client::*;
pub use error::*;
pub use json_extract::*;
pub use prompts::*;

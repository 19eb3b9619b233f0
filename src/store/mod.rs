pub mod locations;
pub mod objects;
pub mod samples;

pub use locations::*;
pub use objects::*;
pub use samples::*;

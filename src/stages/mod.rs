pub mod alerts;
pub mod classify;
pub mod fusion;
pub mod pipeline;
pub mod semantic;
pub mod speaker;
pub mod transcribe;

pub use alerts::*;
pub use classify::*;
pub use fusion::*;
pub use pipeline::*;
pub use semantic::*;
pub use speaker::*;
pub use transcribe::*;

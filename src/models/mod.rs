pub mod alert;
pub mod assessment;
pub mod clip;
pub mod location;
pub mod matching;
pub mod transcript;

pub use alert::*;
pub use assessment::*;
pub use clip::*;
pub use location::*;
pub use matching::*;
pub use transcript::*;

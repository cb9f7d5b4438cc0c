pub mod highlight;
pub mod navigation;
pub mod sequence;
pub mod session;
pub mod step;

pub use highlight::Highlight;
pub use navigation::Navigator;
pub use sequence::{SequenceError, StepSequence};
pub use session::Session;
pub use step::{Phase, Step, StepOp, StepOutput};

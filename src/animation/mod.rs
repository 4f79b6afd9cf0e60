//! Keyframe animation
//!
//! - [`KeyframeTrack`]: one independently timed list of samples
//! - [`NodeChannel`]: translation/rotation/scale tracks of one node
//! - [`AnimationClip`]: a named set of node channels
//! - [`PoseEvaluator`]: walks the node tree and produces the bone palette

mod values;
pub mod clip;
pub mod evaluator;
pub mod tracks;

pub use clip::{AnimationClip, NodeChannel};
pub use evaluator::PoseEvaluator;
pub use tracks::{KeyframeRangeError, KeyframeTrack};
pub use values::Interpolatable;

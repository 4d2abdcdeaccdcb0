//! Resolution layer: the visibility-scoped walk, its outcome types, and
//! batch resolution.

pub mod batch;
pub mod result;
pub mod walker;

pub use batch::{resolve_batch, Request};
pub use result::{NotFoundReason, ResolutionResult};
pub use walker::{resolve, ResolutionWalker, TracedResolution, WalkCursor, WalkPlan, WalkStep};

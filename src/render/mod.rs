//! Render output: page frames and diff protocol

mod diff;
mod frame;

pub use diff::{RenderDiff, RenderPatch};
pub use frame::PageFrame;

//! Display-list recording and replay.
//!
//! A [`DisplayListBuilder`] records drawing, attribute, transform, clip,
//! and save/restore operations into an immutable [`DisplayList`] while
//! concurrently computing its derived metadata: accumulated bounds, an
//! optional spatial index, opacity compatibility, and a depth estimate for
//! later compositing decisions. The list replays through a
//! [`DisplayListReceiver`].

pub mod accumulator;
pub mod builder;
pub mod layer;
pub mod list;
pub mod matrix_clip;
pub mod op_flags;
pub mod ops;
pub mod receiver;
pub mod rtree;

pub use builder::DisplayListBuilder;
pub use layer::MAX_CULL_RECT;
pub use list::DisplayList;
pub use matrix_clip::ClipOp;
pub use op_flags::OpFlags;
pub use ops::{DisplayListOp, PointMode, SaveLayerOptions};
pub use receiver::DisplayListReceiver;
pub use rtree::RTree;

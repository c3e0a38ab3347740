//! Visualization/aggregation core for the journey board.
//!
//! The tree model and every component here is synchronous and free of I/O:
//! mutations produce new tree values, the aggregator is a pure function of
//! (tree, registry, filter), and the highlight/viewport state machines are
//! driven directly by input callbacks. Persistence and rendering live in the
//! surrounding application.

pub mod aggregate;
pub mod highlight;
pub mod performers;
pub mod reorder;
pub mod tree;
pub mod viewport;

pub use aggregate::{
    aggregate, Column, GridLayout, PerformerFilter, PlaceholderReason, StageSpan, TaskSpan,
};
pub use highlight::{EntryDetail, Highlight, HighlightEngine};
pub use performers::{ListenerId, PerformerRegistry};
pub use reorder::{apply_drop, container_id, parse_container_id, reorder_slice, DropResult};
pub use tree::{JourneyTree, MoveStep};
pub use viewport::{Point, Size, ViewportController, INITIAL_ZOOM, MAX_ZOOM, MIN_ZOOM};

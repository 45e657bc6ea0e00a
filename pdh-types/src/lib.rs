//! Core types shared by every product datahub crate.
//!
//! - [`product`], [`flow`], [`composition`]: one struct per source sheet row
//! - [`models`]: derived, serializable outputs handed to chart renderers
//! - [`window`]: the validated year window and the selector bounds

pub mod composition;
pub mod flow;
pub mod models;
pub mod product;
pub mod window;

pub use composition::CompositionRecord;
pub use flow::FlowRecord;
pub use models::{CumulativeTotal, Lifespan, MaterialShare, WindowedFlow, YearValue};
pub use product::ProductRecord;
pub use window::{InvalidWindow, WindowBounds, YearWindow};

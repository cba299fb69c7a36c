//! A headless layout engine for section-grouped virtual grids with sticky section headers.
//!
//! Data is a sequence of sections, each a header followed by zero or more items. Items flow
//! across a fixed number of columns with per-item spans; headers always take a full row. Only
//! the rows intersecting the viewport are materialized, and the header of the first visible
//! section stays pinned at the viewport top until the next section's header pushes it off.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - a [`SectionSource`] describing section and item counts
//! - an [`ElementHost`] that creates, measures, positions and recycles elements
//! - viewport size and scroll deltas
//!
//! The engine owns layout state (the row ledger, the floating header, the scroll anchor) and
//! calls the host synchronously; it never spawns work of its own.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod grid;
mod host;
mod options;
mod row;
mod section_index;
mod source;
mod span;
mod state;
mod sticky;
mod types;


pub use error::GridError;
pub use grid::{LayoutState, StickyHeaderGrid};
pub use host::ElementHost;
pub use options::{GridOptions, OnSettleCallback};
pub use row::{PlacedElement, Row};
pub use section_index::{Section, SectionIndex, Slot};
pub use source::SectionSource;
pub use span::{DefaultSpanLookup, SpanFn, SpanGeometry, SpanLookup};
pub use state::{AnchorState, LayoutSummary};
pub use sticky::FloatingHeader;
pub use types::{Bounds, ElementKind, Padding, SpanAssignment, Viewport};

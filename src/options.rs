use alloc::sync::Arc;

use crate::{DefaultSpanLookup, LayoutSummary, SpanLookup};

/// A diagnostic callback fired at the end of every settled layout or scroll pass.
pub type OnSettleCallback = Arc<dyn Fn(&LayoutSummary) + Send + Sync>;

/// Configuration for [`crate::StickyHeaderGrid`].
///
/// Cheap to clone: the span lookup and callback live behind `Arc`s.
pub struct GridOptions {
    /// Number of columns in the grid. Must be at least 1.
    pub columns: u32,

    /// Span source for items. Headers always take a full row and never consult it.
    pub spans: Arc<dyn SpanLookup + Send + Sync>,

    /// Optional hook observing each settled pass (anchor, ledger size, overlay state).
    pub on_settle: Option<OnSettleCallback>,
}

impl GridOptions {
    pub fn new(columns: u32) -> Self {
        Self {
            columns,
            spans: Arc::new(DefaultSpanLookup),
            on_settle: None,
        }
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_spans(mut self, spans: impl SpanLookup + Send + Sync + 'static) -> Self {
        self.spans = Arc::new(spans);
        self
    }

    pub fn with_on_settle(
        mut self,
        on_settle: Option<impl Fn(&LayoutSummary) + Send + Sync + 'static>,
    ) -> Self {
        self.on_settle = on_settle.map(|f| Arc::new(f) as _);
        self
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Clone for GridOptions {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns,
            spans: Arc::clone(&self.spans),
            on_settle: self.on_settle.clone(),
        }
    }
}

impl core::fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOptions")
            .field("columns", &self.columns)
            .field("on_settle", &self.on_settle.is_some())
            .finish_non_exhaustive()
    }
}

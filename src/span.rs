use crate::SpanAssignment;

/// Per-item column spans.
///
/// `span_size` says how many columns an item occupies; `column_index` says which column it
/// starts in. The provided `column_index` derives the answer from `span_size` by replaying the
/// section from its first item, which is `O(item)` per call and quadratic over a full section
/// scan. Implementations backing large sections should override it with a cached or closed-form
/// answer that agrees with `span_size`.
pub trait SpanLookup {
    /// Number of columns occupied by `item` of `section`. Expected in `1..=columns`; larger
    /// values are laid out as a full row.
    fn span_size(&self, _section: usize, _item: usize) -> u32 {
        1
    }

    /// Column in which `item` of `section` starts, in `0..columns`.
    fn column_index(&self, section: usize, item: usize, columns: u32) -> u32 {
        replay_column_index(|i| self.span_size(section, i), item, columns)
    }
}

/// Every item spans one column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultSpanLookup;

impl SpanLookup for DefaultSpanLookup {
    fn span_size(&self, _section: usize, _item: usize) -> u32 {
        1
    }

    fn column_index(&self, _section: usize, item: usize, columns: u32) -> u32 {
        (item % columns.max(1) as usize) as u32
    }
}

/// Adapts a closure `(section, item) -> span` into a [`SpanLookup`] using the replayed
/// column index.
pub struct SpanFn<F>(pub F);

impl<F: Fn(usize, usize) -> u32> SpanLookup for SpanFn<F> {
    fn span_size(&self, section: usize, item: usize) -> u32 {
        (self.0)(section, item)
    }
}

impl<F> core::fmt::Debug for SpanFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SpanFn(..)")
    }
}

/// Replays spans `0..item` to find the start column of `item`.
///
/// The running column resets to 0 when a row is filled exactly, and an item that would overflow
/// the current row wraps to column 0 of the next one. An item whose own span covers the whole
/// row always starts at column 0.
pub(crate) fn replay_column_index(
    span_of: impl Fn(usize) -> u32,
    item: usize,
    columns: u32,
) -> u32 {
    let own = span_of(item).max(1);
    if own >= columns {
        return 0;
    }

    let mut column = 0u32;
    for i in 0..item {
        let span = span_of(i).max(1);
        column = column.saturating_add(span);
        if column == columns {
            column = 0;
        } else if column > columns {
            // `i` wrapped onto a fresh row.
            column = span;
        }
    }

    if column.saturating_add(own) <= columns {
        column
    } else {
        0
    }
}

/// Pixel math for a row of `columns` equal columns spread over `width` pixels.
///
/// `width / columns` pixels per column, with the remainder handed out one pixel at a time to the
/// lowest-indexed columns, so a row covering every column sums to exactly `width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanGeometry {
    columns: u32,
    width: u32,
}

impl SpanGeometry {
    pub fn new(columns: u32, width: u32) -> Self {
        Self {
            columns: columns.max(1),
            width,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    fn unit(&self) -> u32 {
        self.width / self.columns
    }

    fn remainder(&self) -> u32 {
        self.width - self.unit() * self.columns
    }

    /// Normalizes a raw span/column pair so it fits inside the row.
    pub fn assignment(&self, column: u32, span: u32) -> SpanAssignment {
        let span = span.clamp(1, self.columns);
        let column = if column.saturating_add(span) > self.columns {
            0
        } else {
            column
        };
        SpanAssignment { column, span }
    }

    pub fn column_width(&self, column: u32, span: u32) -> u32 {
        let correction = self.remainder().saturating_sub(column).min(span);
        self.unit() * span + correction
    }

    pub fn column_left(&self, column: u32) -> u32 {
        self.unit() * column + self.remainder().min(column)
    }
}

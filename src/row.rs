use alloc::vec::Vec;

use crate::section_index::Slot;
use crate::types::to_i32;
use crate::{
    Bounds, ElementHost, ElementKind, GridError, SectionIndex, SectionSource, SpanAssignment,
    SpanGeometry, SpanLookup,
};

/// An element the host materialized for one flat position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedElement<E> {
    pub position: usize,
    pub kind: ElementKind,
    pub span: SpanAssignment,
    /// Where the host was last told to put the element, stick translation included.
    pub bounds: Bounds,
    pub element: E,
}

/// One ledger entry: a header row (exactly one element) or a run of items from one section.
///
/// `top`/`bottom` always describe the row's natural (unstuck) position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row<E> {
    header: bool,
    section: usize,
    first_position: usize,
    top: i32,
    bottom: i32,
    elements: Vec<PlacedElement<E>>,
}

impl<E> Row<E> {
    pub fn is_header(&self) -> bool {
        self.header
    }

    pub fn section(&self) -> usize {
        self.section
    }

    pub fn first_position(&self) -> usize {
        self.first_position
    }

    /// Number of elements (flat positions) in the row.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Flat position just past the row.
    pub fn end_position(&self) -> usize {
        self.first_position + self.elements.len()
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn elements(&self) -> &[PlacedElement<E>] {
        &self.elements
    }

    pub fn last_element(&self) -> Option<&PlacedElement<E>> {
        self.elements.last()
    }

    /// `true` when the row lies entirely outside `[top, bottom]`.
    pub(crate) fn is_outside(&self, top: i32, bottom: i32) -> bool {
        self.bottom < top || self.top > bottom
    }

    /// Moves the row and all of its elements by `dy`.
    pub(crate) fn offset<H: ElementHost<Element = E>>(&mut self, host: &mut H, dy: i32) {
        if dy == 0 {
            return;
        }
        self.top += dy;
        self.bottom += dy;
        self.translate_elements(host, dy);
    }

    /// Moves only the elements by `dy`, leaving the row's natural geometry untouched.
    pub(crate) fn translate_elements<H: ElementHost<Element = E>>(&mut self, host: &mut H, dy: i32) {
        if dy == 0 {
            return;
        }
        for placed in &mut self.elements {
            placed.bounds = placed.bounds.translated(dy);
            host.translate(&mut placed.element, 0, dy);
        }
    }

    /// Wraps an already placed header element into a header row.
    pub(crate) fn from_header(section: usize, placed: PlacedElement<E>) -> Self {
        Self {
            header: true,
            section,
            first_position: placed.position,
            top: placed.bounds.top,
            bottom: placed.bounds.bottom,
            elements: alloc::vec![placed],
        }
    }

    /// Unwraps a header row back into its single element.
    pub(crate) fn into_header(mut self) -> Option<PlacedElement<E>> {
        if !self.header {
            return None;
        }
        self.elements.pop()
    }

    pub(crate) fn release<H: ElementHost<Element = E>>(self, host: &mut H) {
        for placed in self.elements {
            host.release(placed.element);
        }
    }
}

/// Builds one row at a time for the engine.
///
/// Holds borrowed views of everything needed to decide what goes into a row and how wide each
/// element is; the host is passed per call so the engine can keep mutating its ledger.
pub(crate) struct RowFiller<'a, S: ?Sized> {
    pub index: &'a SectionIndex,
    pub source: &'a S,
    pub spans: &'a dyn SpanLookup,
    pub geometry: SpanGeometry,
    pub left: i32,
    pub available_height: u32,
}

struct Measured<E> {
    position: usize,
    kind: ElementKind,
    span: SpanAssignment,
    width: u32,
    height: u32,
    element: E,
}

impl<'a, S: SectionSource + ?Sized> RowFiller<'a, S> {
    fn span_of(&self, section: usize, item: usize) -> u32 {
        let span = self.spans.span_size(section, item);
        if span == 0 {
            gwarn!(section, item, "span_size returned 0; using 1");
            return 1;
        }
        span
    }

    fn column_of(&self, section: usize, item: usize) -> u32 {
        self.spans
            .column_index(section, item, self.geometry.columns())
    }

    /// Walks back from `position` to the first element of its row.
    ///
    /// A row starts at a header slot, at the first item of a section, or at an item whose
    /// column index is 0.
    pub fn row_start(&self, position: usize) -> Result<usize, GridError> {
        let section = self.index.position_to_section(position)?;
        let Slot::Item(mut item) = self.index.local_slot(section, position)? else {
            return Ok(position);
        };
        let mut position = position;
        while item > 0 && self.column_of(section, item) != 0 {
            item -= 1;
            position -= 1;
        }
        Ok(position)
    }

    /// Builds the row starting at `position` with its top edge at `top`.
    pub fn row_at<H: ElementHost>(
        &self,
        host: &mut H,
        position: usize,
        top: i32,
    ) -> Result<Row<H::Element>, GridError> {
        let section = self.index.position_to_section(position)?;
        match self.index.local_slot(section, position)? {
            Slot::Header => Ok(self.header_row(host, section, position, top, true)),
            Slot::Item(_) => self.fill_forward(host, position, top),
        }
    }

    /// Builds the row ending at `position` with its bottom edge at `bottom`.
    pub fn row_ending_at<H: ElementHost>(
        &self,
        host: &mut H,
        position: usize,
        bottom: i32,
    ) -> Result<Row<H::Element>, GridError> {
        let section = self.index.position_to_section(position)?;
        match self.index.local_slot(section, position)? {
            Slot::Header => Ok(self.header_row(host, section, position, bottom, false)),
            Slot::Item(_) => self.fill_backward(host, position, bottom),
        }
    }

    /// Acquires, measures and places a full-width header element.
    ///
    /// `edge` is the row's top when `downward`, its bottom otherwise.
    pub fn header_row<H: ElementHost>(
        &self,
        host: &mut H,
        section: usize,
        position: usize,
        edge: i32,
        downward: bool,
    ) -> Row<H::Element> {
        let placed = self.place_header(host, section, position, edge, downward);
        Row::from_header(section, placed)
    }

    /// Acquires and places a header element without creating a row (the floating overlay uses
    /// this directly).
    pub fn place_header<H: ElementHost>(
        &self,
        host: &mut H,
        section: usize,
        position: usize,
        edge: i32,
        downward: bool,
    ) -> PlacedElement<H::Element> {
        let width = self.geometry.width();
        let kind = ElementKind::Header(self.source.header_type(section));
        let mut element = host.acquire(position, kind);
        let height = to_i32(host.measure(&mut element, width, self.available_height));
        let top = if downward { edge } else { edge - height };
        let bounds = Bounds {
            left: self.left,
            top,
            right: self.left + to_i32(width),
            bottom: top + height,
        };
        host.place(&mut element, bounds);
        PlacedElement {
            position,
            kind,
            span: self.full_row(),
            bounds,
            element,
        }
    }

    /// Re-places an existing header element (taken over from the floating overlay) as a header
    /// row. `edge` is the row's top when `downward`, its bottom otherwise.
    pub fn adopt_header<H: ElementHost>(
        &self,
        host: &mut H,
        section: usize,
        mut placed: PlacedElement<H::Element>,
        edge: i32,
        downward: bool,
    ) -> Row<H::Element> {
        let height = to_i32(placed.bounds.height());
        let top = if downward { edge } else { edge - height };
        placed.bounds = Bounds {
            left: self.left,
            top,
            right: self.left + to_i32(self.geometry.width()),
            bottom: top + height,
        };
        host.place(&mut placed.element, placed.bounds);
        Row::from_header(section, placed)
    }

    pub fn full_row(&self) -> SpanAssignment {
        SpanAssignment {
            column: 0,
            span: self.geometry.columns(),
        }
    }

    /// Fills one item row walking forward from `position`, top edge at `top`.
    ///
    /// The row ends when the next item's span no longer fits in the remaining columns or the
    /// section runs out of items, whichever comes first.
    pub fn fill_forward<H: ElementHost>(
        &self,
        host: &mut H,
        position: usize,
        top: i32,
    ) -> Result<Row<H::Element>, GridError> {
        let section = self.index.position_to_section(position)?;
        let mut item = self.index.item_local_position(section, position)?;
        let count = self.index.item_count(section)?;
        let columns = self.geometry.columns();

        let mut span = self.span_of(section, item);
        let mut column = self.column_of(section, item);
        let mut measured = Vec::new();
        let mut pos = position;
        loop {
            measured.push(self.measure_item(host, section, item, pos, column, span));

            item += 1;
            pos += 1;
            if item >= count {
                break;
            }
            column = measured[measured.len() - 1].span.end();
            span = self.span_of(section, item);
            if column.saturating_add(span.min(columns)) > columns {
                break;
            }
        }

        Ok(self.layout_items(host, section, measured, top, true))
    }

    /// Fills one item row walking backward from `position` (the row's last item), bottom edge
    /// at `bottom`.
    ///
    /// Starting from the column of `position`, preceding items are added while their span still
    /// fits in the columns to the left and the section start has not been crossed.
    pub fn fill_backward<H: ElementHost>(
        &self,
        host: &mut H,
        position: usize,
        bottom: i32,
    ) -> Result<Row<H::Element>, GridError> {
        let section = self.index.position_to_section(position)?;
        let mut item = self.index.item_local_position(section, position)?;
        let columns = self.geometry.columns();

        let mut span = self.span_of(section, item);
        let mut column = self.column_of(section, item);
        let mut measured = Vec::new();
        let mut pos = position;
        loop {
            let placed = self.measure_item(host, section, item, pos, column, span);
            let placed_column = placed.span.column;
            measured.push(placed);

            if item == 0 {
                break;
            }
            let prev = self.span_of(section, item - 1).min(columns);
            if prev > placed_column {
                break;
            }
            item -= 1;
            pos -= 1;
            column = placed_column - prev;
            span = prev;
        }
        measured.reverse();

        Ok(self.layout_items(host, section, measured, bottom, false))
    }

    fn measure_item<H: ElementHost>(
        &self,
        host: &mut H,
        section: usize,
        item: usize,
        position: usize,
        column: u32,
        span: u32,
    ) -> Measured<H::Element> {
        let span = self.geometry.assignment(column, span);
        let width = self.geometry.column_width(span.column, span.span);
        let kind = ElementKind::Item(self.source.item_type(section, item));
        let mut element = host.acquire(position, kind);
        let height = host.measure(&mut element, width, self.available_height);
        Measured {
            position,
            kind,
            span,
            width,
            height,
            element,
        }
    }

    fn layout_items<H: ElementHost>(
        &self,
        host: &mut H,
        section: usize,
        measured: Vec<Measured<H::Element>>,
        edge: i32,
        downward: bool,
    ) -> Row<H::Element> {
        debug_assert!(!measured.is_empty(), "a row holds at least one element");
        let height = measured
            .iter()
            .map(|m| to_i32(m.height))
            .max()
            .unwrap_or(0);
        let top = if downward { edge } else { edge - height };
        let first_position = measured.first().map_or(0, |m| m.position);

        let mut elements = Vec::with_capacity(measured.len());
        for m in measured {
            let left = self.left + to_i32(self.geometry.column_left(m.span.column));
            let bounds = Bounds {
                left,
                top,
                right: left + to_i32(m.width),
                bottom: top + to_i32(m.height),
            };
            let mut element = m.element;
            host.place(&mut element, bounds);
            elements.push(PlacedElement {
                position: m.position,
                kind: m.kind,
                span: m.span,
                bounds,
                element,
            });
        }

        Row {
            header: false,
            section,
            first_position,
            top,
            bottom: top + height,
            elements,
        }
    }
}

use alloc::collections::VecDeque;

use crate::row::RowFiller;
use crate::sticky::FloatingHeader;
use crate::{
    AnchorState, ElementHost, GridError, GridOptions, LayoutSummary, PlacedElement, Row, Section,
    SectionIndex, SectionSource, SpanGeometry, Viewport,
};

/// Where the engine is in its layout lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutState {
    /// Nothing is laid out: no source, no slots, or a zero-size viewport.
    Empty,
    /// Inside a layout or scroll pass.
    LayingOut,
    /// The ledger covers the viewport and the anchor is recorded.
    Settled,
}

/// The ordered rows currently backing the viewport, plus the sticky header bookkeeping.
#[derive(Debug)]
pub(crate) struct Ledger<E> {
    pub(crate) rows: VecDeque<Row<E>>,
    pub(crate) floating: Option<FloatingHeader<E>>,
    /// Translation applied to the stuck real header row.
    pub(crate) stick_offset: i32,
    /// First position of the header row carrying `stick_offset`.
    pub(crate) stuck: Option<usize>,
}

impl<E> Ledger<E> {
    fn new() -> Self {
        Self {
            rows: VecDeque::new(),
            floating: None,
            stick_offset: 0,
            stuck: None,
        }
    }

    pub(crate) fn release_rows<H: ElementHost<Element = E>>(&mut self, host: &mut H) {
        for row in self.rows.drain(..) {
            row.release(host);
        }
        self.stick_offset = 0;
        self.stuck = None;
    }

    fn release_all<H: ElementHost<Element = E>>(&mut self, host: &mut H) {
        self.release_rows(host);
        self.release_floating(host);
    }

    fn offset_rows<H: ElementHost<Element = E>>(&mut self, host: &mut H, dy: i32) {
        if dy == 0 {
            return;
        }
        for row in &mut self.rows {
            row.offset(host, dy);
        }
    }

    /// Index of the first row whose bottom edge is below `top`.
    pub(crate) fn first_visible(&self, top: i32) -> Option<usize> {
        self.rows.iter().position(|row| row.bottom() > top)
    }

    fn anchor(&self, top: i32) -> Option<AnchorState> {
        let row = self
            .first_visible(top)
            .and_then(|i| self.rows.get(i))
            .or_else(|| self.rows.front())?;
        Some(AnchorState::new(row.first_position(), row.top() - top))
    }

    /// Appends rows from `position` downward, starting at `top`, until the ledger reaches
    /// `bottom` or the data runs out.
    fn fill_down<S, H>(
        &mut self,
        host: &mut H,
        filler: &RowFiller<'_, S>,
        mut position: usize,
        mut top: i32,
        bottom: i32,
    ) -> Result<(), GridError>
    where
        S: SectionSource + ?Sized,
        H: ElementHost<Element = E>,
    {
        let total = filler.index.total();
        while position < total {
            let row = match self.take_floating_for(host, position) {
                Some((section, placed)) => filler.adopt_header(host, section, placed, top, true),
                None => filler.row_at(host, position, top)?,
            };
            gtrace!(
                position,
                len = row.len(),
                top = row.top(),
                bottom = row.bottom(),
                "fill_down row"
            );
            top = row.bottom();
            position = row.end_position();
            self.rows.push_back(row);
            if top >= bottom {
                break;
            }
        }
        Ok(())
    }

    /// Moves content by `delta` (positive moves content up), materializing rows at the edge
    /// being uncovered.
    ///
    /// Each step moves content at most as far as the distance to the ledger edge, then adds one
    /// row beyond that edge, so a row is only requested right before it becomes visible.
    /// Returns the distance actually scrolled, which is short of `delta` at either end of the
    /// content.
    fn scroll<S, H>(
        &mut self,
        host: &mut H,
        filler: &RowFiller<'_, S>,
        delta: i32,
        top: i32,
        bottom: i32,
    ) -> Result<i32, GridError>
    where
        S: SectionSource + ?Sized,
        H: ElementHost<Element = E>,
    {
        if self.rows.is_empty() {
            return Ok(0);
        }
        self.unstick(host);

        let total = filler.index.total();
        let mut scrolled = 0i32;
        if delta >= 0 {
            while scrolled < delta {
                let Some(last) = self.rows.back() else { break };
                let chunk = last
                    .bottom()
                    .saturating_sub(bottom)
                    .max(0)
                    .min(delta.saturating_sub(scrolled));
                self.offset_rows(host, -chunk);
                scrolled += chunk;
                gtrace!(chunk, scrolled, "scroll chunk down");

                let Some(last) = self.rows.back() else { break };
                let next = last.end_position();
                if scrolled >= delta || next >= total {
                    break;
                }
                let edge = last.bottom();
                let row = match self.take_floating_for(host, next) {
                    Some((section, placed)) => filler.adopt_header(host, section, placed, edge, true),
                    None => filler.row_at(host, next, edge)?,
                };
                self.rows.push_back(row);
            }
        } else {
            while scrolled > delta {
                let Some(first) = self.rows.front() else { break };
                let chunk = top
                    .saturating_sub(first.top())
                    .max(0)
                    .min(scrolled.saturating_sub(delta));
                self.offset_rows(host, chunk);
                scrolled -= chunk;
                gtrace!(chunk, scrolled, "scroll chunk up");

                let Some(first) = self.rows.front() else { break };
                if scrolled <= delta || first.first_position() == 0 {
                    break;
                }
                let previous = first.first_position() - 1;
                let edge = first.top();
                let row = match self.take_floating_for(host, previous) {
                    Some((section, placed)) => {
                        filler.adopt_header(host, section, placed, edge, false)
                    }
                    None => filler.row_ending_at(host, previous, edge)?,
                };
                self.rows.push_front(row);
            }
        }
        Ok(scrolled)
    }

    /// Drops whole rows lying entirely outside `[top, bottom]`, from both ends.
    ///
    /// The last header row evicted from the top is handed back instead of released, so the
    /// sticky pass can turn its element into the floating header without a new acquisition.
    pub(crate) fn evict<H: ElementHost<Element = E>>(
        &mut self,
        host: &mut H,
        top: i32,
        bottom: i32,
    ) -> Option<Row<E>> {
        let mut evicted_header: Option<Row<E>> = None;
        while self
            .rows
            .front()
            .is_some_and(|row| row.is_outside(top, bottom))
        {
            let Some(row) = self.rows.pop_front() else { break };
            if row.is_header() {
                if let Some(previous) = evicted_header.replace(row) {
                    previous.release(host);
                }
            } else {
                row.release(host);
            }
        }
        while self
            .rows
            .back()
            .is_some_and(|row| row.is_outside(top, bottom))
        {
            let Some(row) = self.rows.pop_back() else { break };
            row.release(host);
        }
        evicted_header
    }
}

/// A headless, section-grouped virtual grid with sticky section headers.
///
/// The engine owns the data source and the row ledger; the host is passed into every call that
/// materializes or releases elements. Typical driving loop:
///
/// - `set_viewport` when the container is (re)sized
/// - `layout` on cold start and whenever [`Self::needs_layout`] is `true`
/// - `scroll_by` for user scrolling
/// - `notify_*` after mutating the data through [`Self::source_mut`]
///
/// Every mutating entry point runs to completion; there is no background work.
#[derive(Debug)]
pub struct StickyHeaderGrid<S, E> {
    options: GridOptions,
    viewport: Viewport,
    source: Option<S>,
    index: Option<SectionIndex>,
    ledger: Ledger<E>,
    anchor: AnchorState,
    pending_scroll: Option<usize>,
    pending_restore: Option<AnchorState>,
    state: LayoutState,
    needs_layout: bool,
}

impl<S: SectionSource, E> StickyHeaderGrid<S, E> {
    /// Creates a detached grid.
    ///
    /// Fails with [`GridError::InvalidConfiguration`] when `options.columns` is 0.
    pub fn new(options: GridOptions) -> Result<Self, GridError> {
        if options.columns < 1 {
            return Err(GridError::InvalidConfiguration {
                columns: options.columns,
            });
        }
        gdebug!(columns = options.columns, "StickyHeaderGrid::new");
        Ok(Self {
            options,
            viewport: Viewport::default(),
            source: None,
            index: None,
            ledger: Ledger::new(),
            anchor: AnchorState::NONE,
            pending_scroll: None,
            pending_restore: None,
            state: LayoutState::Empty,
            needs_layout: true,
        })
    }

    /// Creates a grid and attaches `source` in one step.
    pub fn with_source(options: GridOptions, source: S) -> Result<Self, GridError> {
        let mut grid = Self::new(options)?;
        grid.attach(source)?;
        Ok(grid)
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn columns(&self) -> u32 {
        self.options.columns
    }

    /// Attaches a data source, replacing (and returning) the previous one.
    ///
    /// The source's counts are checked up front; a source whose slots do not fit the flat
    /// position space is rejected with [`GridError::InvalidHostState`]. All layout state is
    /// reset; elements still held are released by the next `layout` or `clear`.
    pub fn attach(&mut self, source: S) -> Result<Option<S>, GridError> {
        let index = SectionIndex::from_source(&source)?;
        gdebug!(
            sections = index.section_count(),
            total = index.total(),
            "attach"
        );
        self.index = Some(index);
        self.anchor = AnchorState::NONE;
        self.pending_scroll = None;
        self.pending_restore = None;
        self.mark_floating_stale();
        self.needs_layout = true;
        Ok(self.source.replace(source))
    }

    /// Detaches the data source. The next `layout` releases every element.
    pub fn detach(&mut self) -> Option<S> {
        self.index = None;
        self.mark_floating_stale();
        self.needs_layout = true;
        self.source.take()
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mutable access to the data. Follow up with the matching `notify_*` call.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Returns the section index, rebuilding it first if it was invalidated.
    pub fn section_index(&mut self) -> Result<&SectionIndex, GridError> {
        self.ensure_index()?;
        self.index
            .as_ref()
            .ok_or(GridError::host("no section source attached"))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        if self.viewport.usable_width() != viewport.usable_width() {
            // Element heights depend on the width they were measured with.
            self.mark_floating_stale();
        }
        self.viewport = viewport;
        self.needs_layout = true;
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// `true` when data, viewport, or a pending scroll/restore request is not yet reflected in
    /// the ledger.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// The anchor recorded by the last settled pass.
    pub fn anchor(&self) -> AnchorState {
        self.anchor
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row<E>> + '_ {
        self.ledger.rows.iter()
    }

    pub fn row_count(&self) -> usize {
        self.ledger.rows.len()
    }

    /// The floating header overlay, when the first visible section's real header row is not
    /// laid out.
    pub fn floating_header(&self) -> Option<&FloatingHeader<E>> {
        self.ledger.floating.as_ref()
    }

    /// Translation currently applied to the real header row stuck at the viewport top.
    pub fn stick_offset(&self) -> i32 {
        self.ledger.stick_offset
    }

    /// Flat position of the first row intersecting the viewport.
    pub fn first_visible_position(&self) -> Option<usize> {
        let i = self.ledger.first_visible(self.viewport.top())?;
        self.ledger.rows.get(i).map(Row::first_position)
    }

    /// Visits every materialized element in drawing order: ledger rows top to bottom, then the
    /// floating header (which overlays the rows).
    pub fn for_each_element(&self, mut f: impl FnMut(&PlacedElement<E>)) {
        for row in &self.ledger.rows {
            for placed in row.elements() {
                f(placed);
            }
        }
        if let Some(floating) = &self.ledger.floating {
            f(floating.placed());
        }
    }

    pub fn element_count(&self) -> usize {
        let rows: usize = self.ledger.rows.iter().map(Row::len).sum();
        rows + usize::from(self.ledger.floating.is_some())
    }

    /// A snapshot of the current ledger, as handed to [`GridOptions::on_settle`].
    pub fn summary(&self) -> LayoutSummary {
        let positions = match (self.ledger.rows.front(), self.ledger.rows.back()) {
            (Some(first), Some(last)) => Some((first.first_position(), last.end_position() - 1)),
            _ => None,
        };
        LayoutSummary {
            anchor: self.anchor,
            rows: self.ledger.rows.len(),
            elements: self.element_count(),
            positions,
            floating_section: self.ledger.floating.as_ref().map(FloatingHeader::section),
            stick_offset: self.ledger.stick_offset,
        }
    }

    /// Requests that the next layout starts with `position` at the viewport top.
    ///
    /// Takes precedence over a pending [`Self::restore_state`].
    pub fn scroll_to_position(&mut self, position: usize) -> Result<(), GridError> {
        let total = self.section_index()?.total();
        if position >= total {
            return Err(GridError::out_of_range("position", position, total));
        }
        self.pending_scroll = Some(position);
        self.pending_restore = None;
        self.needs_layout = true;
        Ok(())
    }

    /// The anchor to persist.
    ///
    /// A restored anchor that has not been laid out yet is returned as-is; otherwise the live
    /// anchor while elements are laid out, and [`AnchorState::NONE`] when nothing is.
    pub fn save_state(&self) -> AnchorState {
        if let Some(pending) = self.pending_restore {
            return pending;
        }
        if self.ledger.rows.is_empty() {
            return AnchorState::NONE;
        }
        self.anchor
    }

    /// Schedules `state` to anchor the next layout. An invalid anchor is ignored.
    pub fn restore_state(&mut self, state: AnchorState) {
        if !state.is_valid() {
            gdebug!("restore_state: no anchor");
            self.pending_restore = None;
            return;
        }
        self.pending_restore = Some(state);
        self.needs_layout = true;
    }

    /// Releases every element back to the host and returns to the empty state.
    pub fn clear<H: ElementHost<Element = E>>(&mut self, host: &mut H) {
        self.ledger.release_all(host);
        self.state = LayoutState::Empty;
        self.needs_layout = true;
    }

    /// Full layout pass: rebuilds the ledger from the resolved anchor.
    ///
    /// Anchor precedence: a pending [`Self::scroll_to_position`], then a pending
    /// [`Self::restore_state`], then the anchor of the previous pass, then the top of the
    /// content. Out-of-range anchors fall back to the top; positive offsets are clamped to 0.
    pub fn layout<H: ElementHost<Element = E>>(&mut self, host: &mut H) -> Result<(), GridError> {
        self.needs_layout = false;
        self.ensure_index()?;

        let total = self.index.as_ref().map_or(0, SectionIndex::total);
        if self.source.is_none() || total == 0 {
            self.enter_empty(host, true);
            return Ok(());
        }
        if self.viewport.is_empty() {
            self.enter_empty(host, false);
            return Ok(());
        }

        self.state = LayoutState::LayingOut;
        let (position, offset) = self.resolve_anchor(total);
        gdebug!(position, offset, total, "layout");

        match self.layout_pass(host, position, offset) {
            Ok(()) => {
                self.finish_pass();
                Ok(())
            }
            Err(err) => {
                self.enter_empty(host, false);
                Err(err)
            }
        }
    }

    /// Scrolls content by `delta` pixels (positive reveals content further down) and returns
    /// the distance actually scrolled.
    ///
    /// Runs a full layout first if one is pending.
    pub fn scroll_by<H: ElementHost<Element = E>>(
        &mut self,
        host: &mut H,
        delta: i32,
    ) -> Result<i32, GridError> {
        if self.needs_layout {
            self.layout(host)?;
        }
        if self.ledger.rows.is_empty() || delta == 0 {
            return Ok(0);
        }

        self.state = LayoutState::LayingOut;
        match self.scroll_pass(host, delta) {
            Ok(scrolled) => {
                gdebug!(delta, scrolled, "scroll_by");
                self.finish_pass();
                Ok(scrolled)
            }
            Err(err) => {
                self.enter_empty(host, false);
                Err(err)
            }
        }
    }

    fn filler<'a>(
        index: &'a SectionIndex,
        source: &'a S,
        options: &'a GridOptions,
        viewport: &Viewport,
    ) -> RowFiller<'a, S> {
        RowFiller {
            index,
            source,
            spans: &*options.spans,
            geometry: SpanGeometry::new(options.columns, viewport.usable_width()),
            left: viewport.left(),
            available_height: viewport.usable_height(),
        }
    }

    fn layout_pass<H: ElementHost<Element = E>>(
        &mut self,
        host: &mut H,
        position: usize,
        offset: i32,
    ) -> Result<(), GridError> {
        let (Some(source), Some(index)) = (self.source.as_ref(), self.index.as_ref()) else {
            return Err(GridError::host("no section source attached"));
        };
        let filler = Self::filler(index, source, &self.options, &self.viewport);
        let top = self.viewport.top();
        let bottom = self.viewport.bottom();

        self.ledger.release_rows(host);
        let start = filler.row_start(position)?;
        self.ledger.fill_down(host, &filler, start, top, bottom)?;

        // The anchor row keeps at least one pixel inside the viewport.
        let height = self.ledger.rows.front().map_or(0, Row::height);
        let lift = offset.saturating_neg().min(height - 1).max(0);
        if lift > 0 {
            self.ledger.scroll(host, &filler, lift, top, bottom)?;
        }

        // Ran out of data above the viewport bottom: pull content down from above.
        let filled = self.ledger.rows.back().map_or(bottom, Row::bottom);
        if filled < bottom {
            self.ledger
                .scroll(host, &filler, filled.saturating_sub(bottom), top, bottom)?;
        }
        self.ledger.settle(host, &filler, top, bottom)
    }

    fn scroll_pass<H: ElementHost<Element = E>>(
        &mut self,
        host: &mut H,
        delta: i32,
    ) -> Result<i32, GridError> {
        let (Some(source), Some(index)) = (self.source.as_ref(), self.index.as_ref()) else {
            return Err(GridError::host("no section source attached"));
        };
        let filler = Self::filler(index, source, &self.options, &self.viewport);
        let top = self.viewport.top();
        let bottom = self.viewport.bottom();

        let scrolled = self.ledger.scroll(host, &filler, delta, top, bottom)?;
        self.ledger.settle(host, &filler, top, bottom)?;
        Ok(scrolled)
    }

    fn resolve_anchor(&mut self, total: usize) -> (usize, i32) {
        let target = if let Some(position) = self.pending_scroll.take() {
            AnchorState::new(position, 0)
        } else if let Some(restored) = self.pending_restore.take() {
            restored
        } else if self.anchor.is_valid() {
            self.anchor
        } else {
            AnchorState::new(0, 0)
        };

        match target.flat_position() {
            Some(position) if position < total => (position, target.offset.min(0)),
            _ => {
                gwarn!(
                    position = target.position,
                    total,
                    "anchor out of range; starting from the top"
                );
                (0, 0)
            }
        }
    }

    fn finish_pass(&mut self) {
        if let Some(anchor) = self.ledger.anchor(self.viewport.top()) {
            self.anchor = anchor;
        }
        self.state = if self.ledger.rows.is_empty() {
            LayoutState::Empty
        } else {
            LayoutState::Settled
        };
        gtrace!(
            position = self.anchor.position,
            offset = self.anchor.offset,
            rows = self.ledger.rows.len(),
            "settled"
        );
        if let Some(cb) = &self.options.on_settle {
            cb(&self.summary());
        }
    }

    fn enter_empty<H: ElementHost<Element = E>>(&mut self, host: &mut H, reset_anchor: bool) {
        self.ledger.release_all(host);
        if reset_anchor {
            self.anchor = AnchorState::NONE;
        }
        self.state = LayoutState::Empty;
    }

    fn ensure_index(&mut self) -> Result<(), GridError> {
        if self.index.is_none() {
            if let Some(source) = &self.source {
                self.index = Some(SectionIndex::from_source(source)?);
            }
        }
        Ok(())
    }

    /// Rebuilds the index from the attached source, returning the previous one.
    fn rebuild_index(&mut self) -> Result<Option<SectionIndex>, GridError> {
        let source = self
            .source
            .as_ref()
            .ok_or(GridError::host("no section source attached"))?;
        let index = SectionIndex::from_source(source)?;
        gdebug!(
            sections = index.section_count(),
            total = index.total(),
            "rebuild_index"
        );
        self.needs_layout = true;
        Ok(self.index.replace(index))
    }

    fn mark_floating_stale(&mut self) {
        if let Some(floating) = self.ledger.floating.as_mut() {
            floating.stale = true;
        }
    }

    fn mark_floating_stale_if(&mut self, stale: impl FnOnce(&FloatingHeader<E>) -> bool) {
        if let Some(floating) = self.ledger.floating.as_mut() {
            if stale(&*floating) {
                floating.stale = true;
            }
        }
    }

    /// Shifts the anchor after `count` slots were inserted at flat position `at`.
    fn shift_anchor_for_insert(&mut self, at: usize, count: usize) {
        for anchor in [Some(&mut self.anchor), self.pending_restore.as_mut()]
            .into_iter()
            .flatten()
        {
            if let Some(position) = anchor.flat_position() {
                if position >= at {
                    *anchor = AnchorState::new(position + count, anchor.offset);
                }
            }
        }
    }

    /// Shifts the anchor after `count` slots starting at flat position `at` were removed.
    fn shift_anchor_for_remove(&mut self, at: usize, count: usize) {
        for anchor in [Some(&mut self.anchor), self.pending_restore.as_mut()]
            .into_iter()
            .flatten()
        {
            if let Some(position) = anchor.flat_position() {
                if position >= at + count {
                    *anchor = AnchorState::new(position - count, anchor.offset);
                } else if position >= at {
                    *anchor = AnchorState::new(at, 0);
                }
            }
        }
    }

    /// Every section may have changed: rebuild and relayout.
    pub fn notify_all_sections_changed(&mut self) -> Result<(), GridError> {
        self.rebuild_index()?;
        self.mark_floating_stale();
        Ok(())
    }

    /// The content of `section` (header and items) changed; its item count may have too.
    pub fn notify_section_changed(&mut self, section: usize) -> Result<(), GridError> {
        let before = self.section_footprint(section)?;
        self.rebuild_index()?;
        let after = self.section_footprint(section)?;
        if after.len > before.len {
            self.shift_anchor_for_insert(before.end(), after.len - before.len);
        } else if before.len > after.len {
            let removed = before.len - after.len;
            self.shift_anchor_for_remove(before.end() - removed, removed);
        }
        self.mark_floating_stale_if(|f| f.section() >= section);
        Ok(())
    }

    /// A new section was inserted at index `section`. Validated against the layout after the
    /// insertion.
    pub fn notify_section_inserted(&mut self, section: usize) -> Result<(), GridError> {
        self.rebuild_index()?;
        let inserted = self.section_footprint(section)?;
        self.shift_anchor_for_insert(inserted.start, inserted.len);
        self.mark_floating_stale_if(|f| f.section() >= section);
        Ok(())
    }

    /// Section `section` was removed. Validated against the layout before the removal.
    pub fn notify_section_removed(&mut self, section: usize) -> Result<(), GridError> {
        let removed = self.section_footprint(section)?;
        self.rebuild_index()?;
        self.shift_anchor_for_remove(removed.start, removed.len);
        self.mark_floating_stale_if(|f| f.section() >= section);
        Ok(())
    }

    pub fn notify_item_inserted(&mut self, section: usize, item: usize) -> Result<(), GridError> {
        self.notify_item_range_inserted(section, item, 1)
    }

    /// `count` items were inserted into `section` starting at `item`. Validated against the
    /// layout after the insertion.
    pub fn notify_item_range_inserted(
        &mut self,
        section: usize,
        item: usize,
        count: usize,
    ) -> Result<(), GridError> {
        self.rebuild_index()?;
        let at = {
            let index = self.current_index()?;
            let items = index.item_count(section)?;
            check_item_range(item, count, items)?;
            index.item_position(section, item)?
        };
        self.shift_anchor_for_insert(at, count);
        // Headers of later sections move; the header of `section` itself does not.
        self.mark_floating_stale_if(|f| f.section() > section);
        Ok(())
    }

    pub fn notify_item_removed(&mut self, section: usize, item: usize) -> Result<(), GridError> {
        self.notify_item_range_removed(section, item, 1)
    }

    /// `count` items were removed from `section` starting at `item`. Validated against the
    /// layout before the removal.
    pub fn notify_item_range_removed(
        &mut self,
        section: usize,
        item: usize,
        count: usize,
    ) -> Result<(), GridError> {
        let at = {
            let old = self.current_index()?;
            let items = old.item_count(section)?;
            check_item_range(item, count, items)?;
            old.item_position(section, item)?
        };
        self.rebuild_index()?;
        self.shift_anchor_for_remove(at, count);
        self.mark_floating_stale_if(|f| f.section() > section);
        Ok(())
    }

    /// Item `item` of `section` changed in place.
    pub fn notify_item_changed(&mut self, section: usize, item: usize) -> Result<(), GridError> {
        self.rebuild_index()?;
        let index = self.current_index()?;
        let items = index.item_count(section)?;
        if item >= items {
            return Err(GridError::out_of_range("item", item, items));
        }
        Ok(())
    }

    fn current_index(&mut self) -> Result<&SectionIndex, GridError> {
        self.section_index()
    }

    fn section_footprint(&mut self, section: usize) -> Result<Section, GridError> {
        let index = self.current_index()?;
        index
            .section(section)
            .copied()
            .ok_or_else(|| GridError::out_of_range("section", section, index.section_count()))
    }
}

fn check_item_range(item: usize, count: usize, items: usize) -> Result<(), GridError> {
    if item >= items {
        return Err(GridError::out_of_range("item", item, items));
    }
    let end = item.saturating_add(count);
    if end > items {
        return Err(GridError::out_of_range("item range end", end, items));
    }
    Ok(())
}

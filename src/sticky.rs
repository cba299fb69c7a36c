use crate::grid::Ledger;
use crate::row::RowFiller;
use crate::types::to_i32;
use crate::{Bounds, ElementHost, ElementKind, GridError, PlacedElement, Row, SectionSource};

/// A header element drawn over the rows at the viewport top.
///
/// Exists only while the first visible row belongs to a sticky section whose real header row is
/// not laid out (it scrolled above the viewport and was evicted). At most one is active at a
/// time; when the real header row comes back into the ledger the overlay's element is handed
/// over to it instead of being released.
#[derive(Debug)]
pub struct FloatingHeader<E> {
    section: usize,
    placed: PlacedElement<E>,
    /// The data behind this header changed; acquire a fresh element on the next pass.
    pub(crate) stale: bool,
}

impl<E> FloatingHeader<E> {
    pub fn section(&self) -> usize {
        self.section
    }

    /// Flat position of the section header this overlay stands in for.
    pub fn position(&self) -> usize {
        self.placed.position
    }

    pub fn kind(&self) -> ElementKind {
        self.placed.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.placed.bounds
    }

    pub fn height(&self) -> u32 {
        self.placed.bounds.height()
    }

    pub fn element(&self) -> &E {
        &self.placed.element
    }

    pub fn placed(&self) -> &PlacedElement<E> {
        &self.placed
    }
}

/// How far a stuck header of height `height` is pushed up by the next header row, whose top edge
/// is `next_top`. 0 while the next header is at least `height` below the viewport top; `height`
/// once it reaches the top.
pub(crate) fn push_off(viewport_top: i32, height: i32, next_top: Option<i32>) -> i32 {
    next_top.map_or(0, |next| {
        ((viewport_top - next).max(-height) + height).clamp(0, height)
    })
}

impl<E> Ledger<E> {
    pub(crate) fn release_floating<H: ElementHost<Element = E>>(&mut self, host: &mut H) {
        if let Some(floating) = self.floating.take() {
            gtrace!(section = floating.section, "release floating header");
            host.release(floating.placed.element);
        }
    }

    /// Takes the floating header's element if it stands in for `position`, so the caller can
    /// lay it out as the real header row. A stale overlay for `position` is released instead.
    pub(crate) fn take_floating_for<H: ElementHost<Element = E>>(
        &mut self,
        host: &mut H,
        position: usize,
    ) -> Option<(usize, PlacedElement<E>)> {
        if self.floating.as_ref()?.position() != position {
            return None;
        }
        let floating = self.floating.take()?;
        if floating.stale {
            host.release(floating.placed.element);
            return None;
        }
        gtrace!(section = floating.section, position, "floating header joins the ledger");
        Some((floating.section, floating.placed))
    }

    /// Moves the stuck header row's elements back to the row's natural position.
    pub(crate) fn unstick<H: ElementHost<Element = E>>(&mut self, host: &mut H) {
        if let Some(position) = self.stuck.take() {
            let dy = -self.stick_offset;
            if let Some(row) = self
                .rows
                .iter_mut()
                .find(|row| row.is_header() && row.first_position() == position)
            {
                row.translate_elements(host, dy);
            }
        }
        self.stick_offset = 0;
    }

    /// Evicts off-screen rows, then re-establishes the sticky header for the first visible
    /// section.
    pub(crate) fn settle<S, H>(
        &mut self,
        host: &mut H,
        filler: &RowFiller<'_, S>,
        top: i32,
        bottom: i32,
    ) -> Result<(), GridError>
    where
        S: SectionSource + ?Sized,
        H: ElementHost<Element = E>,
    {
        self.unstick(host);
        let evicted = self.evict(host, top, bottom);
        self.restick(host, filler, top, evicted)
    }

    /// Top edge of the first header row after row `after`, if laid out.
    fn next_header_top(&self, after: usize) -> Option<i32> {
        self.rows
            .iter()
            .skip(after + 1)
            .find(|row| row.is_header())
            .map(Row::top)
    }

    fn restick<S, H>(
        &mut self,
        host: &mut H,
        filler: &RowFiller<'_, S>,
        top: i32,
        evicted: Option<Row<E>>,
    ) -> Result<(), GridError>
    where
        S: SectionSource + ?Sized,
        H: ElementHost<Element = E>,
    {
        let Some(first) = self.first_visible(top) else {
            release_row(host, evicted);
            self.release_floating(host);
            return Ok(());
        };

        // Rows are contiguous, so the last header row at or above the first visible row belongs
        // to the first visible section.
        if let Some(h) = (0..=first).rev().find(|&i| self.rows[i].is_header()) {
            release_row(host, evicted);
            self.release_floating(host);

            let row = &self.rows[h];
            if !filler.source.is_header_sticky(row.section()) {
                return Ok(());
            }
            let lift = push_off(top, row.height(), self.next_header_top(h));
            let dy = (top - row.top() - lift).max(0);
            let position = row.first_position();
            self.rows[h].translate_elements(host, dy);
            self.stick_offset = dy;
            self.stuck = Some(position);
            gtrace!(position, dy, "header row stuck");
            return Ok(());
        }

        let section = self.rows[first].section();
        if !filler.source.is_header_sticky(section) {
            release_row(host, evicted);
            self.release_floating(host);
            return Ok(());
        }
        let position = filler.index.header_position(section)?;

        let reusable = self
            .floating
            .as_ref()
            .is_some_and(|f| f.section == section && f.position() == position && !f.stale);
        if reusable {
            release_row(host, evicted);
        } else {
            self.release_floating(host);
            let adopted = match evicted {
                Some(row) if row.section() == section && row.first_position() == position => {
                    row.into_header()
                }
                other => {
                    release_row(host, other);
                    None
                }
            };
            let placed = match adopted {
                Some(placed) => placed,
                None => filler.place_header(host, section, position, top, true),
            };
            gtrace!(section, position, "floating header created");
            self.floating = Some(FloatingHeader {
                section,
                placed,
                stale: false,
            });
        }

        let next_top = self.next_header_top(first);
        if let Some(floating) = self.floating.as_mut() {
            let height = to_i32(floating.placed.bounds.height());
            let y = top - push_off(top, height, next_top);
            let bounds = Bounds {
                left: filler.left,
                top: y,
                right: filler.left + to_i32(filler.geometry.width()),
                bottom: y + height,
            };
            if bounds != floating.placed.bounds {
                host.place(&mut floating.placed.element, bounds);
                floating.placed.bounds = bounds;
            }
        }
        Ok(())
    }
}

fn release_row<E, H: ElementHost<Element = E>>(host: &mut H, row: Option<Row<E>>) {
    if let Some(row) = row {
        row.release(host);
    }
}

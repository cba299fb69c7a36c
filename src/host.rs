use crate::{Bounds, ElementKind};

/// The host's recycling surface.
///
/// The engine never creates or draws anything itself: it asks the host for an element bound to
/// a flat position, asks for its measured height, and tells the host where to put it. Every
/// element handed out by [`ElementHost::acquire`] is eventually handed back through
/// [`ElementHost::release`] (when its row is evicted, on relayout, or on [`crate::StickyHeaderGrid::clear`]).
///
/// Geometry queries and child ordering are answered by the engine's own ledger
/// ([`crate::StickyHeaderGrid::rows`], [`crate::StickyHeaderGrid::for_each_element`]), so the
/// host only has to implement these primitives.
pub trait ElementHost {
    type Element;

    /// Returns an element bound to the content at `position`.
    fn acquire(&mut self, position: usize, kind: ElementKind) -> Self::Element;

    /// Measures `element` for the given available width and returns its height.
    ///
    /// `available_height` is the usable viewport height; elements are expected to wrap their
    /// content vertically.
    fn measure(
        &mut self,
        element: &mut Self::Element,
        available_width: u32,
        available_height: u32,
    ) -> u32;

    fn place(&mut self, element: &mut Self::Element, bounds: Bounds);

    fn translate(&mut self, element: &mut Self::Element, dx: i32, dy: i32);

    fn release(&mut self, element: Self::Element);
}

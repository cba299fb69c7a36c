/// A lightweight, serializable snapshot of where the viewport is anchored.
///
/// `position` is the flat position of the first visible row and `offset` is that row's top edge
/// relative to the viewport top (never positive). `position == -1` means "no anchor": the next
/// layout starts from the top of the content.
///
/// With `feature = "serde"`, this type serializes as a two-integer tuple `[position, offset]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(i32, i32)", into = "(i32, i32)")
)]
pub struct AnchorState {
    pub position: i32,
    pub offset: i32,
}

impl AnchorState {
    pub const NONE: Self = Self {
        position: -1,
        offset: 0,
    };

    /// Creates an anchor for `position`, clamping `offset` to `<= 0`.
    pub fn new(position: usize, offset: i32) -> Self {
        Self {
            position: i32::try_from(position).unwrap_or(i32::MAX),
            offset: offset.min(0),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.position >= 0
    }

    /// The anchored flat position, if any.
    pub fn flat_position(&self) -> Option<usize> {
        usize::try_from(self.position).ok()
    }
}

impl Default for AnchorState {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<(i32, i32)> for AnchorState {
    fn from((position, offset): (i32, i32)) -> Self {
        Self {
            position: position.max(-1),
            offset: offset.min(0),
        }
    }
}

impl From<AnchorState> for (i32, i32) {
    fn from(state: AnchorState) -> Self {
        (state.position, state.offset)
    }
}

/// What a settled layout pass produced. Handed to [`crate::GridOptions::on_settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSummary {
    pub anchor: AnchorState,
    pub rows: usize,
    pub elements: usize,
    /// Flat positions covered by the ledger, first to last (inclusive).
    pub positions: Option<(usize, usize)>,
    /// Section represented by the floating header overlay, if one is active.
    pub floating_section: Option<usize>,
    /// Translation currently applied to the real header row stuck at the top.
    pub stick_offset: i32,
}

use crate::GridError;

/// Padding between the viewport edges and the area rows are laid out in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    pub fn uniform(value: u32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// The scroll container geometry, in pixels.
///
/// Rows are laid out inside the *usable* area: the viewport inset by its padding. "Viewport
/// top" and "viewport bottom" throughout this crate refer to the edges of that area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub padding: Padding,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn top(&self) -> i32 {
        to_i32(self.padding.top)
    }

    pub fn bottom(&self) -> i32 {
        to_i32(self.height).saturating_sub(to_i32(self.padding.bottom))
    }

    pub fn left(&self) -> i32 {
        to_i32(self.padding.left)
    }

    pub fn right(&self) -> i32 {
        to_i32(self.width).saturating_sub(to_i32(self.padding.right))
    }

    pub fn usable_width(&self) -> u32 {
        self.width
            .saturating_sub(self.padding.left)
            .saturating_sub(self.padding.right)
    }

    pub fn usable_height(&self) -> u32 {
        self.height
            .saturating_sub(self.padding.top)
            .saturating_sub(self.padding.bottom)
    }

    /// `true` when nothing can be laid out (zero usable width or height).
    pub fn is_empty(&self) -> bool {
        self.usable_width() == 0 || self.usable_height() == 0
    }
}

/// An element rectangle in viewport coordinates. `right`/`bottom` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }

    pub fn translated(self, dy: i32) -> Self {
        Self {
            top: self.top.saturating_add(dy),
            bottom: self.bottom.saturating_add(dy),
            ..self
        }
    }
}

/// The columns one element occupies inside its row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpanAssignment {
    pub column: u32,
    pub span: u32,
}

impl SpanAssignment {
    pub fn end(&self) -> u32 {
        self.column.saturating_add(self.span)
    }
}

/// What an element slot holds, plus the caller-defined subtype for that slot.
///
/// Hosts that can only key their recycling pools by a single integer can use
/// [`ElementKind::pack`] / [`ElementKind::unpack`]; the engine itself only deals in this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    Header(u8),
    Item(u8),
}

const TAG_HEADER: u32 = 0;
const TAG_ITEM: u32 = 1;

impl ElementKind {
    pub fn is_header(self) -> bool {
        matches!(self, Self::Header(_))
    }

    pub fn subtype(self) -> u8 {
        match self {
            Self::Header(t) | Self::Item(t) => t,
        }
    }

    /// Packs the kind as `subtype << 8 | tag`.
    pub fn pack(self) -> u32 {
        let tag = match self {
            Self::Header(_) => TAG_HEADER,
            Self::Item(_) => TAG_ITEM,
        };
        (u32::from(self.subtype()) << 8) | tag
    }

    /// Reverses [`ElementKind::pack`].
    ///
    /// A value the engine could not have produced means the host mixed up its pools, which is
    /// reported as [`GridError::InvalidHostState`].
    pub fn unpack(packed: u32) -> Result<Self, GridError> {
        if packed >> 16 != 0 {
            return Err(GridError::host("packed element kind has bits above the subtype"));
        }
        let subtype = ((packed >> 8) & 0xFF) as u8;
        match packed & 0xFF {
            TAG_HEADER => Ok(Self::Header(subtype)),
            TAG_ITEM => Ok(Self::Item(subtype)),
            _ => Err(GridError::host("unknown element kind tag")),
        }
    }
}

pub(crate) fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

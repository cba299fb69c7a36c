/// The data collaborator: describes how many sections exist and how many items each holds.
///
/// The engine queries these counts when it (re)builds its [`crate::SectionIndex`]. They must
/// stay consistent with the change notifications sent to the engine afterwards; if the data is
/// mutated without a matching `notify_*` call, positions handed to the host are meaningless.
pub trait SectionSource {
    fn section_count(&self) -> usize;

    fn item_count(&self, section: usize) -> usize;

    /// Whether the header of `section` sticks to the viewport top while its items scroll.
    fn is_header_sticky(&self, _section: usize) -> bool {
        true
    }

    /// Caller-defined subtype for the header element of `section`.
    fn header_type(&self, _section: usize) -> u8 {
        0
    }

    /// Caller-defined subtype for item `item` of `section`.
    fn item_type(&self, _section: usize, _item: usize) -> u8 {
        0
    }
}

impl<T: SectionSource + ?Sized> SectionSource for &T {
    fn section_count(&self) -> usize {
        (**self).section_count()
    }

    fn item_count(&self, section: usize) -> usize {
        (**self).item_count(section)
    }

    fn is_header_sticky(&self, section: usize) -> bool {
        (**self).is_header_sticky(section)
    }

    fn header_type(&self, section: usize) -> u8 {
        (**self).header_type(section)
    }

    fn item_type(&self, section: usize, item: usize) -> u8 {
        (**self).item_type(section, item)
    }
}

/// A plain list of item counts, one per section. Useful for fixtures and simple grids.
impl SectionSource for alloc::vec::Vec<usize> {
    fn section_count(&self) -> usize {
        self.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.get(section).copied().unwrap_or(0)
    }
}

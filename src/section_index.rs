use alloc::vec::Vec;

use crate::{GridError, SectionSource};

/// One section's footprint in the flat position space.
///
/// A section occupies `len = item_count + 1` consecutive slots starting at `start`: the header
/// slot first, then one slot per item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub start: usize,
    pub item_count: usize,
    pub len: usize,
}

impl Section {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end()
    }
}

/// What a flat position refers to inside its section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Header,
    Item(usize),
}

/// Flat position ⇄ (section, item) translator.
///
/// Built in one linear pass from the section counts; never patched in place. Any structural
/// change to the data means a full rebuild, because row geometry does not compose across
/// section boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionIndex {
    sections: Vec<Section>,
    owners: Vec<usize>, // flat position -> section
}

impl SectionIndex {
    /// Builds the index from a section count and a per-section item count.
    ///
    /// Fails with [`GridError::InvalidHostState`] if the counts do not fit in the flat position
    /// space.
    pub fn build(
        section_count: usize,
        mut item_count: impl FnMut(usize) -> usize,
    ) -> Result<Self, GridError> {
        let mut sections = Vec::with_capacity(section_count);
        let mut total = 0usize;
        for _ in 0..section_count {
            let items = item_count(sections.len());
            let len = items
                .checked_add(1)
                .ok_or(GridError::host("section item count overflows the position space"))?;
            sections.push(Section {
                start: total,
                item_count: items,
                len,
            });
            total = total
                .checked_add(len)
                .ok_or(GridError::host("total slot count overflows the position space"))?;
        }
        // Anchors persist positions as i32.
        if i32::try_from(total).is_err() {
            return Err(GridError::host("total slot count exceeds i32::MAX"));
        }

        let mut owners = Vec::with_capacity(total);
        for (s, section) in sections.iter().enumerate() {
            owners.extend(core::iter::repeat_n(s, section.len));
        }
        debug_assert_eq!(owners.len(), total);

        Ok(Self { sections, owners })
    }

    pub fn from_source<S: SectionSource + ?Sized>(source: &S) -> Result<Self, GridError> {
        Self::build(source.section_count(), |s| source.item_count(s))
    }

    /// Total number of flat positions (headers and items).
    pub fn total(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, section: usize) -> Option<&Section> {
        self.sections.get(section)
    }

    pub fn item_count(&self, section: usize) -> Result<usize, GridError> {
        Ok(self.checked_section(section)?.item_count)
    }

    /// Returns the section owning `position`.
    pub fn position_to_section(&self, position: usize) -> Result<usize, GridError> {
        self.owners
            .get(position)
            .copied()
            .ok_or(GridError::out_of_range("position", position, self.total()))
    }

    /// Classifies `position` relative to `section`.
    ///
    /// Fails if `position` does not belong to `section`.
    pub fn local_slot(&self, section: usize, position: usize) -> Result<Slot, GridError> {
        let s = self.checked_section(section)?;
        if position < s.start {
            return Err(GridError::out_of_range("position before section", position, s.start));
        }
        if !s.contains(position) {
            return Err(GridError::out_of_range(
                "section-local position",
                position - s.start,
                s.len,
            ));
        }
        Ok(match position - s.start {
            0 => Slot::Header,
            local => Slot::Item(local - 1),
        })
    }

    /// Zero-based item index of `position` within `section`.
    ///
    /// Header slots are rejected: callers translating headers use [`Self::local_slot`].
    pub fn item_local_position(&self, section: usize, position: usize) -> Result<usize, GridError> {
        match self.local_slot(section, position)? {
            Slot::Item(item) => Ok(item),
            Slot::Header => Err(GridError::out_of_range("item position", position, self.total())),
        }
    }

    pub fn is_header(&self, position: usize) -> Result<bool, GridError> {
        let section = self.position_to_section(position)?;
        Ok(self.sections[section].start == position)
    }

    pub fn header_position(&self, section: usize) -> Result<usize, GridError> {
        Ok(self.checked_section(section)?.start)
    }

    pub fn item_position(&self, section: usize, item: usize) -> Result<usize, GridError> {
        let s = self.checked_section(section)?;
        if item >= s.item_count {
            return Err(GridError::out_of_range("item", item, s.item_count));
        }
        Ok(s.start + 1 + item)
    }

    fn checked_section(&self, section: usize) -> Result<&Section, GridError> {
        self.sections
            .get(section)
            .ok_or(GridError::out_of_range("section", section, self.sections.len()))
    }
}

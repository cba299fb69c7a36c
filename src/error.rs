use thiserror::Error;

/// Errors reported by the grid engine.
///
/// Every variant describes a caller bug (bad configuration, an index the caller should never
/// have produced, or an unusable collaborator). The engine never retries and has no degraded
/// mode; the only silent correction it performs is clamping a stale anchor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid was configured with fewer than one column.
    #[error("column count must be at least 1, got {columns}")]
    InvalidConfiguration { columns: u32 },

    /// A position, section or item argument is outside its valid range.
    #[error("{what} {index} is out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// The attached data source (or the host) cannot be used by the engine.
    #[error("invalid host state: {reason}")]
    InvalidHostState { reason: &'static str },
}

impl GridError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfRange { what, index, len }
    }

    pub(crate) fn host(reason: &'static str) -> Self {
        Self::InvalidHostState { reason }
    }
}

//! Limits for codec-level decoding.

/// Codec-specific limits enforced while decoding a CIS file.
///
/// Byte-level framing limits (file size, entry counts, blob sizes) live in
/// [`wire::Limits`] and are carried here so decode takes a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Framing limits checked by the wire layer.
    pub wire: wire::Limits,
    /// Maximum number of cells replayed into the decoded delta.
    pub max_total_cells: usize,
    /// Maximum local palette size of a dense section.
    pub max_local_palette: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            wire: wire::Limits::default(),
            max_total_cells: 64 * 4096,
            max_local_palette: 255,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            wire: wire::Limits::for_testing(),
            max_total_cells: 8 * 4096,
            max_local_palette: 64,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            wire: wire::Limits::unlimited(),
            max_total_cells: usize::MAX,
            max_local_palette: usize::MAX,
        }
    }
}

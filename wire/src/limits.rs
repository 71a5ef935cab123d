//! Configurable limits for bounded decoding.

/// Wire-level limits for file decoding.
///
/// Every count and length read from a file is checked against these before
/// any allocation or iteration, in addition to the remaining-bytes check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum file size in bytes.
    pub max_file_bytes: usize,

    /// Maximum number of global palette entries.
    pub max_palette_entries: usize,

    /// Maximum number of encoded sections.
    pub max_sections: usize,

    /// Maximum number of positional metadata entries.
    pub max_metadata_entries: usize,

    /// Maximum number of free-standing records.
    pub max_free_records: usize,

    /// Maximum length of any single length-prefixed blob.
    pub max_blob_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: 16 * 1024 * 1024,
            max_palette_entries: 10_000,
            // a chunk column spans at most 64 sections in the 6-bit index
            max_sections: 64,
            max_metadata_entries: 10_000,
            max_free_records: 10_000,
            max_blob_bytes: 4 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_file_bytes: 64 * 1024,
            max_palette_entries: 64,
            max_sections: 8,
            max_metadata_entries: 32,
            max_free_records: 32,
            max_blob_bytes: 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_file_bytes: usize::MAX,
            max_palette_entries: usize::MAX,
            max_sections: usize::MAX,
            max_metadata_entries: usize::MAX,
            max_free_records: usize::MAX,
            max_blob_bytes: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_cap() {
        assert_eq!(Limits::default().max_palette_entries, 10_000);
    }

    #[test]
    fn default_covers_full_section_range() {
        assert!(Limits::default().max_sections >= 64);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_file_bytes < default_limits.max_file_bytes);
        assert!(test_limits.max_palette_entries < default_limits.max_palette_entries);
        assert!(test_limits.max_sections < default_limits.max_sections);
        assert!(test_limits.max_blob_bytes < default_limits.max_blob_bytes);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_file_bytes, usize::MAX);
        assert_eq!(limits.max_free_records, usize::MAX);
    }

    #[test]
    fn limits_equality() {
        assert_eq!(Limits::default(), Limits::default());
        assert_ne!(Limits::default(), Limits::for_testing());
    }
}

//! Encoder configuration.

/// How the encoder chooses between sparse and dense sections.
///
/// Any policy produces files the decoder accepts. Sections that dense
/// encoding cannot represent (explicit empty values, more than 255 local
/// values) are always written sparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionPolicy {
    /// Whichever representation costs fewer bits; ties go to sparse.
    #[default]
    Auto,
    PreferSparse,
    PreferDense,
}

/// Options for [`encode_with`](crate::encode_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub section_policy: SectionPolicy,
}

impl EncodeOptions {
    #[must_use]
    pub const fn with_section_policy(mut self, section_policy: SectionPolicy) -> Self {
        self.section_policy = section_policy;
        self
    }
}

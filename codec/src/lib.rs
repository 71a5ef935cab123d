//! Chunk delta tracking and the CIS binary codec.
//!
//! This is the main codec crate that ties together bitstream, wire, and state
//! to record, encode, decode and restore the modifications made to a voxel
//! chunk relative to its generated contents.
//!
//! # Features
//!
//! - [`Delta`] with O(1) add, update and swap-remove
//! - Palette-compressed encoding with per-section sparse or dense layout
//! - Bounded, validating decode
//! - Baseline diffing that drops changes a regenerated chunk already has
//! - Structural inspection of files without a value adapter
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **Caller-owned scratch** - [`CodecContext`] is passed in, never global.
//! - **Deterministic** - Same delta contents produce the same bytes.

mod baseline;
mod blob;
mod decode;
mod delta;
mod encode;
mod error;
mod inspect;
mod limits;
mod options;
mod palette;
mod position;
mod restore;
mod scratch;
mod sections;

pub use baseline::{Baseline, BaselineSnapshot, BaselineStats};
pub use blob::{BlobAdapter, BlobError, RawBlobs};
pub use decode::{decode, decode_with, DecodeStats};
pub use delta::{Delta, DeltaVisitor, Tracking, TraverseStats};
pub use encode::{encode, encode_with, EncodeStats};
pub use error::{Axis, CodecError, CodecResult, LimitKind, PositionError};
pub use inspect::{inspect, CellSummary, FileSummary, SectionSummary};
pub use limits::CodecLimits;
pub use options::{EncodeOptions, SectionPolicy};
pub use palette::Palette;
pub use position::{
    pack_position, unpack_x, unpack_y, unpack_z, LocalPos, PackedInstruction, MAX_Y, MIN_Y,
};
pub use restore::{restore, ReplaySink, RestoreOutcome};
pub use scratch::CodecContext;
pub use sections::{
    SectionMode, BLOCK_COUNT_BITS, MAX_LOCAL_PALETTE, MAX_SECTION_Y, MIN_SECTION_Y,
    PALETTE_SIZE_BITS, SECTION_VOLUME, SECTION_Y_BITS,
};
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = LocalPos::new(0, 0, 0);
        let _ = Delta::<u8, Vec<u8>>::new();
        let _ = CodecLimits::default();
        let _ = WireLimits::default();
        let _ = EncodeOptions::default().with_section_policy(SectionPolicy::PreferDense);
        let _ = CodecContext::new();
        let _ = RawBlobs;
        let _: Palette<u8> = Palette::new();
    }

    #[test]
    fn format_constants() {
        assert_eq!(SECTION_Y_BITS, 6);
        assert_eq!(BLOCK_COUNT_BITS, 13);
        assert_eq!(PALETTE_SIZE_BITS, 8);
        assert_eq!(SECTION_VOLUME, 16 * 16 * 16);
        assert_eq!(MAX_LOCAL_PALETTE, 255);
    }
}

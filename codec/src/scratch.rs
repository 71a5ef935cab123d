//! Reusable scratch buffers for codec operations.

use std::ops::Range;

use crate::sections::SECTION_VOLUME;

const NO_ID: u32 = u32::MAX;

/// One occupied cell gathered from a delta: its section, its index within
/// the section, and a palette id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub section_y: i32,
    pub index: u16,
    pub id: u32,
}

/// Scratch buffers for encoding and decoding.
///
/// Holding one per worker and passing it to
/// [`encode_with`](crate::encode_with) / [`decode_with`](crate::decode_with)
/// avoids re-allocating the per-section buffers on every chunk. A context
/// carries no data between calls.
#[derive(Debug, Default)]
pub struct CodecContext {
    cells: Vec<Cell>,
    /// delta palette id → global id
    remap: Vec<u32>,
    /// global id → delta palette id, `NO_ID` for the empty value
    global: Vec<u32>,
    /// local palette index per section cell
    dense: Vec<u16>,
    /// local index → global id
    local: Vec<u32>,
    /// global id → local index, cleared after each section
    local_of: Vec<u32>,
    /// local index → global id while decoding
    decode_local: Vec<u32>,
    bits: Vec<u8>,
    bytes: Vec<u8>,
}

impl CodecContext {
    /// Creates a new context with no pre-allocated capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }

    /// Sorts gathered cells by section, then by index within the section.
    pub(crate) fn sort_cells(&mut self) {
        self.cells
            .sort_unstable_by_key(|cell| (cell.section_y, cell.index));
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Renumbers cell ids from delta palette ids to global ids in scan order.
    ///
    /// `empty_id` is the delta palette id of the empty value, if present; it
    /// always becomes global id 0.
    pub(crate) fn assign_global_ids(&mut self, delta_palette_len: usize, empty_id: Option<u32>) {
        self.remap.clear();
        self.remap.resize(delta_palette_len, NO_ID);
        self.global.clear();
        self.global.push(NO_ID);
        if let Some(empty) = empty_id {
            self.remap[empty as usize] = 0;
        }
        for cell in &mut self.cells {
            let slot = &mut self.remap[cell.id as usize];
            if *slot == NO_ID {
                *slot = self.global.len() as u32;
                self.global.push(cell.id);
            }
            cell.id = *slot;
        }
    }

    /// Delta palette id per global id; entry 0 is the empty value.
    pub(crate) fn global_ids(&self) -> &[u32] {
        &self.global
    }

    /// Builds the local palette for the cells in `range`, with the empty
    /// value at index 0.
    pub(crate) fn build_local_palette(&mut self, range: Range<usize>, global_len: usize) -> &[u32] {
        self.reset_local(global_len);
        self.local_index(0);
        for i in range {
            let id = self.cells[i].id;
            self.local_index(id);
        }
        &self.local
    }

    /// Fills the dense cell buffer from the cells in `range` using the
    /// current local palette. Unlisted cells hold index 0 (the empty value).
    pub(crate) fn fill_dense(&mut self, range: Range<usize>) -> &[u16] {
        self.dense.clear();
        self.dense.resize(SECTION_VOLUME, 0);
        for cell in &self.cells[range] {
            let local = self.local_of[cell.id as usize];
            self.dense[cell.index as usize] = local as u16;
        }
        &self.dense
    }

    /// The local palette and dense cell buffer of the current section.
    pub(crate) fn dense_parts(&self) -> (&[u32], &[u16]) {
        (&self.local, &self.dense)
    }

    /// Decoder side: a reusable local palette buffer, separate from the
    /// encoder's so `local_of` stays in step with `local`.
    pub(crate) fn decode_local_mut(&mut self) -> &mut Vec<u32> {
        &mut self.decode_local
    }

    pub(crate) fn take_bits(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bits)
    }

    pub(crate) fn restore_bits(&mut self, buf: Vec<u8>) {
        self.bits = buf;
    }

    pub(crate) fn take_bytes(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    pub(crate) fn restore_bytes(&mut self, buf: Vec<u8>) {
        self.bytes = buf;
    }

    fn reset_local(&mut self, global_len: usize) {
        for &id in &self.local {
            if let Some(slot) = self.local_of.get_mut(id as usize) {
                *slot = NO_ID;
            }
        }
        self.local.clear();
        if self.local_of.len() < global_len {
            self.local_of.resize(global_len, NO_ID);
        }
    }

    fn local_index(&mut self, id: u32) {
        let slot = &mut self.local_of[id as usize];
        if *slot == NO_ID {
            *slot = self.local.len() as u32;
            self.local.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(section_y: i32, index: u16, id: u32) -> Cell {
        Cell {
            section_y,
            index,
            id,
        }
    }

    #[test]
    fn global_ids_follow_scan_order_with_empty_first() {
        let mut ctx = CodecContext::new();
        ctx.cells_mut()
            .extend([cell(1, 0, 2), cell(0, 5, 0), cell(0, 1, 1)]);
        ctx.sort_cells();
        ctx.assign_global_ids(3, Some(1));
        let ids: Vec<u32> = ctx.cells().iter().map(|c| c.id).collect();
        // (0,1) holds the empty value, (0,5) is first non-empty in scan order
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(ctx.global_ids(), &[NO_ID, 0, 2]);
    }

    #[test]
    fn local_palette_resets_between_sections() {
        let mut ctx = CodecContext::new();
        ctx.cells_mut()
            .extend([cell(0, 0, 3), cell(0, 1, 5), cell(0, 2, 3), cell(1, 7, 5)]);
        assert_eq!(ctx.build_local_palette(0..3, 6), &[0, 3, 5]);
        let dense = ctx.fill_dense(0..3);
        assert_eq!(&dense[..4], &[1, 2, 1, 0]);

        assert_eq!(ctx.build_local_palette(3..4, 6), &[0, 5]);
        let dense = ctx.fill_dense(3..4);
        assert_eq!(dense[7], 1);
        assert_eq!(dense[0], 0);
    }

    #[test]
    fn decoder_buffer_leaves_local_palette_intact() {
        let mut ctx = CodecContext::new();
        ctx.cells_mut()
            .extend([cell(0, 0, 1), cell(0, 1, 2), cell(0, 2, 3)]);
        assert_eq!(ctx.build_local_palette(0..3, 4), &[0, 1, 2, 3]);

        let decode_local = ctx.decode_local_mut();
        decode_local.clear();
        decode_local.push(2);

        assert_eq!(ctx.build_local_palette(0..3, 4), &[0, 1, 2, 3]);
        let dense = ctx.fill_dense(0..3);
        assert_eq!(&dense[..4], &[1, 2, 3, 0]);
    }

    #[test]
    fn buffers_survive_take_and_restore() {
        let mut ctx = CodecContext::new();
        let mut bits = ctx.take_bits();
        bits.extend_from_slice(&[1, 2, 3]);
        bits.clear();
        let cap = bits.capacity();
        ctx.restore_bits(bits);
        assert!(ctx.take_bits().capacity() >= cap);
    }
}

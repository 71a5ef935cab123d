mod support;

use std::collections::BTreeMap;

use codec::{
    decode, encode, restore, BaselineSnapshot, CodecLimits, CodecResult, LocalPos, RawBlobs,
    ReplaySink,
};
use support::*;

/// Bedrock at the bottom, stone up to y=63, grass at 64, air above.
fn generated(pos: LocalPos) -> Block {
    match pos.y() {
        -64 => block("bedrock", 0, 0),
        y if y < 64 => STONE,
        64 => block("grass", 0, 0),
        _ => AIR,
    }
}

fn baseline() -> BaselineSnapshot<Block> {
    BaselineSnapshot::from_fn(-4, 24, AIR, generated)
}

/// A live chunk: the generated terrain plus whatever was replayed.
#[derive(Default)]
struct LiveChunk {
    cells: BTreeMap<LocalPos, Block>,
    metadata: BTreeMap<LocalPos, Vec<u8>>,
    entities: Vec<Vec<u8>>,
}

impl LiveChunk {
    fn value_at(&self, pos: LocalPos) -> Block {
        self.cells.get(&pos).copied().unwrap_or_else(|| generated(pos))
    }
}

impl ReplaySink<Block, Vec<u8>> for LiveChunk {
    fn apply_change(&mut self, pos: LocalPos, state: &Block) -> CodecResult<()> {
        self.cells.insert(pos, *state);
        Ok(())
    }

    fn apply_metadata(&mut self, pos: LocalPos, blob: &Vec<u8>) -> CodecResult<()> {
        self.metadata.insert(pos, blob.clone());
        Ok(())
    }

    fn apply_free_records(&mut self, records: &[Vec<u8>]) -> CodecResult<()> {
        self.entities = records.to_vec();
        Ok(())
    }
}

#[test]
fn undone_change_is_dropped_on_restore() {
    let mut delta = new_delta();
    delta.add_or_update(pos(0, 64, 0), &block("grass", 0, 0)).unwrap();

    let (outgoing, outcome) = restore(&delta, &baseline(), &mut ()).unwrap();
    assert!(outcome.optimized);
    assert!(outgoing.is_empty());
    assert!(outgoing.is_dirty());
}

#[test]
fn save_load_restore_cycle() {
    let mapping = mapping();

    // session 1: the player digs a hole, places a chest, then refills the hole
    let mut delta = new_delta();
    delta.add_or_update(pos(5, 60, 5), &AIR).unwrap();
    delta.add_or_update(pos(5, 61, 5), &AIR).unwrap();
    delta.add_or_update(pos(6, 65, 6), &block("chest", 0, 0)).unwrap();
    delta.set_metadata(pos(6, 65, 6), b"diamonds".to_vec());
    delta.set_free_records(&[b"pig".to_vec()]);
    delta.add_or_update(pos(5, 61, 5), &STONE).unwrap();
    assert!(delta.is_dirty());
    let saved = encode(&delta, &mapping, &RawBlobs).unwrap();

    // session 2: load and replay on regenerated terrain
    let loaded = decode(&saved, &mapping, &RawBlobs, &CodecLimits::default()).unwrap();
    assert!(!loaded.is_dirty());
    let mut chunk = LiveChunk::default();
    let (outgoing, outcome) = restore(&loaded, &baseline(), &mut chunk).unwrap();

    assert!(outcome.optimized);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(outcome.replayed, 2);
    assert_eq!(chunk.value_at(pos(5, 60, 5)), AIR);
    assert_eq!(chunk.value_at(pos(5, 61, 5)), STONE);
    assert_eq!(chunk.value_at(pos(6, 65, 6)), block("chest", 0, 0));
    assert_eq!(chunk.metadata.get(&pos(6, 65, 6)), Some(&b"diamonds".to_vec()));
    assert_eq!(chunk.entities, vec![b"pig".to_vec()]);

    // the smaller delta is saved again and loads without further redundancy
    assert!(outgoing.is_dirty());
    assert_eq!(outgoing.len(), 2);
    let resaved = encode(&outgoing, &mapping, &RawBlobs).unwrap();
    assert!(resaved.len() < saved.len());
    let reloaded = decode(&resaved, &mapping, &RawBlobs, &CodecLimits::default()).unwrap();
    let (_, outcome) = restore(&reloaded, &baseline(), &mut ()).unwrap();
    assert!(!outcome.optimized);
    assert_eq!(outcome.replayed, 2);
}

#[test]
fn metadata_is_cleared_when_position_becomes_empty() {
    let mapping = mapping();
    let mut delta = new_delta();
    delta.add_or_update(pos(1, 70, 1), &block("chest", 0, 0)).unwrap();
    delta.set_metadata(pos(1, 70, 1), vec![7; 4]);
    let loaded = decode(
        &encode(&delta, &mapping, &RawBlobs).unwrap(),
        &mapping,
        &RawBlobs,
        &CodecLimits::default(),
    )
    .unwrap();

    // the decoded delta still knows which value is empty
    let (mut outgoing, _) = restore(&loaded, &baseline(), &mut ()).unwrap();
    outgoing.add_or_update(pos(1, 70, 1), &AIR).unwrap();
    assert_eq!(outgoing.metadata_at(pos(1, 70, 1)), None);
}

#[test]
fn repeated_writes_do_not_dirty() {
    let mut delta = new_delta();
    delta.add_or_update(pos(2, 2, 2), &DIRT).unwrap();
    delta.mark_clean();
    delta.add_or_update(pos(2, 2, 2), &DIRT).unwrap();
    delta.add_or_update(pos(2, 2, 2), &DIRT).unwrap();
    assert!(!delta.is_dirty());
    assert_eq!(delta.len(), 1);
}

#[test]
fn baseline_storage_matches_terrain() {
    let snapshot = baseline();
    let stats = snapshot.stats();
    // -4: bedrock layer, -3..=3: stone, 4: grass layer, rest: air
    assert_eq!(stats.paletted, 2);
    assert_eq!(stats.uniform, 7);
    assert_eq!(stats.absent, 15);
    assert_eq!(snapshot.sections(), -4..20);
}

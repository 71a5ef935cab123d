#![allow(dead_code)]

use std::collections::BTreeMap;

use codec::{CodecResult, Delta, DeltaVisitor, LocalPos};
use state::{PropertyDef, StateAdapter, StateMapping};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block {
    pub kind: &'static str,
    pub props: [u32; 2],
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Blocks;

impl StateAdapter for Blocks {
    type State = Block;
    type Shape = &'static str;
    type Property = usize;

    fn default_state(&self, shape: &&'static str) -> Block {
        Block {
            kind: *shape,
            props: [0, 0],
        }
    }

    fn shape_of(&self, state: &Block) -> &'static str {
        state.kind
    }

    fn properties(&self, shape: &&'static str) -> Vec<PropertyDef<usize>> {
        match *shape {
            "stairs" => vec![
                PropertyDef::new(0, "facing", 4),
                PropertyDef::new(1, "half", 2),
            ],
            "wheat" => vec![PropertyDef::new(0, "age", 8)],
            "note" => vec![
                PropertyDef::new(0, "instrument", 16),
                PropertyDef::new(1, "pitch", 25),
            ],
            _ => Vec::new(),
        }
    }

    fn property_index(&self, state: &Block, property: &usize) -> u32 {
        state.props[*property]
    }

    fn with_property(&self, state: &Block, property: &usize, index: u32) -> Block {
        let mut next = *state;
        next.props[*property] = index;
        next
    }

    fn is_empty(&self, state: &Block) -> bool {
        state.kind == "air"
    }

    fn empty_state(&self) -> Block {
        AIR
    }
}

pub const AIR: Block = Block {
    kind: "air",
    props: [0, 0],
};
pub const STONE: Block = Block {
    kind: "stone",
    props: [0, 0],
};
pub const DIRT: Block = Block {
    kind: "dirt",
    props: [0, 0],
};

pub fn block(kind: &'static str, a: u32, b: u32) -> Block {
    Block { kind, props: [a, b] }
}

/// One of 400 distinct note block states.
pub fn note(n: u32) -> Block {
    block("note", n % 16, (n / 16) % 25)
}

pub fn pos(x: i32, y: i32, z: i32) -> LocalPos {
    LocalPos::new(x, y, z).unwrap()
}

pub type BlockMapping = StateMapping<Blocks>;

pub fn mapping() -> BlockMapping {
    StateMapping::new(Blocks)
}

pub type BlockDelta = Delta<Block, Vec<u8>>;

pub fn new_delta() -> BlockDelta {
    Delta::for_adapter(&Blocks)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Contents {
    pub changes: BTreeMap<LocalPos, Block>,
    pub metadata: BTreeMap<LocalPos, Vec<u8>>,
    pub free_records: Vec<Vec<u8>>,
}

impl DeltaVisitor<Block, Vec<u8>> for Contents {
    fn visit_change(&mut self, pos: LocalPos, state: &Block) -> CodecResult<()> {
        self.changes.insert(pos, *state);
        Ok(())
    }

    fn visit_metadata(&mut self, pos: LocalPos, blob: &Vec<u8>) -> CodecResult<()> {
        self.metadata.insert(pos, blob.clone());
        Ok(())
    }

    fn visit_free_record(&mut self, blob: &Vec<u8>) -> CodecResult<()> {
        self.free_records.push(blob.clone());
        Ok(())
    }
}

pub fn contents(delta: &BlockDelta) -> Contents {
    let mut contents = Contents::default();
    delta.traverse(&mut contents).unwrap();
    contents
}

use codec::{
    decode_with, encode_with, CodecContext, CodecLimits, Delta, EncodeOptions, LocalPos, RawBlobs,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use state::{PropertyDef, StateAdapter, StateMapping};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Cell {
    shape: u8,
    variant: u32,
}

#[derive(Clone, Copy)]
struct Cells;

impl StateAdapter for Cells {
    type State = Cell;
    type Shape = u8;
    type Property = ();

    fn default_state(&self, shape: &u8) -> Cell {
        Cell {
            shape: *shape,
            variant: 0,
        }
    }

    fn shape_of(&self, state: &Cell) -> u8 {
        state.shape
    }

    fn properties(&self, shape: &u8) -> Vec<PropertyDef<()>> {
        if *shape % 2 == 0 {
            vec![PropertyDef::new((), "variant", 16)]
        } else {
            Vec::new()
        }
    }

    fn property_index(&self, state: &Cell, _property: &()) -> u32 {
        state.variant
    }

    fn with_property(&self, state: &Cell, _property: &(), index: u32) -> Cell {
        Cell {
            variant: index,
            ..*state
        }
    }

    fn is_empty(&self, state: &Cell) -> bool {
        state.shape == 0
    }

    fn empty_state(&self) -> Cell {
        Cell {
            shape: 0,
            variant: 0,
        }
    }
}

/// `changes` cells spread over 24 sections, with a handful of value kinds.
fn populated(changes: usize) -> Delta<Cell, Vec<u8>> {
    let mut delta = Delta::for_adapter(&Cells);
    let mut seed = 0x9E37_79B9u32;
    for _ in 0..changes {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let pos = LocalPos::from_section_index((seed >> 12) as i32 % 24 - 4, (seed & 0xFFF) as u16);
        let shape = 1 + (seed >> 20) as u8 % 12;
        let cell = Cell {
            shape,
            variant: if shape % 2 == 0 { (seed >> 8) % 16 } else { 0 },
        };
        delta.add_or_update(pos, &cell).expect("in range");
    }
    delta
}

fn bench_encode_decode(c: &mut Criterion) {
    let mapping = StateMapping::new(Cells);
    let mut ctx = CodecContext::new();
    let options = EncodeOptions::default();
    let limits = CodecLimits::default();
    let mut group = c.benchmark_group("delta");

    for changes in [64usize, 1024, 16_384] {
        let delta = populated(changes);
        let (bytes, _) =
            encode_with(&delta, &mapping, &RawBlobs, &options, &mut ctx).expect("encode");
        group.throughput(Throughput::Elements(changes as u64));

        group.bench_with_input(BenchmarkId::new("encode", changes), &delta, |b, delta| {
            b.iter(|| {
                encode_with(black_box(delta), &mapping, &RawBlobs, &options, &mut ctx)
                    .expect("encode")
            });
        });
        group.bench_with_input(BenchmarkId::new("decode", changes), &bytes, |b, bytes| {
            b.iter(|| {
                decode_with(black_box(bytes), &mapping, &RawBlobs, &limits, &mut ctx)
                    .expect("decode")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode_decode);
criterion_main!(benches);

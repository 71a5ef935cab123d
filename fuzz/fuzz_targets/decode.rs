#![no_main]

use codec::{decode, inspect, CodecLimits, RawBlobs};
use libfuzzer_sys::fuzz_target;
use state::{PropertyDef, StateAdapter, StateMapping};

/// Values are `(shape, variant)`; shape 0 is empty and every shape has one
/// 4-valued property.
#[derive(Clone, Copy)]
struct Cells;

impl StateAdapter for Cells {
    type State = (u8, u8);
    type Shape = u8;
    type Property = ();

    fn default_state(&self, shape: &u8) -> (u8, u8) {
        (*shape, 0)
    }

    fn shape_of(&self, state: &(u8, u8)) -> u8 {
        state.0
    }

    fn properties(&self, shape: &u8) -> Vec<PropertyDef<()>> {
        if *shape == 0 {
            Vec::new()
        } else {
            vec![PropertyDef::new((), "variant", 4)]
        }
    }

    fn property_index(&self, state: &(u8, u8), _property: &()) -> u32 {
        u32::from(state.1)
    }

    fn with_property(&self, state: &(u8, u8), _property: &(), index: u32) -> (u8, u8) {
        (state.0, index as u8)
    }

    fn is_empty(&self, state: &(u8, u8)) -> bool {
        state.0 == 0
    }

    fn empty_state(&self) -> (u8, u8) {
        (0, 0)
    }
}

fuzz_target!(|data: &[u8]| {
    let limits = CodecLimits::for_testing();
    let _ = inspect(data, &limits);

    let mapping = StateMapping::new(Cells);
    for shape in 1..=8u8 {
        let _ = mapping.short_id(&(shape, 0));
    }
    if let Ok(delta) = decode(data, &mapping, &RawBlobs, &limits) {
        assert!(!delta.is_dirty());
        assert!(delta.len() <= limits.max_total_cells);
    }
});

#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 4;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bool();
            }
            1 => {
                let bits = usize::from(data[idx.saturating_sub(1)] % 72);
                let _ = reader.read_bits(bits);
            }
            2 => {
                let bits = usize::from(data[idx.saturating_sub(1)] % 40);
                let _ = reader.read_zigzag(bits);
            }
            _ => {
                let _ = reader.ensure_in_bounds();
            }
        }
    }
    assert_eq!(reader.is_overrun(), reader.ensure_in_bounds().is_err());
});

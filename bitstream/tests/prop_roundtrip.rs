use bitstream::{zigzag_decode, zigzag_encode, BitReader, BitWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Bit(bool),
    Bits { bits: usize, value: u64 },
    ZigZag { bits: usize, value: i32 },
}

fn mask_value(bits: usize, value: u64) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

fn clamp_zigzag(bits: usize, value: i32) -> i32 {
    let half = 1i64 << (bits - 1);
    i64::from(value).clamp(-half, half - 1) as i32
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Bit),
        (1usize..=64, any::<u64>()).prop_map(|(bits, value)| Op::Bits {
            bits,
            value: mask_value(bits, value),
        }),
        (1usize..=32, any::<i32>()).prop_map(|(bits, value)| Op::ZigZag {
            bits,
            value: clamp_zigzag(bits, value),
        }),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = BitWriter::new();
        for op in &ops {
            match op {
                Op::Bit(b) => writer.write_bool(*b),
                Op::Bits { bits, value } => writer.write_bits(*value, *bits).unwrap(),
                Op::ZigZag { bits, value } => writer.write_zigzag(*value, *bits).unwrap(),
            }
        }
        let written = writer.bits_written();
        let bytes = writer.finish();
        prop_assert_eq!(bytes.len(), written.div_ceil(8));

        let mut reader = BitReader::new(&bytes);
        for op in &ops {
            match op {
                Op::Bit(b) => prop_assert_eq!(reader.read_bool(), *b),
                Op::Bits { bits, value } => prop_assert_eq!(reader.read_bits(*bits).unwrap(), *value),
                Op::ZigZag { bits, value } => prop_assert_eq!(reader.read_zigzag(*bits).unwrap(), *value),
            }
        }
        prop_assert!(reader.ensure_in_bounds().is_ok());
        prop_assert!(reader.bits_remaining() < 8);
    }

    #[test]
    fn prop_zigzag_is_bijective(value in any::<i32>()) {
        prop_assert_eq!(zigzag_decode(zigzag_encode(value)), value);
    }

    #[test]
    fn prop_truncated_reads_never_panic(data in prop::collection::vec(any::<u8>(), 0..16), widths in prop::collection::vec(0usize..=64, 0..32)) {
        let mut reader = BitReader::new(&data);
        let mut consumed = 0usize;
        for bits in widths {
            reader.read_bits(bits).unwrap();
            consumed += bits;
        }
        prop_assert_eq!(reader.bit_position(), consumed);
        prop_assert_eq!(reader.is_overrun(), consumed > data.len() * 8);
    }
}

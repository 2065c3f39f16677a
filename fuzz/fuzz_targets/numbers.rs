#![no_main]

use libfuzzer_sys::fuzz_target;
use quickcsv::{Charset, Decoder, NumberParsing};

fuzz_target!(|data: &[u8]| {
    let fast = Decoder::new(Charset::Utf8, NumberParsing::Fast);
    let precise = Decoder::new(Charset::Utf8, NumberParsing::Precise);

    // Verify: fast integer parsers accept exactly what std accepts
    assert_eq!(fast.parse_i32(data).ok(), precise.parse_i32(data).ok());
    assert_eq!(fast.parse_i64(data).ok(), precise.parse_i64(data).ok());
    assert_eq!(fast.parse_i16(data).ok(), precise.parse_i16(data).ok());
    assert_eq!(fast.parse_i8(data).ok(), precise.parse_i8(data).ok());

    // Verify: fast doubles are bit-identical to std
    let a = fast.parse_f64(data).ok().map(f64::to_bits);
    let b = precise.parse_f64(data).ok().map(f64::to_bits);
    assert_eq!(a, b);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use quickcsv::{Chunk, CsvParser, IterSource, ParserConfig, to_string_vec};

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (data, cuts) = input;

    // Reference: whole input in one chunk
    let parser = CsvParser::default();
    let whole = IterSource::new(std::iter::once(Ok(Chunk::from_vec(data.clone(), true))));
    let expected: Vec<Vec<String>> = parser
        .parse(whole, to_string_vec)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    // Same input cut at fuzzer-chosen points
    let mut points: Vec<usize> = cuts
        .iter()
        .map(|&c| if data.is_empty() { 0 } else { c as usize % (data.len() + 1) })
        .collect();
    points.sort_unstable();
    points.push(data.len());

    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, &end) in points.iter().enumerate() {
        let last = i == points.len() - 1;
        chunks.push(Ok(Chunk::from_vec(data[start..end].to_vec(), last)));
        start = end;
    }
    let split: Vec<Vec<String>> = parser
        .parse(IterSource::new(chunks.into_iter()), to_string_vec)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(expected, split);

    // Pooled buffers of every size agree too
    for size in [1, 3, 64] {
        let parser = CsvParser::new(ParserConfig::default().with_buffer_size(size));
        let pooled: Vec<Vec<String>> = parser
            .parse_reader(&data[..], to_string_vec)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(expected, pooled);
        assert_eq!(parser.pool().available(), parser.pool().created());
    }
});

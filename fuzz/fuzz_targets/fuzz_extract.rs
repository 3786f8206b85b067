#![no_main]

use libfuzzer_sys::fuzz_target;
use refaktura::core::{Extractor, FragmentStream, HEADER_BLOCK};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // One fragment per line, prefixed with the header so the fuzzer
        // gets past the first anchor.
        let fragments = HEADER_BLOCK.iter().copied().chain(s.lines());
        let _ = Extractor::default().extract(&FragmentStream::single_row(fragments));
    }
});

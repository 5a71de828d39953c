#![no_main]

use libfuzzer_sys::fuzz_target;
use texmark_core::{segment, Normalizer};

fuzz_target!(|data: &[u8]| {
    let Ok(document) = std::str::from_utf8(data) else {
        return;
    };

    let segmentation = segment(document);
    assert_eq!(segmentation.reconstruct(), document);
    for (i, s) in segmentation.segments.iter().enumerate() {
        assert_eq!(s.index, i);
    }

    // Normalization is total
    let _ = Normalizer::new().normalize_document(&segmentation.segments);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use xmlpick::{decode, encode, outline, OutlineOptions, SelectionSet};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tree) = decode(text) {
            let entries = outline(&tree, &OutlineOptions::unlimited());
            let selection: SelectionSet = entries.into_iter().filter_map(|e| e.path).step_by(2).collect();
            let _ = encode(&xmlpick::extract(&tree, &selection));
        }
    }
});

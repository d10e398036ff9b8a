#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(path) = xmlpick::Path::parse(text) {
            // a parsed path must survive its own formatting
            assert_eq!(xmlpick::Path::parse(&path.to_string()).ok(), Some(path));
        }
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use veil_core::{ModalOptions, ModalOptionsPatch};

fuzz_target!(|data: &[u8]| {
    let Ok(attr) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(patch) = ModalOptionsPatch::parse_attribute(attr) {
        let merged = ModalOptions::default().merged(&patch);
        if let Some(modifier) = &patch.modifier {
            assert_eq!(&merged.modifier, modifier);
        }
    }
});

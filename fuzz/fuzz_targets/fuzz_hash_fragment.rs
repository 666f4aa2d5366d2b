#![no_main]

use libfuzzer_sys::fuzz_target;
use veil_core::DeepLinkId;

fuzz_target!(|fragment: &str| {
    match DeepLinkId::from_fragment(fragment) {
        Ok(Some(id)) => {
            assert!(!id.as_str().is_empty());
            assert_eq!(DeepLinkId::parse(id.as_str()).as_ref(), Ok(&id));
        }
        Ok(None) => assert!(fragment.is_empty() || fragment == "#"),
        Err(_) => {}
    }
});

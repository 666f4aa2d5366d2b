#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use veil_core::timing::{parse_iteration_list, parse_time_list};
use veil_core::{AnimationTiming, VendorTiming};

#[derive(Debug, Arbitrary)]
struct Declaration {
    name: String,
    duration: String,
    delay: String,
    iteration_count: Option<String>,
}

fuzz_target!(|decls: Vec<Declaration>| {
    for d in &decls {
        let _ = parse_time_list(&d.duration);
        let _ = parse_time_list(&d.delay);
        if let Some(count) = &d.iteration_count {
            let _ = parse_iteration_list(count);
        }

        let count = d.iteration_count.as_deref().unwrap_or("1");
        let timing = AnimationTiming::parse(&d.name, &d.duration, &d.delay, count);
        let total = timing.total_seconds();
        assert!(!total.is_nan() && total >= 0.0, "bad total {total} for {d:?}");
    }

    let vendors: Vec<VendorTiming> = decls
        .iter()
        .map(|d| VendorTiming {
            name: Some(d.name.clone()),
            duration: Some(d.duration.clone()),
            delay: Some(d.delay.clone()),
            iteration_count: d.iteration_count.clone(),
        })
        .collect();
    let total = AnimationTiming::from_vendor_declarations(&vendors).total_seconds();
    assert!(!total.is_nan() && total >= 0.0);
});

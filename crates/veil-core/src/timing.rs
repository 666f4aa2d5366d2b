#![forbid(unsafe_code)]

//! CSS animation timing and effective-duration computation.
//!
//! A surface reports the computed `animation-*` properties the host sees for
//! it. The engine only needs one number out of them: how long the longest
//! declared animation runs, including delay and repetitions. When that number
//! is zero for every bound surface, a transition completes synchronously
//! instead of waiting for `animationend` notifications that will never come.
//!
//! # Invariants
//!
//! 1. A surface whose animation name is `none` (for every vendor prefix) has a
//!    zero duration regardless of the other properties.
//! 2. The duration list is canonical: delay and iteration-count lists are
//!    paired with it positionally and repeat cyclically when shorter, the way
//!    CSS expands comma-separated animation lists.
//! 3. The computed duration is never negative and never NaN.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unparseable token | Host returned garbage | Lenient path reads it as `0` |
//! | Missing delay/count list | Property unsupported | Defaults `0s` / `1` |
//! | `infinite` iteration count | Endless animation | Duration is `f64::INFINITY` |
//! | Negative delay | Animation starts mid-way | Entry clamped at `0` |

use core::fmt;

/// Error from strict timing-list parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    /// A `<time>` token without a valid number and `s`/`ms` unit.
    InvalidTime(String),
    /// An iteration count that is neither a non-negative number nor `infinite`.
    InvalidIterationCount(String),
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTime(tok) => write!(f, "invalid CSS time: {tok:?}"),
            Self::InvalidIterationCount(tok) => {
                write!(f, "invalid animation iteration count: {tok:?}")
            }
        }
    }
}

impl std::error::Error for TimingError {}

/// Parse a single CSS `<time>` token (`1.5s`, `200ms`) into seconds.
pub fn parse_time(token: &str) -> Result<f64, TimingError> {
    let tok = token.trim();
    let (number, scale) = if let Some(ms) = tok.strip_suffix("ms") {
        (ms, 0.001)
    } else if let Some(s) = tok.strip_suffix('s') {
        (s, 1.0)
    } else if tok == "0" {
        // Unitless zero is the only unitless time CSS accepts.
        return Ok(0.0);
    } else {
        return Err(TimingError::InvalidTime(tok.to_owned()));
    };

    match number.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v * scale),
        _ => Err(TimingError::InvalidTime(tok.to_owned())),
    }
}

/// Parse a single `animation-iteration-count` token.
pub fn parse_iteration_count(token: &str) -> Result<f64, TimingError> {
    let tok = token.trim();
    if tok.eq_ignore_ascii_case("infinite") {
        return Ok(f64::INFINITY);
    }
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(TimingError::InvalidIterationCount(tok.to_owned())),
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Parse a comma-separated `<time>` list.
pub fn parse_time_list(list: &str) -> Result<Vec<f64>, TimingError> {
    split_list(list).map(parse_time).collect()
}

/// Parse a comma-separated iteration-count list.
pub fn parse_iteration_list(list: &str) -> Result<Vec<f64>, TimingError> {
    split_list(list).map(parse_iteration_count).collect()
}

fn lenient_times(list: &str) -> Vec<f64> {
    split_list(list)
        .map(|t| parse_time(t).unwrap_or(0.0))
        .collect()
}

fn lenient_counts(list: &str) -> Vec<f64> {
    split_list(list)
        .map(|t| parse_iteration_count(t).unwrap_or(0.0))
        .collect()
}

/// Raw computed animation properties for one vendor prefix.
///
/// `None` (or an empty string) means the host does not know that property
/// under this prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorTiming {
    pub name: Option<String>,
    pub duration: Option<String>,
    pub delay: Option<String>,
    pub iteration_count: Option<String>,
}

impl VendorTiming {
    /// Unprefixed declaration with all four properties set.
    pub fn new(
        name: impl Into<String>,
        duration: impl Into<String>,
        delay: impl Into<String>,
        iteration_count: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            duration: Some(duration.into()),
            delay: Some(delay.into()),
            iteration_count: Some(iteration_count.into()),
        }
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

/// Normalized animation timing for one surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationTiming {
    /// `false` when the host reports animation name `none`.
    pub named: bool,
    /// Durations in seconds (canonical list length).
    pub durations: Vec<f64>,
    /// Delays in seconds.
    pub delays: Vec<f64>,
    /// Iteration counts (`f64::INFINITY` for `infinite`).
    pub iteration_counts: Vec<f64>,
}

impl AnimationTiming {
    /// A surface with no animation at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from already-parsed lists.
    #[must_use]
    pub fn from_lists(durations: Vec<f64>, delays: Vec<f64>, iteration_counts: Vec<f64>) -> Self {
        Self {
            named: true,
            durations,
            delays,
            iteration_counts,
        }
    }

    /// Leniently parse computed-style strings for a single (unprefixed) set
    /// of properties. Unparseable tokens read as `0`.
    #[must_use]
    pub fn parse(name: &str, duration: &str, delay: &str, iteration_count: &str) -> Self {
        Self {
            named: !is_none_name(name),
            durations: lenient_times(duration),
            delays: lenient_times(delay),
            iteration_counts: lenient_counts(iteration_count),
        }
    }

    /// Normalize the vendor-prefixed variants a host reports.
    ///
    /// The name is treated as `none` only if every prefix that reports a name
    /// says `none`. Each timing list comes from the first prefix with a
    /// non-empty value, falling back to `0s`, `0s` and `1`.
    #[must_use]
    pub fn from_vendor_declarations(decls: &[VendorTiming]) -> Self {
        let mut saw_name = false;
        let mut all_none = true;
        for name in decls.iter().filter_map(|d| non_empty(&d.name)) {
            saw_name = true;
            if !is_none_name(name) {
                all_none = false;
            }
        }

        let duration = first_non_empty(decls, |d| &d.duration, "0s");
        let delay = first_non_empty(decls, |d| &d.delay, "0s");
        let count = first_non_empty(decls, |d| &d.iteration_count, "1");

        Self {
            // A host that reports no name at all but does report timing lists
            // is trusted on the lists alone.
            named: !(saw_name && all_none),
            durations: lenient_times(duration),
            delays: lenient_times(delay),
            iteration_counts: lenient_counts(count),
        }
    }

    /// Effective duration in seconds: the maximum over all declared
    /// animations of `iteration_count * duration + delay`.
    #[must_use]
    pub fn total_seconds(&self) -> f64 {
        if !self.named || self.durations.is_empty() {
            return 0.0;
        }

        let mut max = 0.0_f64;
        for (i, &duration) in self.durations.iter().enumerate() {
            let delay = cyclic(&self.delays, i, 0.0);
            let count = cyclic(&self.iteration_counts, i, 1.0);
            let run = if duration == 0.0 {
                // 0 * infinite must not become NaN.
                0.0
            } else {
                duration * count
            };
            let total = run + delay;
            if total > max {
                max = total;
            }
        }
        max
    }

    /// Whether the surface finishes its animation immediately.
    #[inline]
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.total_seconds() == 0.0
    }
}

fn first_non_empty<'a>(
    decls: &'a [VendorTiming],
    select: impl Fn(&'a VendorTiming) -> &'a Option<String>,
    fallback: &'static str,
) -> &'a str {
    decls
        .iter()
        .find_map(|d| non_empty(select(d)))
        .unwrap_or(fallback)
}

fn cyclic(list: &[f64], i: usize, default: f64) -> f64 {
    if list.is_empty() {
        default
    } else {
        list[i % list.len()]
    }
}

fn is_none_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || split_list(trimmed).all(|n| n.eq_ignore_ascii_case("none"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn max_over_declarations() {
        let t = AnimationTiming::parse("fade, grow", "1s, 2s", "0.5s, 0s", "2, 1");
        assert!(approx(t.total_seconds(), 2.5));
    }

    #[test]
    fn none_name_is_zero() {
        let t = AnimationTiming::parse("none", "3s", "1s", "4");
        assert_eq!(t.total_seconds(), 0.0);
        assert!(t.is_instant());
    }

    #[test]
    fn milliseconds_are_scaled() {
        let t = AnimationTiming::parse("pop", "250ms", "50ms", "1");
        assert!(approx(t.total_seconds(), 0.3));
    }

    #[test]
    fn short_lists_repeat() {
        // Delay list of length one applies to every duration.
        let t = AnimationTiming::parse("a, b, c", "1s, 2s, 3s", "1s", "1");
        assert!(approx(t.total_seconds(), 4.0));
    }

    #[test]
    fn infinite_is_not_instant() {
        let t = AnimationTiming::parse("spin", "1s", "0s", "infinite");
        assert!(t.total_seconds().is_infinite());
        assert!(!t.is_instant());
    }

    #[test]
    fn zero_duration_infinite_is_zero() {
        let t = AnimationTiming::parse("spin", "0s", "0s", "infinite");
        assert!(t.is_instant());
    }

    #[test]
    fn negative_delay_clamps() {
        let t = AnimationTiming::parse("x", "1s", "-5s", "1");
        assert_eq!(t.total_seconds(), 0.0);
    }

    #[test]
    fn garbage_tokens_read_as_zero() {
        let t = AnimationTiming::parse("x", "abc, 1s", "??", "many");
        // Second entry: 1s * 0 (garbage count) + 0 = 0.
        assert_eq!(t.total_seconds(), 0.0);
    }

    #[test]
    fn strict_parse_rejects_garbage() {
        assert_eq!(
            parse_time_list("1s, fast"),
            Err(TimingError::InvalidTime("fast".into()))
        );
        assert!(parse_iteration_list("2, -1").is_err());
        assert_eq!(parse_time_list("1s, 0, 20ms").map(|v| v.len()), Ok(3));
    }

    #[test]
    fn vendor_none_everywhere() {
        let decls = [
            VendorTiming::new("none", "1s", "0s", "1"),
            VendorTiming {
                name: Some("none".into()),
                ..Default::default()
            },
        ];
        assert!(AnimationTiming::from_vendor_declarations(&decls).is_instant());
    }

    #[test]
    fn vendor_first_non_empty_wins() {
        let decls = [
            VendorTiming {
                name: Some("none".into()),
                duration: Some(String::new()),
                ..Default::default()
            },
            VendorTiming::new("remodal-opening-keyframes", "0.3s", "0s", "1"),
        ];
        let t = AnimationTiming::from_vendor_declarations(&decls);
        assert!(t.named);
        assert!(approx(t.total_seconds(), 0.3));
    }

    #[test]
    fn vendor_empty_defaults() {
        let t = AnimationTiming::from_vendor_declarations(&[]);
        assert!(t.is_instant());
    }

    proptest! {
        #[test]
        fn never_negative_or_nan(
            durations in proptest::collection::vec(0.0f64..10.0, 0..5),
            delays in proptest::collection::vec(-10.0f64..10.0, 0..5),
            counts in proptest::collection::vec(0.0f64..5.0, 0..5),
        ) {
            let total = AnimationTiming::from_lists(durations, delays, counts).total_seconds();
            prop_assert!(!total.is_nan());
            prop_assert!(total >= 0.0);
        }

        #[test]
        fn at_least_each_entry(
            entries in proptest::collection::vec((0.0f64..10.0, 0.0f64..10.0, 0.0f64..5.0), 1..6),
        ) {
            let durations: Vec<f64> = entries.iter().map(|e| e.0).collect();
            let delays: Vec<f64> = entries.iter().map(|e| e.1).collect();
            let counts: Vec<f64> = entries.iter().map(|e| e.2).collect();
            let total = AnimationTiming::from_lists(durations, delays, counts).total_seconds();
            for (d, delay, c) in entries {
                prop_assert!(total + 1e-9 >= d * c + delay);
            }
        }

        #[test]
        fn unnamed_is_always_zero(
            durations in proptest::collection::vec(0.0f64..10.0, 0..5),
        ) {
            let mut t = AnimationTiming::from_lists(durations, vec![], vec![]);
            t.named = false;
            prop_assert_eq!(t.total_seconds(), 0.0);
        }
    }
}

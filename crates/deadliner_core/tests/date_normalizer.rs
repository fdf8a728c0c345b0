use chrono::{Datelike, NaiveDate};
use deadliner_core::{DateNormalizer, InvalidDateError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn iso_input_passes_through_unchanged() {
    let normalizer = DateNormalizer::with_default_backend();

    assert_eq!(normalizer.normalize("2025-01-10").unwrap(), date(2025, 1, 10));
    assert_eq!(
        normalizer.normalize("  2025-01-10  ").unwrap(),
        date(2025, 1, 10)
    );
}

#[test]
fn malformed_input_is_rejected() {
    let normalizer = DateNormalizer::with_default_backend();

    for input in ["2025-13-40", "not-a-date", "2025/01/10", "", "soon"] {
        let err = normalizer.normalize(input).unwrap_err();
        assert!(
            matches!(err, InvalidDateError::Unparseable { .. }),
            "input `{input}` should be unparseable, got {err:?}"
        );
    }
}

#[test]
fn jalali_input_converts_to_canonical_gregorian() {
    let normalizer = DateNormalizer::with_default_backend();

    // Nowruz 1403 is a well-known anchor.
    assert_eq!(normalizer.normalize("1403-01-01").unwrap(), date(2024, 3, 20));
}

#[test]
fn display_conversion_is_zero_padded() {
    let normalizer = DateNormalizer::with_default_backend();

    assert_eq!(
        normalizer.to_display(date(2024, 3, 20)).unwrap(),
        "1403-01-01"
    );
}

#[test]
fn normalize_inverts_to_display_for_current_era_dates() {
    let normalizer = DateNormalizer::with_default_backend();

    // All samples fall in Jalali years 14xx, where the routing heuristic
    // sends the display string back through the Jalali parser.
    let samples = [
        date(2024, 3, 20),
        date(2025, 1, 10),
        date(2025, 8, 29),
        date(2026, 12, 31),
        date(2030, 6, 15),
    ];

    for sample in samples {
        let display = normalizer.to_display(sample).unwrap();
        assert_eq!(
            normalizer.normalize(&display).unwrap(),
            sample,
            "round-trip failed for {sample} via `{display}`"
        );
    }
}

#[test]
fn jalali_input_with_impossible_components_is_unconvertible() {
    let normalizer = DateNormalizer::with_default_backend();

    let err = normalizer.normalize("1403-13-01").unwrap_err();
    assert!(matches!(err, InvalidDateError::Unconvertible { .. }));

    let err = normalizer.normalize("1403-xx-01").unwrap_err();
    assert!(matches!(err, InvalidDateError::Unparseable { .. }));
}

#[test]
fn century_prefix_heuristic_misroutes_fifteenth_century_gregorian_input() {
    let normalizer = DateNormalizer::with_default_backend();

    // Documented limitation: a Gregorian date in 1400-1499 looks like a
    // Jalali date to the heuristic and is converted rather than validated.
    let converted = normalizer.normalize("1453-01-01").unwrap();
    assert_eq!(converted.year(), 2074);
}

#[test]
fn missing_backend_still_accepts_canonical_input() {
    let normalizer = DateNormalizer::without_backend();
    assert!(!normalizer.backend_available());

    assert_eq!(normalizer.normalize("2025-01-10").unwrap(), date(2025, 1, 10));
}

#[test]
fn missing_backend_fails_deterministically_on_jalali_paths() {
    let normalizer = DateNormalizer::without_backend();

    let err = normalizer.normalize("1404-01-01").unwrap_err();
    assert_eq!(err, InvalidDateError::BackendUnavailable);

    let err = normalizer.to_display(date(2025, 1, 10)).unwrap_err();
    assert_eq!(err, InvalidDateError::BackendUnavailable);
}

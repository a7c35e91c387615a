//! Property-based tests for search term validation and relative time labels.

use proptest::prelude::*;
use saferoute_core::config::Locale;
use saferoute_core::contacts::{format_relative_time, ContactError, SearchTerm};

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const NOW: i64 = 1_750_000_000_000;

// ============================================================================
// Search terms
// ============================================================================

proptest! {
    /// Letters only: no `@`, no digits, so neither an email nor a phone.
    #[test]
    fn plain_words_are_rejected(term in "[a-zA-Z ]{0,30}") {
        prop_assert!(matches!(
            SearchTerm::parse(&term),
            Err(ContactError::InvalidSearchTerm(_))
        ));
    }

    #[test]
    fn well_formed_emails_are_accepted(
        user in "[a-z0-9._]{1,12}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}",
    ) {
        let email = format!("{user}@{domain}.{tld}");
        prop_assert_eq!(SearchTerm::parse(&email).unwrap(), SearchTerm::Email(email.clone()));
    }

    #[test]
    fn brazilian_mobile_numbers_are_accepted(
        area in 11u32..=99,
        head in 1000u32..=9999,
        tail in 0u32..=9999,
    ) {
        prop_assume!(area % 10 != 0);
        let phone = format!("({area}) 9{head}-{tail:04}");
        prop_assert_eq!(SearchTerm::parse(&phone).unwrap().field(), "phone");
    }

    #[test]
    fn short_digit_runs_are_rejected(digits in "[0-9]{1,7}") {
        prop_assert!(SearchTerm::parse(&digits).is_err());
    }
}

// ============================================================================
// Relative time
// ============================================================================

proptest! {
    #[test]
    fn under_a_minute_is_now(elapsed in 0i64..MINUTE) {
        prop_assert_eq!(format_relative_time(NOW - elapsed, NOW, Locale::En), "now");
        prop_assert_eq!(format_relative_time(NOW - elapsed, NOW, Locale::PtBr), "Agora");
    }

    #[test]
    fn minutes_are_floored(minutes in 1i64..60, extra in 0i64..MINUTE) {
        let label = format_relative_time(NOW - minutes * MINUTE - extra, NOW, Locale::En);
        prop_assert_eq!(label, format!("{minutes} min ago"));
    }

    #[test]
    fn hours_are_floored(hours in 1i64..24, extra in 0i64..HOUR) {
        let label = format_relative_time(NOW - hours * HOUR - extra, NOW, Locale::PtBr);
        prop_assert_eq!(label, format!("{hours}h atrás"));
    }

    #[test]
    fn days_are_counted(days in 1i64..3650, extra in 0i64..DAY) {
        let pt = format_relative_time(NOW - days * DAY - extra, NOW, Locale::PtBr);
        let en = format_relative_time(NOW - days * DAY - extra, NOW, Locale::En);
        prop_assert_eq!(pt, format!("{days} dias atrás"));
        prop_assert_eq!(en, format!("{days} days ago"));
    }

    #[test]
    fn future_is_now(ahead in 0i64..(365 * DAY)) {
        prop_assert_eq!(format_relative_time(NOW + ahead, NOW, Locale::En), "now");
    }
}

//! # Display Date Boundary
//!
//! The single place where UTC source timestamps are shifted into the
//! dashboard's display timezone and rendered as strings.
//!
//! ## Rule
//! Server data is UTC. The dashboard displays a fixed local offset of
//! UTC+5. That shift lives HERE, behind a named constant, instead of as
//! literal `+5` arithmetic scattered across call sites.

use chrono::{DateTime, FixedOffset, Utc};

/// Hours the display timezone sits ahead of UTC.
pub const DISPLAY_OFFSET_HOURS: i32 = 5;

/// The fixed display offset as a chrono type.
///
/// `DISPLAY_OFFSET_HOURS` is in range, so the construction cannot fail.
pub fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_HOURS * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
}

/// Formats a UTC timestamp for display, shifted into the display timezone.
///
/// Output shape: `"May 01, 2024 02:30 PM"`.
pub fn format_display(dt: DateTime<Utc>) -> String {
    format_display_in(dt, display_offset())
}

/// Formats a UTC timestamp into an explicit offset.
///
/// Exposed separately so tests and future per-tenant configuration can
/// pass their own offset; production call sites use [`format_display`].
pub fn format_display_in(dt: DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).format("%b %d, %Y %I:%M %p").to_string()
}

/// Formats a UTC timestamp as a display date without time.
///
/// Output shape: `"May 01, 2024"`.
pub fn format_display_date(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&display_offset()).format("%b %d, %Y").to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_shifts_by_named_offset() {
        // 21:30 UTC + 5h = 02:30 next day, display time
        let dt = Utc.with_ymd_and_hms(2024, 4, 30, 21, 30, 0).unwrap();
        assert_eq!(format_display(dt), "May 01, 2024 02:30 AM");
    }

    #[test]
    fn test_display_afternoon() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_display(dt), "May 01, 2024 02:30 PM");
    }

    #[test]
    fn test_display_date_only() {
        let dt = Utc.with_ymd_and_hms(2024, 4, 30, 21, 30, 0).unwrap();
        assert_eq!(format_display_date(dt), "May 01, 2024");
    }

    #[test]
    fn test_explicit_offset_respected() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_display_in(dt, utc), "May 01, 2024 12:00 PM");
    }
}

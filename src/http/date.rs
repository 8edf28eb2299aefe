//! HTTP date handling
//!
//! Formats the fixed-width IMF-fixdate used by the `Date` header and cookie
//! `Expires` attribute, parses the three date grammars HTTP/1.1 accepts, and
//! abstracts the wall clock so cached renders can be tested deterministically.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Byte length of an IMF-fixdate, e.g. `Fri, 23 Aug 2019 12:58:03 GMT`
pub const HTTP_DATE_LEN: usize = 29;

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
// Netscape cookie spec variant with four-digit year
const COOKIE_DATE: &str = "%a, %d-%b-%Y %H:%M:%S GMT";
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(IMF_FIXDATE).to_string()
}

/// Parse any HTTP-date form into a UTC timestamp
///
/// # Examples
/// ```
/// use rust_http_response::http::date::parse_http_date;
/// let a = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
/// let b = parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT").unwrap();
/// let c = parse_http_date("Sun Nov  6 08:49:37 1994").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// ```
pub fn parse_http_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    [IMF_FIXDATE, RFC850_DATE, COOKIE_DATE, ASCTIME_DATE]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Source of wall-clock time for `Date` headers
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Whole seconds since the Unix epoch
    fn now_secs(&self) -> i64 {
        self.now().timestamp()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            secs: AtomicI64::new(start.timestamp()),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, time: DateTime<Utc>) {
        self.secs.store(time.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_is_fixed_width() {
        let time = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        let text = format_http_date(time);
        assert_eq!(text, "Fri, 23 Aug 2019 12:58:03 GMT");
        assert_eq!(text.len(), HTTP_DATE_LEN);

        let early = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
        assert_eq!(format_http_date(early).len(), HTTP_DATE_LEN);
    }

    #[test]
    fn test_parse_round_trip() {
        let time = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        assert_eq!(parse_http_date(&format_http_date(time)), Some(time));
        assert_eq!(
            parse_http_date("Fri, 23-Aug-2019 12:58:03 GMT"),
            Some(time)
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_http_date("yesterday"), None);
        assert_eq!(parse_http_date(""), None);
    }

    #[test]
    fn test_manual_clock() {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(1);
        assert_eq!(clock.now_secs(), start.timestamp() + 1);
        assert_eq!(format_http_date(clock.now()), "Fri, 01 Mar 2024 00:00:00 GMT");
    }
}

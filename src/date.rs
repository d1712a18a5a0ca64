//! Cookie 用の日付 (Netscape 形式)
//!
//! ## 概要
//!
//! Set-Cookie の `Expires` 属性で使われる `Wdy, DD-Mon-YYYY HH:MM:SS GMT`
//! 形式の日付のパースと生成を提供します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::date::{format_cookie_date, parse_cookie_date};
//!
//! let date = parse_cookie_date("Sun, 06-Nov-1994 08:49:37 GMT").unwrap();
//! assert_eq!(format_cookie_date(&date), "Sun, 06-Nov-1994 08:49:37 GMT");
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};

/// `max_age` が 0 の version 0 Cookie に使う過去日付
pub const ANCIENT_DATE: &str = "Thu, 01-Jan-1970 00:00:10 GMT";

const COOKIE_DATE_FORMAT: &str = "%a, %d-%b-%Y %H:%M:%S";

/// Cookie 形式の日付をパース
///
/// タイムゾーンは `GMT` / `UTC` / `Z` のみ受け付けます。
/// 解釈できない場合は `None` を返します。
pub fn parse_cookie_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    let (datetime, zone) = input.rsplit_once(' ')?;
    if !matches!(zone, "GMT" | "UTC" | "Z") {
        return None;
    }
    NaiveDateTime::parse_from_str(datetime, COOKIE_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Cookie 形式で日付を出力
pub fn format_cookie_date(date: &DateTime<Utc>) -> String {
    format!("{} GMT", date.format(COOKIE_DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse() {
        let date = parse_cookie_date("Wed, 09-Jun-2021 10:18:14 GMT").unwrap();
        assert_eq!(date.year(), 2021);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 9);
        assert_eq!(date.hour(), 10);
        assert_eq!(date.minute(), 18);
        assert_eq!(date.second(), 14);

        assert_eq!(
            parse_cookie_date("Wed, 09-Jun-2021 10:18:14 UTC"),
            Some(date)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_cookie_date(""), None);
        assert_eq!(parse_cookie_date("Wed, 09-Jun-2021 10:18:14 JST"), None);
        assert_eq!(parse_cookie_date("Wed, 09 Jun 2021 10:18:14 GMT"), None);
        assert_eq!(parse_cookie_date("tomorrow"), None);
    }

    #[test]
    fn test_ancient_date() {
        let date = parse_cookie_date(ANCIENT_DATE).unwrap();
        assert_eq!(date, Utc.timestamp_opt(10, 0).unwrap());
        assert_eq!(format_cookie_date(&date), ANCIENT_DATE);
    }
}

//! Length bounding for logged string fields.
//!
//! Log storage rejects documents in which a single field value is longer than
//! 32766 bytes. Every body written to a flow log goes through a
//! [`StringBounder`] so that no field exceeds the configured limit, and the
//! cut never lands inside a multi-byte character.

use crate::config::MaxStringLength;
use std::borrow::Cow;

/// Marker appended to every truncated value
pub const TRUNCATION_SUFFIX: &str = "...stringLengthTooLong";

/// Bounds strings to a fixed byte length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringBounder {
    limit: MaxStringLength,
}

impl StringBounder {
    /// Create a bounder for the given limit
    pub fn new(limit: MaxStringLength) -> Self {
        Self { limit }
    }

    /// Byte limit applied by this bounder
    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Bound a borrowed string, borrowing it back when it already fits.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowlog_common::config::MaxStringLength;
    /// use flowlog_common::truncation::StringBounder;
    ///
    /// let bounder = StringBounder::new(MaxStringLength::new(30));
    /// assert_eq!(bounder.bound("short"), "short");
    ///
    /// let long = "x".repeat(64);
    /// let bounded = bounder.bound(&long);
    /// assert_eq!(bounded, "xxxxxxxx...stringLengthTooLong");
    /// ```
    pub fn bound<'a>(&self, s: &'a str) -> Cow<'a, str> {
        bound_str(s, self.limit.get())
    }

    /// Bound an owned string in place.
    pub fn bound_owned(&self, mut s: String) -> String {
        let limit = self.limit.get();
        if s.len() <= limit {
            return s;
        }
        let (cut, with_suffix) = cut_point(&s, limit);
        s.truncate(cut);
        if with_suffix {
            s.push_str(TRUNCATION_SUFFIX);
        }
        s
    }
}

/// Bound `s` to at most `limit` bytes.
///
/// Strings within the limit are returned unchanged. Longer strings keep their
/// first `limit - TRUNCATION_SUFFIX.len()` bytes, moved back to the nearest
/// char boundary, followed by [`TRUNCATION_SUFFIX`]. When the limit is too
/// small to hold the marker the byte bound wins and the marker is dropped.
pub fn bound_str(s: &str, limit: usize) -> Cow<'_, str> {
    if s.len() <= limit {
        return Cow::Borrowed(s);
    }

    let (cut, with_suffix) = cut_point(s, limit);
    let mut out = String::with_capacity(limit);
    out.push_str(&s[..cut]);
    if with_suffix {
        out.push_str(TRUNCATION_SUFFIX);
    }
    Cow::Owned(out)
}

fn cut_point(s: &str, limit: usize) -> (usize, bool) {
    match limit.checked_sub(TRUNCATION_SUFFIX.len()) {
        Some(keep) => (floor_char_boundary(s, keep), true),
        None => (floor_char_boundary(s, limit), false),
    }
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut end = index;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_STRING_LENGTH_CEILING;

    #[test]
    fn test_short_string_is_borrowed() {
        let s = "hello";
        assert!(matches!(bound_str(s, 10), Cow::Borrowed("hello")));
        assert!(matches!(bound_str(s, 5), Cow::Borrowed("hello")));
    }

    #[test]
    fn test_long_string_is_marked() {
        let s = "a".repeat(100);
        let bounded = bound_str(&s, 40);
        assert_eq!(bounded.len(), 40);
        assert!(bounded.ends_with(TRUNCATION_SUFFIX));
        assert!(bounded.starts_with(&"a".repeat(18)));
    }

    #[test]
    fn test_cut_backs_off_multibyte_char() {
        // 'é' is two bytes, so an odd keep length lands mid-character.
        let s = "é".repeat(25);
        let limit = TRUNCATION_SUFFIX.len() + 5;
        let bounded = bound_str(&s, limit);
        assert_eq!(bounded, format!("éé{}", TRUNCATION_SUFFIX).as_str());
        assert!(bounded.len() <= limit);
    }

    #[test]
    fn test_four_byte_chars() {
        let s = "🦀".repeat(10);
        let limit = TRUNCATION_SUFFIX.len() + 7;
        let bounded = bound_str(&s, limit);
        assert_eq!(bounded, format!("🦀{}", TRUNCATION_SUFFIX).as_str());
    }

    #[test]
    fn test_limit_smaller_than_suffix() {
        let s = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(bound_str(s, 4), "abcd");
        assert_eq!(bound_str(s, 0), "");
        assert_eq!(bound_str("ééé", 3), "é");
    }

    #[test]
    fn test_default_limit() {
        let bounder = StringBounder::default();
        assert_eq!(bounder.limit(), MAX_STRING_LENGTH_CEILING);

        let at_limit = "x".repeat(MAX_STRING_LENGTH_CEILING);
        assert_eq!(bounder.bound(&at_limit).len(), MAX_STRING_LENGTH_CEILING);

        let over = "x".repeat(MAX_STRING_LENGTH_CEILING + 1);
        let bounded = bounder.bound(&over);
        assert_eq!(bounded.len(), MAX_STRING_LENGTH_CEILING);
        assert!(bounded.ends_with(TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_bound_owned_matches_bound() {
        let bounder = StringBounder::new(MaxStringLength::new(31));
        for s in ["", "tiny", "ü".repeat(40).as_str(), "z".repeat(31).as_str()] {
            assert_eq!(bounder.bound_owned(s.to_string()), bounder.bound(s));
        }
    }
}

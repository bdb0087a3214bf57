//! Date detection for textual values
//!
//! Candidate patterns use chrono `strftime` syntax. When none of the caller's
//! patterns fits, [`guess_date_pattern`] proposes one from the layout of the
//! value (separators, token lengths and positions) and the proposal is kept
//! only if it actually parses.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where a matching date pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternSource {
    /// One of the configured candidate patterns
    Declared,
    /// Proposed by the layout heuristic
    Guessed,
}

/// A date pattern that parses a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePatternMatch {
    pub pattern: String,
    pub source: PatternSource,
}

/// Whether `text` parses with `pattern` as a date, date-time or zoned date-time
pub fn parses_with(text: &str, pattern: &str) -> bool {
    NaiveDateTime::parse_from_str(text, pattern).is_ok()
        || NaiveDate::parse_from_str(text, pattern).is_ok()
        || DateTime::parse_from_str(text, pattern).is_ok()
}

/// Whether a pattern contains an hour specifier (`%H`, `%I`, `%k`, `%l`, or a
/// composite such as `%T` or `%+`)
pub fn has_hour_component(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        let mut spec = chars.next();
        while matches!(spec, Some('-' | '_' | '0' | '#' | ':' | '.' | '3' | '6' | '9')) {
            spec = chars.next();
        }
        if matches!(
            spec,
            Some('H' | 'I' | 'k' | 'l' | 'T' | 'R' | 'X' | 'c' | '+' | 'r')
        ) {
            return true;
        }
    }
    false
}

/// Find the first pattern that parses `text`
///
/// Declared patterns are tried in order; a pattern without an hour specifier
/// is skipped when the text contains a `:`. With `guess` set, a guessed
/// pattern is tried last.
pub fn find_date_pattern(
    text: &str,
    declared: &[String],
    guess: bool,
) -> Option<DatePatternMatch> {
    let has_time = text.contains(':');
    for pattern in declared {
        if has_time && !has_hour_component(pattern) {
            continue;
        }
        if parses_with(text, pattern) {
            return Some(DatePatternMatch {
                pattern: pattern.clone(),
                source: PatternSource::Declared,
            });
        }
    }

    if !guess {
        return None;
    }
    let guessed = guess_date_pattern(text)?;
    if parses_with(text, &guessed) {
        trace!("Guessed date pattern '{}' for '{}'", guessed, text);
        Some(DatePatternMatch {
            pattern: guessed,
            source: PatternSource::Guessed,
        })
    } else {
        None
    }
}

/// Propose a date pattern from the layout of `text`
///
/// Returns `None` when the layout does not look like a date. The proposal is
/// not verified here.
pub fn guess_date_pattern(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if DateTime::parse_from_rfc3339(text).is_ok() {
        return Some("%+".to_string());
    }

    let (date_part, time_pattern) = match text.find(':') {
        Some(colon) => {
            let start = text[..colon]
                .rfind([' ', 'T'])
                .filter(|&i| i > 0)?;
            let delimiter = &text[start..start + 1];
            let time = guess_time_pattern(&text[start + 1..])?;
            (&text[..start], Some(format!("{}{}", delimiter, time)))
        }
        None => (text, None),
    };

    let date_pattern = guess_calendar_pattern(date_part.trim_end())?;
    Some(match time_pattern {
        Some(time) => format!("{}{}", date_pattern, time),
        None => date_pattern,
    })
}

/// Pattern for the calendar part, e.g. `2024-01-15`, `15/01/24`, `Jan 15, 2024`
fn guess_calendar_pattern(date: &str) -> Option<String> {
    let separator = ['-', '/', '.'].into_iter().find(|s| date.contains(*s));
    let tokens: Vec<&str> = match separator {
        Some(sep) => date.split(sep).collect(),
        None => date.split_whitespace().collect(),
    };
    if tokens.len() != 3 {
        return None;
    }
    let sep = separator.map(String::from).unwrap_or_else(|| " ".to_string());

    let parts: Vec<Token> = tokens.iter().map(|t| Token::classify(t)).collect();
    let specs: [&str; 3] = match (&parts[0], &parts[1], &parts[2]) {
        // 2024-01-15
        (Token::Digits(4, _), Token::Digits(1..=2, _), Token::Digits(1..=2, _)) => {
            ["%Y", "%m", "%d"]
        }
        // 2024-Jan-15
        (Token::Digits(4, _), Token::Month(m), Token::Digits(1..=2, _)) => ["%Y", *m, "%d"],
        // 15-01-2024, 01/15/24
        (Token::Digits(1..=2, a), Token::Digits(1..=2, b), Token::Digits(y, _))
            if *y == 2 || *y == 4 =>
        {
            let year = if *y == 4 { "%Y" } else { "%y" };
            if *a > 12 {
                ["%d", "%m", year]
            } else if *b > 12 || sep == "/" {
                ["%m", "%d", year]
            } else {
                ["%d", "%m", year]
            }
        }
        // 15 January 2024, 15-Jan-24
        (Token::Digits(1..=2, _), Token::Month(m), Token::Digits(y, _))
            if *y == 2 || *y == 4 =>
        {
            ["%d", *m, if *y == 4 { "%Y" } else { "%y" }]
        }
        // January 15, 2024
        (Token::Month(m), Token::Digits(1..=2, _), Token::Digits(4, _)) if separator.is_none() => {
            [*m, "%d", "%Y"]
        }
        _ => return None,
    };

    let rendered: Vec<String> = specs
        .iter()
        .zip(tokens.iter())
        .map(|(spec, token)| {
            if token.ends_with(',') {
                format!("{},", spec)
            } else {
                spec.to_string()
            }
        })
        .collect();
    Some(rendered.join(&sep))
}

/// Pattern for the time part, e.g. `10:30`, `10:30:00.123Z`, `10:30 PM`, `10:30:00+02:00`
fn guess_time_pattern(time: &str) -> Option<String> {
    let (clock, suffix) = match time.split_once(' ') {
        Some((clock, rest)) => (clock, Some(rest.trim())),
        None => (time, None),
    };

    let (clock, zone) = if let Some(stripped) = clock.strip_suffix('Z') {
        (stripped, "Z")
    } else if let Some(idx) = clock.rfind(['+', '-']) {
        let offset = &clock[idx..];
        (&clock[..idx], if offset.contains(':') { "%:z" } else { "%z" })
    } else {
        (clock, "")
    };

    let groups: Vec<&str> = clock.split(':').collect();
    let twelve_hour = match suffix {
        Some(s) if s.eq_ignore_ascii_case("AM") || s.eq_ignore_ascii_case("PM") => true,
        None => false,
        Some(_) => return None,
    };
    let hour = if twelve_hour { "%I" } else { "%H" };

    let mut pattern = match groups.as_slice() {
        [h, m] if is_digits(h, 1, 2) && is_digits(m, 2, 2) => format!("{}:%M", hour),
        [h, m, s] if is_digits(h, 1, 2) && is_digits(m, 2, 2) => {
            match s.split_once('.') {
                Some((sec, frac)) if is_digits(sec, 2, 2) && is_digits(frac, 1, 9) => {
                    format!("{}:%M:%S%.f", hour)
                }
                None if is_digits(s, 2, 2) => format!("{}:%M:%S", hour),
                _ => return None,
            }
        }
        _ => return None,
    };
    pattern.push_str(zone);
    if twelve_hour {
        pattern.push_str(" %p");
    }
    Some(pattern)
}

#[derive(Debug)]
enum Token {
    /// Digit count and numeric value
    Digits(usize, u32),
    /// Month name spec: `%b` for abbreviations, `%B` for full names
    Month(&'static str),
    Other,
}

impl Token {
    fn classify(raw: &str) -> Token {
        let token = raw.trim_end_matches(',');
        if is_digits(token, 1, 4) {
            return Token::Digits(token.len(), token.parse().unwrap_or(0));
        }
        if token.len() >= 3 && token.chars().all(|c| c.is_ascii_alphabetic()) {
            return Token::Month(if token.len() == 3 { "%b" } else { "%B" });
        }
        Token::Other
    }
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

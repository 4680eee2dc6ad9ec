//! Free-text recurrence classification.
//!
//! The source service describes schedules as free text ("every day",
//! "every mon,weds,fri", "tomorrow at 4pm"). The destination only supports
//! single tasks and per-weekday recurring tasks, so this module decides which
//! of the two a text describes and, for recurring ones, which weekdays it
//! covers.
//!
//! Texts anchored to a concrete start ("every day starting 1 Jan",
//! "every 2nd monday") repeat on the source side but cannot be expressed as
//! a weekday schedule; they are classified as single.
//!
//! [`classify`] is a pure function of the text. All pattern constants live in
//! one table so the weekday tokens can be tested independently.

use std::sync::OnceLock;

use regex::Regex;

use questline_core::types::{RepeatSchedule, TaskKind};

/// Classification result: the task kind plus, for recurring tasks, the
/// weekday schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub kind: TaskKind,
    pub repeat: Option<RepeatSchedule>,
}

impl Recurrence {
    fn single() -> Self {
        Self {
            kind: TaskKind::Single,
            repeat: None,
        }
    }
}

/// Every pattern the classifier consults, compiled once.
struct PatternTable {
    /// Markers of a bounded/anchored schedule; these win over "every".
    anchored: Regex,
    /// "ev "/"every " followed by a non-digit opens a recurring text.
    leading_every: Regex,
    /// Generic "day"/"night" mention: all seven days.
    everyday: Regex,
    /// "every weekday" / "every day" grouping.
    weekday_group: Regex,
    /// "every weekend" / "every end" grouping.
    weekend_group: Regex,
    /// Whole-token short/long day names. Each matches the day's shortest
    /// token followed by end-of-text, space, comma, or the next letter of
    /// the long form ("w", "wed", "weds", "wednesday" all match `wednesday`).
    sunday: Regex,
    monday: Regex,
    tuesday: Regex,
    wednesday: Regex,
    thursday: Regex,
    friday: Regex,
    saturday: Regex,
}

fn table() -> &'static PatternTable {
    static TABLE: OnceLock<PatternTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("recurrence pattern compiles");
        PatternTable {
            anchored: compile(r"(?i)after|starting|last|\d+(?:st|nd|rd|th)|first|second|third"),
            leading_every: compile(r"(?i)^ev(?:ery)? [^\d]"),
            everyday: compile(r"(?i)^ev(?:ery)? [^week()]?(?:day|night)"),
            weekday_group: compile(r"(?i)^ev(?:ery)? (?:week)?day"),
            weekend_group: compile(r"(?i)^ev(?:ery)? (?:week)?end"),
            sunday: compile(r"(?i)\bs(?:$| |,|u)"),
            monday: compile(r"(?i)\bm(?:$| |,|o)"),
            tuesday: compile(r"(?i)\bt(?:$| |,|u)"),
            wednesday: compile(r"(?i)\bw(?:$| |,|e)"),
            thursday: compile(r"(?i)\bth(?:$| |,|u)"),
            friday: compile(r"(?i)\bf(?:$| |,|r)"),
            saturday: compile(r"(?i)\bsa(?:$| |,|t)"),
        }
    })
}

/// Classify a free-text due-date description.
///
/// Pure: the same text always yields the same result, independent of the
/// current date or time.
pub fn classify(text: Option<&str>) -> Recurrence {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Recurrence::single();
    };
    let patterns = table();

    // Anchored texts describe a bounded schedule ("every 2nd monday",
    // "every day starting 1 Jan") the destination cannot model as a
    // weekday repeat.
    if patterns.anchored.is_match(text) {
        return Recurrence::single();
    }

    let is_daily = text == "daily";
    if !is_daily && !patterns.leading_every.is_match(text) {
        return Recurrence::single();
    }

    let everyday = is_daily || patterns.everyday.is_match(text);
    let weekday = patterns.weekday_group.is_match(text);
    let weekend = patterns.weekend_group.is_match(text);

    let repeat = RepeatSchedule {
        su: everyday || weekend || patterns.sunday.is_match(text),
        m: everyday || weekday || patterns.monday.is_match(text),
        t: everyday || weekday || patterns.tuesday.is_match(text),
        // The "w" token also matches inside "weekend"; the group flag wins.
        w: everyday || weekday || (patterns.wednesday.is_match(text) && !weekend),
        th: everyday || weekday || patterns.thursday.is_match(text),
        f: everyday || weekday || patterns.friday.is_match(text),
        s: everyday || weekend || patterns.saturday.is_match(text),
    };

    Recurrence {
        kind: TaskKind::Recurring,
        repeat: Some(repeat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(su: bool, m: bool, t: bool, w: bool, th: bool, f: bool, s: bool) -> RepeatSchedule {
        RepeatSchedule { su, m, t, w, th, f, s }
    }

    fn recurring(repeat: RepeatSchedule) -> Recurrence {
        Recurrence {
            kind: TaskKind::Recurring,
            repeat: Some(repeat),
        }
    }

    #[test]
    fn classifies_each_date_text() {
        let single = Recurrence::single();
        let cases: Vec<(&str, Recurrence)> = vec![
            // Plain due dates stay single.
            ("Nov 20", single),
            ("today", single),
            ("tomorrow", single),
            ("friday", single),
            ("next friday", single),
            ("tom at 16:30", single),
            ("fri at 2pm", single),
            // Full-week schedules.
            ("daily", recurring(RepeatSchedule::everyday())),
            ("every day", recurring(RepeatSchedule::everyday())),
            ("every night", recurring(RepeatSchedule::everyday())),
            ("ev day at 1pm", recurring(RepeatSchedule::everyday())),
            // Individual days, short and long tokens.
            ("every sunday", recurring(days(true, false, false, false, false, false, false))),
            ("every s", recurring(days(true, false, false, false, false, false, false))),
            ("every monday", recurring(days(false, true, false, false, false, false, false))),
            ("every m", recurring(days(false, true, false, false, false, false, false))),
            ("every tuesday", recurring(days(false, false, true, false, false, false, false))),
            ("every t", recurring(days(false, false, true, false, false, false, false))),
            ("every wednesday", recurring(days(false, false, false, true, false, false, false))),
            ("every w", recurring(days(false, false, false, true, false, false, false))),
            ("every thursday", recurring(days(false, false, false, false, true, false, false))),
            ("every th", recurring(days(false, false, false, false, true, false, false))),
            ("every friday", recurring(days(false, false, false, false, false, true, false))),
            ("every f", recurring(days(false, false, false, false, false, true, false))),
            ("every saturday", recurring(days(false, false, false, false, false, false, true))),
            ("every sa", recurring(days(false, false, false, false, false, false, true))),
            // Groups.
            ("every weekday", recurring(days(false, true, true, true, true, true, false))),
            ("every weekend", recurring(days(true, false, false, false, false, false, true))),
            // Lists, with and without a time-of-day suffix.
            ("every mon,weds,fri", recurring(days(false, true, false, true, false, true, false))),
            ("every mon, fri at 20:00", recurring(days(false, true, false, false, false, true, false))),
            // Repeating on the source side, but anchored or interval-based —
            // not expressible as a weekday schedule.
            ("ev 7", single),
            ("ev 7th day in a month", single),
            ("ev 7 may", single),
            ("ev 3 days starting next monday", single),
            ("every day at 14:30 starting 1 Jan", single),
            ("every 13 may", single),
            ("every last day", single),
            ("every 2nd monday", single),
        ];

        for (input, expected) in cases {
            assert_eq!(classify(Some(input)), expected, "input: {input:?}");
        }
    }

    #[test]
    fn no_text_is_single() {
        assert_eq!(classify(None), Recurrence::single());
        assert_eq!(classify(Some("")), Recurrence::single());
    }

    #[test]
    fn weekend_never_sets_wednesday() {
        let parsed = classify(Some("every weekend"));
        let repeat = parsed.repeat.expect("weekend is recurring");
        assert!(repeat.su && repeat.s);
        assert!(!repeat.w, "the 'w' in 'weekend' must not set wednesday");
        assert!(!repeat.m && !repeat.t && !repeat.th && !repeat.f);
    }

    #[test]
    fn daily_and_every_day_agree() {
        assert_eq!(classify(Some("daily")), classify(Some("every day")));
    }

    #[test]
    fn classification_is_stable() {
        for _ in 0..3 {
            assert_eq!(
                classify(Some("every mon,weds,fri")),
                classify(Some("every mon,weds,fri"))
            );
        }
    }
}

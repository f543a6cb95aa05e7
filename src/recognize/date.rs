use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

use crate::config::DateContext;

/// Two-digit years above this belong to the 1900s.
const TWO_DIGIT_YEAR_PIVOT: u32 = 50;

lazy_static! {
    static ref ISO: Regex = Regex::new(r"(?:^|\D)(\d{4})-(\d{1,2})-(\d{1,2})(?:\D|$)").unwrap();
    static ref SLASH: Regex = Regex::new(r"(?:^|\D)(\d{1,2})/(\d{1,2})/(\d{4})(?:\D|$)").unwrap();
    static ref DASH: Regex = Regex::new(r"(?:^|\D)(\d{1,2})-(\d{1,2})-(\d{4})(?:\D|$)").unwrap();
    static ref DOT: Regex = Regex::new(r"(?:^|\D)(\d{1,2})\.(\d{1,2})\.(\d{4})(?:\D|$)").unwrap();
    static ref SPACE: Regex = Regex::new(r"(?:^|\D)(\d{1,2})\s+(\d{1,2})\s+(\d{4})(?:\D|$)").unwrap();
    static ref MONTH_NAME: Regex =
        Regex::new(r"(?i)(?:^|[^\dA-Za-z])(\d{1,2})(?:st|nd|rd|th)?[-\s/]*([A-Za-z]{3,9})\.?[-\s/,]*(\d{4})(?:\D|$)").unwrap();
    static ref SLASH_YY: Regex = Regex::new(r"(?:^|\D)(\d{1,2})/(\d{1,2})/(\d{2})(?:\D|$)").unwrap();
    static ref DASH_YY: Regex = Regex::new(r"(?:^|\D)(\d{1,2})-(\d{1,2})-(\d{2})(?:\D|$)").unwrap();
    static ref DOT_YY: Regex = Regex::new(r"(?:^|\D)(\d{1,2})\.(\d{1,2})\.(\d{2})(?:\D|$)").unwrap();
    static ref SPACE_YY: Regex = Regex::new(r"(?:^|\D)(\d{1,2})\s+(\d{1,2})\s+(\d{2})(?:\D|$)").unwrap();
    static ref MONTH_NAME_YY: Regex =
        Regex::new(r"(?i)(?:^|[^\dA-Za-z])(\d{1,2})(?:st|nd|rd|th)?[-\s/]*([A-Za-z]{3,9})\.?[-\s/,]*(\d{2})(?:\D|$)").unwrap();
    static ref DAY_MONTH: Regex = Regex::new(r"^\s*(\d{1,2})\s*(?:[/.]|\s)\s*(\d{1,2})\s*$").unwrap();
    static ref LONE_DAY: Regex = Regex::new(r"(?i)^\s*(\d{1,2})(?:st|nd|rd|th)?\s*$").unwrap();
}

static MONTHS: &[(&str, &str)] = &[
    ("jan", "january"),
    ("feb", "february"),
    ("mar", "march"),
    ("apr", "april"),
    ("may", "may"),
    ("jun", "june"),
    ("jul", "july"),
    ("aug", "august"),
    ("sep", "september"),
    ("oct", "october"),
    ("nov", "november"),
    ("dec", "december"),
];

#[derive(Clone, Copy)]
enum Layout {
    YearMonthDay,
    DayMonthYear,
    DayMonthNameYear,
}

#[derive(Clone, Copy)]
enum Century {
    Full,
    Pivot,
}

/// Recognizes roster dates in the many spellings hand-made tables use.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRecognizer {
    context: Option<DateContext>,
}

impl DateRecognizer {
    pub fn new(context: Option<DateContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> Option<DateContext> {
        self.context
    }

    pub fn recognize(&self, text: &str) -> Option<NaiveDate> {
        let patterns: [(&Regex, Layout, Century); 11] = [
            (&*ISO, Layout::YearMonthDay, Century::Full),
            (&*SLASH, Layout::DayMonthYear, Century::Full),
            (&*DASH, Layout::DayMonthYear, Century::Full),
            (&*DOT, Layout::DayMonthYear, Century::Full),
            (&*SPACE, Layout::DayMonthYear, Century::Full),
            (&*MONTH_NAME, Layout::DayMonthNameYear, Century::Full),
            (&*SLASH_YY, Layout::DayMonthYear, Century::Pivot),
            (&*DASH_YY, Layout::DayMonthYear, Century::Pivot),
            (&*DOT_YY, Layout::DayMonthYear, Century::Pivot),
            (&*SPACE_YY, Layout::DayMonthYear, Century::Pivot),
            (&*MONTH_NAME_YY, Layout::DayMonthNameYear, Century::Pivot),
        ];

        for (pattern, layout, century) in patterns {
            let found = pattern
                .captures_iter(text)
                .find_map(|caps| date_from_captures(&caps, layout, century));
            if found.is_some() {
                return found;
            }
        }

        self.recognize_partial(text)
    }

    pub fn is_date(&self, text: &str) -> bool {
        self.recognize(text).is_some()
    }

    /// `DD/MM` and a lone day number, completed from the context.
    fn recognize_partial(&self, text: &str) -> Option<NaiveDate> {
        let context = self.context?;

        if let Some(caps) = DAY_MONTH.captures(text) {
            let day = number(&caps, 1)?;
            let month = number(&caps, 2)?;
            return calendar_date(context.year, month, day);
        }

        if let Some(caps) = LONE_DAY.captures(text) {
            let day = number(&caps, 1)?;
            return calendar_date(context.year, context.month, day);
        }

        None
    }
}

/// Builds the date and rejects anything chrono would have to adjust.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    (date.year() == year && date.month() == month && date.day() == day).then_some(date)
}

/// Most frequent (year, month) among fully qualified dates, earliest on a tie.
pub fn infer_context<'a, I>(texts: I) -> Option<DateContext>
where
    I: IntoIterator<Item = &'a str>,
{
    let recognizer = DateRecognizer::new(None);
    let mut counts: BTreeMap<(i32, u32), usize> = BTreeMap::new();

    for text in texts {
        if let Some(date) = recognizer.recognize(text) {
            *counts.entry((date.year(), date.month())).or_default() += 1;
        }
    }

    let mut best: Option<((i32, u32), usize)> = None;
    for (key, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((key, count));
        }
    }

    best.map(|((year, month), _)| DateContext::new(year, month))
}

fn date_from_captures(caps: &Captures<'_>, layout: Layout, century: Century) -> Option<NaiveDate> {
    let (year, month, day) = match layout {
        Layout::YearMonthDay => (number(caps, 1)?, number(caps, 2)?, number(caps, 3)?),
        Layout::DayMonthYear => (number(caps, 3)?, number(caps, 2)?, number(caps, 1)?),
        Layout::DayMonthNameYear => (number(caps, 3)?, month_number(caps.get(2)?.as_str())?, number(caps, 1)?),
    };

    let year = match century {
        Century::Full => year,
        Century::Pivot if year > TWO_DIGIT_YEAR_PIVOT => 1900 + year,
        Century::Pivot => 2000 + year,
    };

    calendar_date(i32::try_from(year).ok()?, month, day)
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn month_number(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTHS
        .iter()
        .position(|(abbr, full)| word == *abbr || word == *full || (word == "sept" && *abbr == "sep"))
        .map(|idx| idx as u32 + 1)
}

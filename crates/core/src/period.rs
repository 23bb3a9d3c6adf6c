use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved date interval. `None` bounds mean unbounded; a `None` label
/// means no period was detected. Both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub label: Option<String>,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, self.start, self.end) {
            (Some(label), Some(start), Some(end)) => write!(f, "{label} ({start} to {end})"),
            (Some(label), _, _) => write!(f, "{label}"),
            _ => write!(f, "all time"),
        }
    }
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        TimeWindow::default()
    }

    pub fn new(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Self {
        TimeWindow {
            start: Some(start),
            end: Some(end),
            label: Some(label.into()),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

// A trailing year must be four digits or apostrophe-short ("'23"), so a
// day of the month ("march 15") is not read as a year.
re!(
    re_month,
    r"\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\b(?:\s+(?:(\d{4})|'(\d{2}))\b)?"
);
re!(re_last_days, r"last (\d+) days?");

/// Maps temporal phrases in a query to a [`TimeWindow`] relative to a
/// reference date.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowResolver {
    today: NaiveDate,
}

impl TimeWindowResolver {
    pub fn new(today: NaiveDate) -> Self {
        TimeWindowResolver { today }
    }

    /// Resolver anchored at the local calendar date.
    pub fn today() -> Self {
        TimeWindowResolver::new(Local::now().date_naive())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    pub fn resolve(&self, query: &str) -> TimeWindow {
        let q = query.to_lowercase();
        let today = self.today;

        if q.contains("this month") || q.contains("current month") {
            return TimeWindow::new(first_of_month(today.year(), today.month()), today, "this month");
        }

        if q.contains("last month") || q.contains("previous month") {
            let (year, month) = previous_month(today.year(), today.month());
            return TimeWindow::new(
                first_of_month(year, month),
                last_of_month(year, month),
                "last month",
            );
        }

        if let Some(window) = self.month_window(&q) {
            return window;
        }

        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

        if q.contains("this week") || q.contains("current week") {
            return TimeWindow::new(monday, today, "this week");
        }

        if q.contains("last week") || q.contains("previous week") {
            return TimeWindow::new(monday - Duration::days(7), monday - Duration::days(1), "last week");
        }

        if q.contains("today") {
            return TimeWindow::new(today, today, "today");
        }

        if q.contains("yesterday") {
            let yesterday = today - Duration::days(1);
            return TimeWindow::new(yesterday, yesterday, "yesterday");
        }

        if let Some(c) = re_last_days().captures(&q) {
            if let Some(days) = c.get(1).and_then(|m| m.as_str().parse::<i64>().ok()) {
                let start = Duration::try_days(days).and_then(|d| today.checked_sub_signed(d));
                if let Some(start) = start {
                    return TimeWindow::new(start, today, format!("last {days} days"));
                }
            }
        }

        TimeWindow::unbounded()
    }

    fn month_window(&self, q: &str) -> Option<TimeWindow> {
        let c = re_month().captures(q)?;
        let name = c.get(1)?.as_str();
        let month = month_name_to_num(name)?;
        let year = match c
            .get(2)
            .or_else(|| c.get(3))
            .and_then(|y| y.as_str().parse::<i32>().ok())
        {
            Some(y) => expand_year(y),
            None if month > self.today.month() => self.today.year() - 1,
            None => self.today.year(),
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = last_of_month(year, month);
        let label = format!("{} {}", full_month_name(month), year);
        Some(TimeWindow::new(start, end, label))
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    first_of_month(next_year, next_month) - Duration::days(1)
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

fn month_name_to_num(name: &str) -> Option<u32> {
    match name {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sept" | "sep" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

fn full_month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

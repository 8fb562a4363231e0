//! Calendar bucketing for the statistics drill-down: distinct periods
//! containing at least one session, each with its record count, newest
//! first. Weeks use the log's fixed scheme, not ISO numbering.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use types::PlayedGame;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    pub year: i32,
    pub week: u32,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: String,
    pub count: u64,
}

/// Week number in the fixed scheme: week 0 starts on January 1 and each
/// week spans exactly seven days, regardless of weekday.
pub fn fixed_week_of_year(date: NaiveDate) -> u32 {
    date.ordinal0() / 7
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn years_with_count(games: &[PlayedGame]) -> Vec<YearBucket> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for game in games {
        *counts.entry(game.played_at.year()).or_default() += 1;
    }
    counts
        .into_iter()
        .rev()
        .map(|(year, count)| YearBucket { year, count })
        .collect()
}

pub fn months_with_count(games: &[PlayedGame], year: Option<i32>) -> Vec<MonthBucket> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for game in games {
        let date = game.played_at.date_naive();
        if year.map_or(true, |filter| date.year() == filter) {
            *counts.entry((date.year(), date.month())).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .rev()
        .map(|((year, month), count)| MonthBucket { year, month, count })
        .collect()
}

pub fn weeks_with_count(games: &[PlayedGame], year: Option<i32>) -> Vec<WeekBucket> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for game in games {
        let date = game.played_at.date_naive();
        if year.map_or(true, |filter| date.year() == filter) {
            *counts
                .entry((date.year(), fixed_week_of_year(date)))
                .or_default() += 1;
        }
    }
    counts
        .into_iter()
        .rev()
        .map(|((year, week), count)| WeekBucket { year, week, count })
        .collect()
}

pub fn days_with_count(
    games: &[PlayedGame],
    year: Option<i32>,
    month: Option<u32>,
) -> Vec<DayBucket> {
    let mut counts: BTreeMap<(i32, u32, u32), (Weekday, u64)> = BTreeMap::new();
    for game in games {
        let date = game.played_at.date_naive();
        if year.map_or(true, |filter| date.year() == filter)
            && month.map_or(true, |filter| date.month() == filter)
        {
            let entry = counts
                .entry((date.year(), date.month(), date.day()))
                .or_insert((date.weekday(), 0));
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .rev()
        .map(|((year, month, day), (weekday, count))| DayBucket {
            year,
            month,
            day,
            weekday: weekday_name(weekday).to_string(),
            count,
        })
        .collect()
}

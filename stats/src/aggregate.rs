//! The aggregation engine: pure functions from a windowed set of played
//! games to per-player or per-task mappings. Every mapping excludes keys
//! whose value would be zero; callers must not assume all entities appear.

use std::collections::BTreeMap;

use chrono::Datelike;
use itertools::Itertools;
use types::PlayedGame;

/// Sessions won per player. A record credits both its game winner and its
/// task winner when both are present; the two are independent credit
/// events, so one session can increment two different players.
pub fn most_wins(games: &[PlayedGame]) -> BTreeMap<i64, u64> {
    let mut wins: BTreeMap<i64, u64> = BTreeMap::new();
    for game in games {
        for winner in game.winners() {
            *wins.entry(winner).or_default() += 1;
        }
    }
    wins
}

/// Points summed per player across every session carrying a score map.
pub fn most_points(games: &[PlayedGame]) -> BTreeMap<i64, i64> {
    let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
    for game in games {
        if let Some(points) = &game.points {
            for (&player_id, &score) in points {
                *totals.entry(player_id).or_default() += score;
            }
        }
    }
    totals.retain(|_, total| *total != 0);
    totals
}

/// Sessions in which each task was won, keyed by task id.
pub fn most_won_task(games: &[PlayedGame]) -> BTreeMap<i64, u64> {
    let mut wins: BTreeMap<i64, u64> = BTreeMap::new();
    for game in games {
        if let Some(task_id) = game.task_id {
            *wins.entry(task_id).or_default() += 1;
        }
    }
    wins
}

/// Best single-session score per player; a maximum, not a sum.
pub fn highest_points_per_game(games: &[PlayedGame]) -> BTreeMap<i64, i64> {
    let mut best: BTreeMap<i64, i64> = BTreeMap::new();
    for game in games {
        if let Some(points) = &game.points {
            for (&player_id, &score) in points {
                best.entry(player_id)
                    .and_modify(|current| *current = (*current).max(score))
                    .or_insert(score);
            }
        }
    }
    best.retain(|_, score| *score != 0);
    best
}

/// Session count per weekday, keys 0 = Monday .. 6 = Sunday. Weekdays
/// without sessions are absent.
pub fn most_popular_days(games: &[PlayedGame]) -> BTreeMap<u32, u64> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for game in games {
        let weekday = game.played_at.weekday().num_days_from_monday();
        *counts.entry(weekday).or_default() += 1;
    }
    counts
}

/// Longest run of consecutive sessions won by the same player. Sessions
/// are ordered by `(played_at, id)` internally, so the result does not
/// depend on the order of the input. A session a player did not win ends
/// that player's run; a session with no winner at all ends every run.
pub fn longest_win_streak(games: &[PlayedGame]) -> BTreeMap<i64, u64> {
    let ordered: Vec<&PlayedGame> = games
        .iter()
        .sorted_by_key(|game| (game.played_at, game.id))
        .collect();

    let mut best: BTreeMap<i64, u64> = BTreeMap::new();
    let mut running: BTreeMap<i64, u64> = BTreeMap::new();

    for game in ordered {
        let winners: Vec<i64> = game.winners().collect();
        running.retain(|player_id, length| {
            if winners.contains(player_id) {
                true
            } else {
                let entry = best.entry(*player_id).or_default();
                *entry = (*entry).max(*length);
                false
            }
        });
        for winner in winners {
            *running.entry(winner).or_default() += 1;
        }
    }
    for (player_id, length) in running {
        let entry = best.entry(player_id).or_default();
        *entry = (*entry).max(length);
    }
    best.retain(|_, length| *length != 0);
    best
}

/// Sessions each player was present for; the denominator for win ratios,
/// independent of win type.
pub fn games_played(games: &[PlayedGame]) -> BTreeMap<i64, u64> {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for game in games {
        for &player_id in &game.present_players {
            *counts.entry(player_id).or_default() += 1;
        }
    }
    counts
}

/// wins / played per player, derived from the two count mappings. Only
/// players present in BOTH appear: winless players are excluded, as are
/// wins with no recorded participation.
pub fn win_ratios(
    wins: &BTreeMap<i64, u64>,
    played: &BTreeMap<i64, u64>,
) -> BTreeMap<i64, f64> {
    let mut ratios = BTreeMap::new();
    for (&player_id, &win_count) in wins {
        if let Some(&played_count) = played.get(&player_id) {
            if played_count > 0 {
                ratios.insert(player_id, win_count as f64 / played_count as f64);
            }
        }
    }
    ratios
}

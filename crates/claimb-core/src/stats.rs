//! Derived statistics over cached matches.

use claimb_types::{CategoryStats, Match, Participant, PerformanceSummary};
use std::collections::BTreeMap;

/// Group `(category, win)` observations into per-category tallies.
///
/// Empty labels are dropped. Output is ordered by `total` descending, then by
/// category ascending.
pub fn aggregate<I, S>(observations: I) -> Vec<CategoryStats>
where
    I: IntoIterator<Item = (S, bool)>,
    S: Into<String>,
{
    let mut tallies: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for (category, win) in observations {
        let category = category.into();
        if category.is_empty() {
            continue;
        }
        let (wins, total) = tallies.entry(category).or_default();
        *total += 1;
        if win {
            *wins += 1;
        }
    }

    let mut stats: Vec<CategoryStats> = tallies
        .into_iter()
        .filter(|(_, (_, total))| *total > 0)
        .map(|(category, (wins, total))| CategoryStats {
            category,
            wins,
            total,
            win_rate: f64::from(wins) / f64::from(total),
        })
        .collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    stats
}

fn rows<'a>(matches: &'a [Match], puuid: &'a str) -> impl Iterator<Item = &'a Participant> {
    matches.iter().filter_map(move |m| m.participant(puuid))
}

/// Win rate per team position.
pub fn role_stats(matches: &[Match], puuid: &str) -> Vec<CategoryStats> {
    aggregate(rows(matches, puuid).map(|p| (p.team_position.clone(), p.win)))
}

/// Win rate per champion played.
pub fn champion_stats(matches: &[Match], puuid: &str) -> Vec<CategoryStats> {
    aggregate(rows(matches, puuid).map(|p| (p.champion_name.clone(), p.win)))
}

/// Totals for `puuid` across `matches`; matches they did not play are skipped.
pub fn performance_summary(matches: &[Match], puuid: &str) -> PerformanceSummary {
    let mut games = 0_u32;
    let mut wins = 0_u32;
    let mut kda_sum = 0.0;
    let mut creep_score = 0_u64;
    let mut minutes = 0.0;
    let mut vision = 0_u64;

    for m in matches {
        let Some(p) = m.participant(puuid) else { continue };
        games += 1;
        wins += u32::from(p.win);
        kda_sum += p.kda();
        creep_score += u64::from(p.creep_score());
        minutes += m.duration_minutes();
        vision += u64::from(p.vision_score);
    }

    if games == 0 {
        return PerformanceSummary::default();
    }
    let games_f = f64::from(games);
    PerformanceSummary {
        games,
        wins,
        win_rate: f64::from(wins) / games_f,
        average_kda: kda_sum / games_f,
        cs_per_minute: if minutes > 0.0 { creep_score as f64 / minutes } else { 0.0 },
        vision_per_game: vision as f64 / games_f,
    }
}

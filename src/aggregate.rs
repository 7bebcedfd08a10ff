// Season aggregation: folds the normalized match list into per-player and
// per-team accumulators in a single left-to-right pass over
// weeks -> matches -> teams -> players.
//
// The accumulator is an explicit structure returned as an immutable snapshot;
// there is no ambient state. Totals are commutative sums, so traversal order
// only affects intermediate display order, but min/max tracking must see
// every match.

use std::collections::HashMap;

use crate::normalize::{Match, MatchWeek, PlayerMatchRecord};
use tracing::debug;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Cumulative statistics for one player across all matches. Identity is the
/// exact (case-sensitive) player name as it appears in the performance data.
#[derive(Debug, Clone)]
pub struct PlayerAggregate {
    pub name: String,
    /// Fantasy team of first appearance. Later appearances under a different
    /// team do not change this (mid-season trades are not modeled).
    pub team: String,
    pub runs: f64,
    pub balls: f64,
    pub fours: f64,
    pub sixes: f64,
    pub wickets: f64,
    pub dots: f64,
    pub catches: f64,
    pub total_points: f64,
    pub matches: u32,
    /// total_points / matches, recomputed after every fold. Explicitly 0
    /// while no matches have been folded in.
    pub average_points: f64,
}

impl PlayerAggregate {
    fn new(name: &str, team: &str) -> Self {
        PlayerAggregate {
            name: name.to_string(),
            team: team.to_string(),
            runs: 0.0,
            balls: 0.0,
            fours: 0.0,
            sixes: 0.0,
            wickets: 0.0,
            dots: 0.0,
            catches: 0.0,
            total_points: 0.0,
            matches: 0,
            average_points: 0.0,
        }
    }

    fn fold(&mut self, record: &PlayerMatchRecord) {
        self.runs += record.runs;
        self.balls += record.balls;
        self.fours += record.fours;
        self.sixes += record.sixes;
        self.wickets += record.wickets;
        self.dots += record.dots;
        self.catches += record.catches;
        self.total_points += record.points;
        self.matches += 1;
        self.average_points = self.total_points / self.matches as f64;
    }
}

/// Running standing for one fantasy team, updated once per match per team.
#[derive(Debug, Clone)]
pub struct TeamStanding {
    pub team: String,
    pub matches: u32,
    pub total_points: f64,
    pub average_points: f64,
    pub highest_score: f64,
    /// Starts at +infinity so the first observed score always replaces it.
    pub lowest_score: f64,
}

impl TeamStanding {
    fn new(team: &str) -> Self {
        TeamStanding {
            team: team.to_string(),
            matches: 0,
            total_points: 0.0,
            average_points: 0.0,
            highest_score: 0.0,
            lowest_score: f64::INFINITY,
        }
    }

    fn fold(&mut self, score: f64) {
        self.matches += 1;
        self.total_points += score;
        self.average_points = self.total_points / self.matches as f64;
        self.highest_score = self.highest_score.max(score);
        self.lowest_score = self.lowest_score.min(score);
    }
}

/// Immutable result of the aggregation pass.
#[derive(Debug, Clone)]
pub struct SeasonTotals {
    /// Player aggregates, stable-sorted descending by total points. Ties keep
    /// first-appearance order.
    pub players: Vec<PlayerAggregate>,
    /// Team standings in order of first appearance.
    pub standings: Vec<TeamStanding>,
    pub total_matches: u32,
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Vec + index-map accumulator so first-appearance order survives into the
/// final stable sort.
struct Accumulator {
    players: Vec<PlayerAggregate>,
    player_index: HashMap<String, usize>,
    standings: Vec<TeamStanding>,
    standing_index: HashMap<String, usize>,
    total_matches: u32,
}

impl Accumulator {
    fn new() -> Self {
        Accumulator {
            players: Vec::new(),
            player_index: HashMap::new(),
            standings: Vec::new(),
            standing_index: HashMap::new(),
            total_matches: 0,
        }
    }

    fn fold_match(&mut self, m: &Match) {
        self.total_matches += 1;

        for score in &m.teams {
            let idx = match self.standing_index.get(&score.team) {
                Some(&idx) => idx,
                None => {
                    self.standings.push(TeamStanding::new(&score.team));
                    let idx = self.standings.len() - 1;
                    self.standing_index.insert(score.team.clone(), idx);
                    idx
                }
            };
            self.standings[idx].fold(score.total);
        }

        for record in &m.players {
            let idx = match self.player_index.get(&record.name) {
                Some(&idx) => idx,
                None => {
                    self.players
                        .push(PlayerAggregate::new(&record.name, &record.team));
                    let idx = self.players.len() - 1;
                    self.player_index.insert(record.name.clone(), idx);
                    idx
                }
            };
            self.players[idx].fold(record);
        }
    }

    fn finish(mut self) -> SeasonTotals {
        // Stable sort: equal totals keep first-appearance order.
        self.players.sort_by(|a, b| {
            b.total_points
                .partial_cmp(&a.total_points)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        SeasonTotals {
            players: self.players,
            standings: self.standings,
            total_matches: self.total_matches,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Fold all weeks into season totals.
pub fn aggregate(weeks: &[MatchWeek]) -> SeasonTotals {
    let mut acc = Accumulator::new();
    for week in weeks {
        for m in &week.matches {
            acc.fold_match(m);
        }
        debug!(
            "aggregated week '{}' ({} matches)",
            week.name,
            week.matches.len()
        );
    }
    acc.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

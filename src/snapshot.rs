// Pipeline entry point: runs normalize -> aggregate -> profile -> valuation
// once over the loaded documents and returns the full derived model as an
// immutable snapshot.
//
// Downstream consumers (the rendering layer) treat the snapshot as read-only
// until the next full data refresh; nothing here re-runs on presentation
// events.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::info;

use crate::aggregate::{self, PlayerAggregate, TeamStanding};
use crate::normalize::{self, MatchWeek, RawDocuments};
use crate::profile::{self, PlayerProfile, TeamComposition};
use crate::query::PlayerQuery;
use crate::valuation::{self, AuctionAnalysis};

/// Season headline numbers for the summary cards.
#[derive(Debug, Clone)]
pub struct SeasonHeadline {
    pub total_matches: u32,
    pub total_players: usize,
    pub highest_team_score: f64,
}

/// The complete derived data model.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Normalized weeks in source order, for week-over-week views.
    pub weeks: Vec<MatchWeek>,
    /// Player aggregates, sorted descending by total points.
    pub players: Vec<PlayerAggregate>,
    /// Team standings, sorted descending by total points for display.
    pub standings: Vec<TeamStanding>,
    /// Joined profiles in the same order as `players`.
    pub profiles: Vec<PlayerProfile>,
    pub compositions: Vec<TeamComposition>,
    pub auction: AuctionAnalysis,
    /// Player name -> IPL team.
    pub ipl_teams: HashMap<String, String>,
    /// Scoring rules, passed through unchanged for display.
    pub scoring_rules: Map<String, Value>,
    pub headline: SeasonHeadline,
}

impl Snapshot {
    /// Build the full derived model from the three loaded documents.
    pub fn build(docs: &RawDocuments) -> Snapshot {
        let weeks = normalize::normalize_performance(&docs.performance);
        let roster = normalize::normalize_roster(&docs.roster);
        info!(
            "normalized {} weeks, {} roster teams",
            weeks.len(),
            roster.teams.len()
        );

        let totals = aggregate::aggregate(&weeks);
        info!(
            "aggregated {} matches into {} players, {} teams",
            totals.total_matches,
            totals.players.len(),
            totals.standings.len()
        );

        let profiles = profile::build_profiles(&totals, &roster);
        let compositions = profile::team_compositions(&roster);
        let ipl_teams = profile::ipl_team_lookup(&roster);
        let auction = valuation::analyze_auction(&profiles);

        let mut standings = totals.standings;
        standings.sort_by(|a, b| {
            b.total_points
                .partial_cmp(&a.total_points)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let headline = SeasonHeadline {
            total_matches: totals.total_matches,
            total_players: totals.players.len(),
            highest_team_score: standings
                .iter()
                .map(|s| s.highest_score)
                .fold(0.0, f64::max),
        };

        Snapshot {
            weeks,
            players: totals.players,
            standings,
            profiles,
            compositions,
            auction,
            ipl_teams,
            scoring_rules: docs.scoring_rules.clone(),
            headline,
        }
    }

    /// A fresh query view over this snapshot's profiles.
    pub fn query(&self) -> PlayerQuery {
        PlayerQuery::new(self.profiles.clone(), self.ipl_teams.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_document;
    use serde_json::json;

    fn docs() -> RawDocuments {
        let performance = parse_document(
            "performance",
            &json!({
                "Week 1": {
                    "A vs B": {
                        "Alpha": {
                            "Players": [
                                {"Player": "X", "Score": 50, "Balls": 30, "4s": 4,
                                 "6s": 2, "Wickets": 0, "0s": 10, "Points": 80},
                                {"Player": "Y", "Score": 20, "Balls": 15, "Points": 35}
                            ],
                            "Team Total": 115
                        },
                        "Beta": {
                            "Players": [
                                {"Player": "Z", "Score": 60, "Balls": 40, "Points": 90}
                            ],
                            "Team Total": 90
                        }
                    }
                },
                "Week 2": {
                    "A vs C": {
                        "Alpha": {
                            "Players": [
                                {"Player": "X", "Score": 10, "Balls": 12, "Points": 25}
                            ],
                            "Team Total": 25
                        }
                    }
                }
            })
            .to_string(),
        )
        .unwrap();

        let roster = parse_document(
            "roster",
            &json!({
                "Alpha": [
                    {"Player": "X", "Type": "BAT", "Price": 10.0, "Status": "Sold",
                     "Overseas": false, "Capped": "Capped", "IPL Team": "MI"},
                    {"Player": "Y", "Type": "AR", "Price": 4.0, "Status": "Sold",
                     "Overseas": true, "Capped": "Uncapped", "IPL Team": "CSK"}
                ],
                "Beta": [
                    {"Player": "Z", "Type": "BOWL", "Price": 8.0, "Status": "Sold",
                     "Overseas": false, "Capped": "Capped", "IPL Team": "RCB"}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let scoring_rules = parse_document(
            "scoring rules",
            &json!({"Batting": {"Run": 1, "Four": 1, "Six": 2}}).to_string(),
        )
        .unwrap();

        RawDocuments {
            performance,
            roster,
            scoring_rules,
        }
    }

    #[test]
    fn snapshot_wires_all_stages_together() {
        let snapshot = Snapshot::build(&docs());

        assert_eq!(snapshot.weeks.len(), 2);
        assert_eq!(snapshot.headline.total_matches, 2);
        assert_eq!(snapshot.headline.total_players, 3);
        assert!((snapshot.headline.highest_team_score - 115.0).abs() < f64::EPSILON);

        // X: 80 + 25 = 105 points over 2 matches; sorted first.
        assert_eq!(snapshot.players[0].name, "X");
        assert_eq!(snapshot.players[0].matches, 2);
        assert!((snapshot.players[0].total_points - 105.0).abs() < f64::EPSILON);

        // Standings sorted descending: Alpha 140, Beta 90.
        assert_eq!(snapshot.standings[0].team, "Alpha");
        assert!((snapshot.standings[0].total_points - 140.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.standings[1].team, "Beta");

        // Profiles align with player order and carry the join.
        assert_eq!(snapshot.profiles[0].aggregate.name, "X");
        assert_eq!(snapshot.profiles[0].ipl_team, "MI");

        // Compositions cover both roster teams.
        assert_eq!(snapshot.compositions.len(), 2);

        // Valuation: ratios are finite and sorted descending.
        assert!(snapshot
            .auction
            .entries
            .windows(2)
            .all(|w| w[0].ratio >= w[1].ratio));

        // Scoring rules pass through untouched.
        assert!(snapshot.scoring_rules.contains_key("Batting"));
    }

    #[test]
    fn query_view_reflects_snapshot_profiles() {
        let snapshot = Snapshot::build(&docs());
        let mut query = snapshot.query();
        query.set_ipl_team(Some("RCB"));
        let view = query.apply_filters();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].aggregate.name, "Z");
    }
}

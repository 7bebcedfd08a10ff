// Profile join: merges aggregated performance with the static auction roster,
// plus the roster-only derivations (team compositions, player -> IPL-team
// lookup).
//
// Runs after aggregation completes in full, because the derived categories
// need final cumulative totals, not per-match partials.

use std::collections::HashMap;

use crate::aggregate::{PlayerAggregate, SeasonTotals};
use crate::normalize::{Roster, RosterEntry};
use crate::valuation::{price_category, value_for_money, PriceTier, ValueForMoney};
use tracing::warn;

// ---------------------------------------------------------------------------
// Sentinels for players with no roster entry
// ---------------------------------------------------------------------------

// Downstream consumers must never need to null-check these fields, so a
// missing roster entry substitutes explicit sentinels instead of options.
const NO_TYPE: &str = "N/A";
const NO_IPL_TEAM: &str = "N/A";
const NO_STATUS: &str = "Unsold";
const NO_CAP_STATUS: &str = "Uncapped";

// ---------------------------------------------------------------------------
// PlayerProfile
// ---------------------------------------------------------------------------

/// A player's aggregate joined with auction metadata. Built once after
/// aggregation; read-only afterward.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub aggregate: PlayerAggregate,
    /// Roster type code ("BAT", "BOWL", "AR", "WK") or "N/A".
    pub player_type: String,
    pub ipl_team: String,
    pub price: f64,
    pub status: String,
    pub overseas: bool,
    pub capped: String,
    pub value_for_money: ValueForMoney,
    pub price_tier: PriceTier,
}

/// Join every aggregate with its roster entry by exact player name.
///
/// The lookup key is trimmed on the roster side only; a performance-side name
/// with stray surrounding whitespace will not match and takes the sentinel
/// path. Kept source behavior.
pub fn build_profiles(totals: &SeasonTotals, roster: &Roster) -> Vec<PlayerProfile> {
    let by_name = roster_lookup(roster);

    totals
        .players
        .iter()
        .map(|aggregate| match by_name.get(aggregate.name.as_str()) {
            Some(entry) => join_profile(aggregate, entry),
            None => {
                warn!(
                    "no roster entry for player '{}'; using sentinel metadata",
                    aggregate.name
                );
                sentinel_profile(aggregate)
            }
        })
        .collect()
}

fn roster_lookup(roster: &Roster) -> HashMap<&str, &RosterEntry> {
    let mut by_name: HashMap<&str, &RosterEntry> = HashMap::new();
    for team in &roster.teams {
        for entry in &team.entries {
            if by_name.insert(entry.name.as_str(), entry).is_some() {
                warn!("duplicate roster entry for '{}', using latest", entry.name);
            }
        }
    }
    by_name
}

fn join_profile(aggregate: &PlayerAggregate, entry: &RosterEntry) -> PlayerProfile {
    PlayerProfile {
        aggregate: aggregate.clone(),
        player_type: entry.player_type.clone(),
        ipl_team: entry.ipl_team.clone(),
        price: entry.price,
        status: entry.status.clone(),
        overseas: entry.overseas,
        capped: entry.capped.clone(),
        value_for_money: value_for_money(aggregate.total_points, entry.price),
        price_tier: price_category(entry.price),
    }
}

fn sentinel_profile(aggregate: &PlayerAggregate) -> PlayerProfile {
    PlayerProfile {
        aggregate: aggregate.clone(),
        player_type: NO_TYPE.into(),
        ipl_team: NO_IPL_TEAM.into(),
        price: 0.0,
        status: NO_STATUS.into(),
        overseas: false,
        capped: NO_CAP_STATUS.into(),
        value_for_money: value_for_money(aggregate.total_points, 0.0),
        price_tier: price_category(0.0),
    }
}

// ---------------------------------------------------------------------------
// Team composition
// ---------------------------------------------------------------------------

/// Composition summary for one auction roster, computed once from the static
/// roster list and independent of performance data.
#[derive(Debug, Clone)]
pub struct TeamComposition {
    pub team: String,
    pub players: u32,
    pub total_investment: f64,
    pub average_price: f64,
    pub batsmen: u32,
    pub bowlers: u32,
    pub all_rounders: u32,
    pub wicket_keepers: u32,
    pub overseas: u32,
    pub uncapped: u32,
}

/// Summarize every roster team, in document order.
pub fn team_compositions(roster: &Roster) -> Vec<TeamComposition> {
    roster
        .teams
        .iter()
        .map(|team| {
            let mut comp = TeamComposition {
                team: team.name.clone(),
                players: 0,
                total_investment: 0.0,
                average_price: 0.0,
                batsmen: 0,
                bowlers: 0,
                all_rounders: 0,
                wicket_keepers: 0,
                overseas: 0,
                uncapped: 0,
            };
            for entry in &team.entries {
                comp.players += 1;
                comp.total_investment += entry.price;
                match entry.player_type.as_str() {
                    "BAT" => comp.batsmen += 1,
                    "BOWL" => comp.bowlers += 1,
                    "AR" => comp.all_rounders += 1,
                    "WK" => comp.wicket_keepers += 1,
                    _ => {}
                }
                if entry.overseas {
                    comp.overseas += 1;
                }
                if entry.capped == NO_CAP_STATUS {
                    comp.uncapped += 1;
                }
            }
            if comp.players > 0 {
                comp.average_price = comp.total_investment / comp.players as f64;
            }
            comp
        })
        .collect()
}

/// Player name -> IPL team, for the query engine's IPL-team filter.
pub fn ipl_team_lookup(roster: &Roster) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    for team in &roster.teams {
        for entry in &team.entries {
            lookup.insert(entry.name.clone(), entry.ipl_team.clone());
        }
    }
    lookup
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

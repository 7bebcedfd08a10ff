// Input normalization for the three source documents.
//
// The performance document nests week -> match -> team -> players. Two team
// record shapes occur in the wild: an object holding a "Players" array with a
// sibling "Team Total", or a bare player array with the total kept in the
// match-level "Team Totals" pseudo-entry. Both are resolved here into one
// canonical form so the ambiguity never travels downstream.

use crate::config::DataPaths;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Reserved match-level key carrying the team -> total map. Never a team name.
const TEAM_TOTALS_KEY: &str = "Team Totals";
/// Key holding the player array in the nested team-record shape.
const PLAYERS_KEY: &str = "Players";
/// Sibling of `PLAYERS_KEY` holding the team's match total.
const TEAM_TOTAL_KEY: &str = "Team Total";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {document} document at {path}: {source}")]
    Io {
        document: &'static str,
        path: String,
        source: std::io::Error,
    },

    #[error("invalid format in {document} document: {reason}")]
    InvalidFormat {
        document: &'static str,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Canonical model
// ---------------------------------------------------------------------------

/// A named grouping of matches. Order of appearance in the source document is
/// identity-bearing (week numbers are derived from name substrings by the
/// rendering layer), so weeks are kept in a Vec and never re-sorted.
#[derive(Debug, Clone)]
pub struct MatchWeek {
    pub name: String,
    pub matches: Vec<Match>,
}

/// One match, fully resolved. Immutable after normalization.
#[derive(Debug, Clone)]
pub struct Match {
    pub name: String,
    /// Participating fantasy teams with their match totals, in order of
    /// appearance. Excludes the "Team Totals" pseudo-entry.
    pub teams: Vec<TeamScore>,
    /// Per-player performance records across all teams in this match.
    pub players: Vec<PlayerMatchRecord>,
}

#[derive(Debug, Clone)]
pub struct TeamScore {
    pub team: String,
    pub total: f64,
}

/// One player's performance in one match. Counting fields follow the
/// safe-number rule: absent, null, or non-numeric source values become 0,
/// applied independently per field.
#[derive(Debug, Clone)]
pub struct PlayerMatchRecord {
    pub name: String,
    /// Fantasy team this record was filed under.
    pub team: String,
    pub runs: f64,
    pub balls: f64,
    pub fours: f64,
    pub sixes: f64,
    pub wickets: f64,
    pub dots: f64,
    /// Catches and run-outs combined.
    pub catches: f64,
    /// Captain/vice-captain multiplier; 1 when absent.
    pub multiplier: f64,
    pub points: f64,
    /// runs / balls * 100; `None` when no balls were faced. String formatting
    /// of the "-" sentinel is the rendering layer's job.
    pub strike_rate: Option<f64>,
    /// Bowling economy from the source rate field; `None` when absent.
    pub economy: Option<f64>,
}

/// Auction roster entry, name trimmed of surrounding whitespace.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub name: String,
    /// Type code as it appears in the roster ("BAT", "BOWL", "AR", "WK").
    pub player_type: String,
    pub price: f64,
    pub status: String,
    pub overseas: bool,
    pub capped: String,
    pub ipl_team: String,
}

#[derive(Debug, Clone)]
pub struct RosterTeam {
    pub name: String,
    pub entries: Vec<RosterEntry>,
}

#[derive(Debug, Clone)]
pub struct Roster {
    pub teams: Vec<RosterTeam>,
}

/// The three documents, parsed and validated down to their top-level maps.
#[derive(Debug, Clone)]
pub struct RawDocuments {
    pub performance: Map<String, Value>,
    pub roster: Map<String, Value>,
    pub scoring_rules: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Document loading
// ---------------------------------------------------------------------------

/// Load all three documents. Fail-fast: any one failing aborts the pipeline
/// with an error naming the offending document.
pub fn load_documents(paths: &DataPaths) -> Result<RawDocuments, DocumentError> {
    let performance_text = read_document("performance", Path::new(&paths.performance))?;
    let roster_text = read_document("roster", Path::new(&paths.roster))?;
    let scoring_text = read_document("scoring rules", Path::new(&paths.scoring_rules))?;

    // The performance export is known to contain bare NaN literals, which are
    // not valid JSON; substitute them before structural parsing.
    let performance = parse_document("performance", &strip_nan_literals(&performance_text))?;
    let roster = parse_document("roster", &roster_text)?;
    let scoring_rules = parse_document("scoring rules", &scoring_text)?;

    Ok(RawDocuments {
        performance,
        roster,
        scoring_rules,
    })
}

fn read_document(document: &'static str, path: &Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|e| DocumentError::Io {
        document,
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse a document and require a keyed mapping at the top level.
pub fn parse_document(
    document: &'static str,
    text: &str,
) -> Result<Map<String, Value>, DocumentError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DocumentError::InvalidFormat {
            document,
            reason: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DocumentError::InvalidFormat {
            document,
            reason: format!(
                "top-level value must be a keyed mapping, found {}",
                json_type_name(&other)
            ),
        }),
    }
}

/// Replace bare `NaN` literals (outside JSON strings) with `null`.
///
/// The substitution must happen on the raw text because `NaN` is not valid in
/// strict JSON and would fail structural parsing. Occurrences inside string
/// values are left intact.
pub fn strip_nan_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let Some(c) = rest.chars().next() else { break };

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += c.len_utf8();
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }

        if rest.starts_with("NaN") {
            let boundary = rest[3..]
                .chars()
                .next()
                .map_or(true, |n| !n.is_ascii_alphanumeric() && n != '_');
            if boundary {
                out.push_str("null");
                i += 3;
                continue;
            }
        }

        out.push(c);
        i += c.len_utf8();
    }

    out
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a keyed mapping",
    }
}

// ---------------------------------------------------------------------------
// Safe-number coercion
// ---------------------------------------------------------------------------

/// Coerce a field expected to be numeric: absent, null, or non-numeric
/// values become 0. Applied per field, never per record.
fn safe_number(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn optional_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn string_field(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

// ---------------------------------------------------------------------------
// Performance normalization
// ---------------------------------------------------------------------------

/// Normalize the performance document into the canonical week list.
/// Malformed week/match/team/player sub-records are skipped with a warning;
/// this stage never fails once the top-level shape has been validated.
pub fn normalize_performance(doc: &Map<String, Value>) -> Vec<MatchWeek> {
    let mut weeks = Vec::new();
    for (week_name, week_value) in doc {
        let Some(match_map) = week_value.as_object() else {
            warn!("skipping week '{}': not a keyed mapping", week_name);
            continue;
        };
        let mut matches = Vec::new();
        for (match_name, match_value) in match_map {
            match match_value.as_object() {
                Some(obj) => matches.push(normalize_match(match_name, obj)),
                None => warn!(
                    "skipping match '{}' in week '{}': not a keyed mapping",
                    match_name, week_name
                ),
            }
        }
        weeks.push(MatchWeek {
            name: week_name.clone(),
            matches,
        });
    }
    weeks
}

/// The two accepted team-record shapes, resolved once at parse time.
enum TeamEntry<'a> {
    /// `{ "Players": [...], "Team Total": n }`: total from the sibling key.
    Nested {
        players: &'a [Value],
        total: Option<f64>,
    },
    /// Bare player array: total from the match-level pseudo-entry.
    Direct { players: &'a [Value] },
}

fn resolve_team_entry(value: &Value) -> Option<TeamEntry<'_>> {
    if let Some(players) = value.as_array() {
        return Some(TeamEntry::Direct { players });
    }
    let obj = value.as_object()?;
    let players = obj.get(PLAYERS_KEY)?.as_array()?;
    let total = obj.get(TEAM_TOTAL_KEY).map(|v| {
        // Present-but-invalid totals take the safe-number path, not the
        // pseudo-entry fallback.
        safe_number(Some(v))
    });
    Some(TeamEntry::Nested { players, total })
}

fn normalize_match(name: &str, obj: &Map<String, Value>) -> Match {
    let pseudo_totals = obj.get(TEAM_TOTALS_KEY).and_then(Value::as_object);

    let mut teams = Vec::new();
    let mut players = Vec::new();

    for (team_name, entry) in obj {
        if team_name == TEAM_TOTALS_KEY {
            continue;
        }
        let Some(resolved) = resolve_team_entry(entry) else {
            warn!(
                "skipping team '{}' in match '{}': unrecognized record shape",
                team_name, name
            );
            continue;
        };

        let (raw_players, total) = match resolved {
            TeamEntry::Nested { players, total } => {
                let total = total.unwrap_or_else(|| {
                    safe_number(pseudo_totals.and_then(|m| m.get(team_name)))
                });
                (players, total)
            }
            TeamEntry::Direct { players } => {
                let total = safe_number(pseudo_totals.and_then(|m| m.get(team_name)));
                (players, total)
            }
        };

        teams.push(TeamScore {
            team: team_name.clone(),
            total,
        });

        for raw in raw_players {
            match normalize_player(raw, team_name) {
                Some(record) => players.push(record),
                None => warn!(
                    "skipping player record without a name in match '{}' (team '{}')",
                    name, team_name
                ),
            }
        }
    }

    Match {
        name: name.to_string(),
        teams,
        players,
    }
}

fn normalize_player(raw: &Value, team: &str) -> Option<PlayerMatchRecord> {
    let obj = raw.as_object()?;
    let name = obj.get("Player").and_then(Value::as_str)?.to_string();

    let runs = safe_number(obj.get("Score"));
    let balls = safe_number(obj.get("Balls"));
    let strike_rate = if balls > 0.0 {
        Some(runs / balls * 100.0)
    } else {
        None
    };

    Some(PlayerMatchRecord {
        name,
        team: team.to_string(),
        runs,
        balls,
        fours: safe_number(obj.get("4s")),
        sixes: safe_number(obj.get("6s")),
        wickets: safe_number(obj.get("Wickets")),
        dots: safe_number(obj.get("0s")),
        catches: safe_number(obj.get("Catches")) + safe_number(obj.get("Run Outs")),
        multiplier: optional_number(obj.get("C/VC")).unwrap_or(1.0),
        points: safe_number(obj.get("Points")),
        strike_rate,
        economy: optional_number(obj.get("Economy")),
    })
}

// ---------------------------------------------------------------------------
// Roster normalization
// ---------------------------------------------------------------------------

/// Normalize the roster document. Roster-side player names are trimmed of
/// surrounding whitespace; performance-side names are used verbatim.
pub fn normalize_roster(doc: &Map<String, Value>) -> Roster {
    let mut teams = Vec::new();
    for (team_name, value) in doc {
        let Some(list) = value.as_array() else {
            warn!(
                "skipping roster team '{}': expected a list of entries",
                team_name
            );
            continue;
        };
        let mut entries = Vec::new();
        for raw in list {
            match normalize_roster_entry(raw) {
                Some(entry) => entries.push(entry),
                None => warn!(
                    "skipping roster entry without a player name in team '{}'",
                    team_name
                ),
            }
        }
        teams.push(RosterTeam {
            name: team_name.clone(),
            entries,
        });
    }
    Roster { teams }
}

fn normalize_roster_entry(raw: &Value) -> Option<RosterEntry> {
    let obj = raw.as_object()?;
    let name = obj.get("Player").and_then(Value::as_str)?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(RosterEntry {
        name,
        player_type: string_field(obj, "Type", "N/A"),
        price: safe_number(obj.get("Price")),
        status: string_field(obj, "Status", "Unsold"),
        overseas: obj.get("Overseas").and_then(Value::as_bool).unwrap_or(false),
        capped: string_field(obj, "Capped", "Uncapped"),
        ipl_team: string_field(obj, "IPL Team", "N/A"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

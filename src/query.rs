// Query engine over the joined player profiles: conjunctive filters, stable
// column sorting with direction toggling, and the page-size cap.
//
// Filtering only selects and reorders; the underlying profile collection is
// never mutated.

use std::collections::HashMap;

use crate::profile::PlayerProfile;

/// Rows shown per page unless the show-all flag is set.
pub const PAGE_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// Position mapping
// ---------------------------------------------------------------------------

/// Map a roster type code to its display position. Unrecognized codes pass
/// through unchanged.
pub fn position_label(type_code: &str) -> &str {
    match type_code {
        "BAT" => "Batsman",
        "BOWL" => "Bowler",
        "AR" => "All-rounder",
        "WK" => "Wicket-keeper",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sortable columns of the player table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Team,
    Matches,
    Runs,
    Wickets,
    TotalPoints,
    AveragePoints,
    Price,
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The current filter configuration. Every set field is applied as a
/// conjunction; clearing a field removes its constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Case-insensitive substring match against the player name.
    pub search: Option<String>,
    /// Substring match against the fantasy team name.
    pub fantasy_team: Option<String>,
    /// Exact match against the player's IPL team.
    pub ipl_team: Option<String>,
    /// Exact match against the display position (see `position_label`).
    pub position: Option<String>,
    pub show_all: bool,
    sort: Option<(SortColumn, SortDirection)>,
}

// ---------------------------------------------------------------------------
// PlayerQuery
// ---------------------------------------------------------------------------

/// A filterable view over the full profile list. Owns a player -> IPL-team
/// lookup built from the roster; the profiles themselves stay untouched.
#[derive(Debug, Clone)]
pub struct PlayerQuery {
    profiles: Vec<PlayerProfile>,
    ipl_lookup: HashMap<String, String>,
    pub filter: FilterState,
}

impl PlayerQuery {
    pub fn new(profiles: Vec<PlayerProfile>, ipl_lookup: HashMap<String, String>) -> Self {
        PlayerQuery {
            profiles,
            ipl_lookup,
            filter: FilterState::default(),
        }
    }

    /// The full, unfiltered profile list.
    pub fn all(&self) -> &[PlayerProfile] {
        &self.profiles
    }

    pub fn set_search(&mut self, search: Option<&str>) {
        self.filter.search = normalize_filter_value(search);
    }

    pub fn set_fantasy_team(&mut self, team: Option<&str>) {
        self.filter.fantasy_team = normalize_filter_value(team);
    }

    pub fn set_ipl_team(&mut self, team: Option<&str>) {
        self.filter.ipl_team = normalize_filter_value(team);
    }

    pub fn set_position(&mut self, position: Option<&str>) {
        self.filter.position = normalize_filter_value(position);
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.filter.show_all = show_all;
    }

    /// Sort by a column. Repeating the current column toggles the direction;
    /// switching to a different column starts over at descending.
    pub fn sort(&mut self, column: SortColumn) {
        self.filter.sort = Some(match self.filter.sort {
            Some((current, direction)) if current == column => (column, direction.toggled()),
            _ => (column, SortDirection::Descending),
        });
    }

    /// Recompute the filtered view from the full player list. Idempotent:
    /// unchanged filter state always yields the identical ordered result.
    pub fn apply_filters(&self) -> Vec<&PlayerProfile> {
        let mut view: Vec<&PlayerProfile> = self
            .profiles
            .iter()
            .filter(|p| self.matches(p))
            .collect();

        if let Some((column, direction)) = self.filter.sort {
            sort_view(&mut view, column, direction);
        }

        if !self.filter.show_all {
            view.truncate(PAGE_SIZE);
        }
        view
    }

    fn matches(&self, profile: &PlayerProfile) -> bool {
        if let Some(search) = &self.filter.search {
            if !profile
                .aggregate
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        if let Some(team) = &self.filter.fantasy_team {
            if !profile.aggregate.team.contains(team.as_str()) {
                return false;
            }
        }

        if let Some(ipl_team) = &self.filter.ipl_team {
            match self.ipl_lookup.get(&profile.aggregate.name) {
                Some(found) if found == ipl_team => {}
                _ => return false,
            }
        }

        if let Some(position) = &self.filter.position {
            if position_label(&profile.player_type) != position {
                return false;
            }
        }

        true
    }
}

fn normalize_filter_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn sort_view(view: &mut [&PlayerProfile], column: SortColumn, direction: SortDirection) {
    // Stable sort so equal keys keep their previous relative order.
    view.sort_by(|a, b| {
        let ordering = match column {
            SortColumn::Name => a.aggregate.name.cmp(&b.aggregate.name),
            SortColumn::Team => a.aggregate.team.cmp(&b.aggregate.team),
            SortColumn::Matches => a.aggregate.matches.cmp(&b.aggregate.matches),
            SortColumn::Runs => numeric(a.aggregate.runs, b.aggregate.runs),
            SortColumn::Wickets => numeric(a.aggregate.wickets, b.aggregate.wickets),
            SortColumn::TotalPoints => numeric(a.aggregate.total_points, b.aggregate.total_points),
            SortColumn::AveragePoints => {
                numeric(a.aggregate.average_points, b.aggregate.average_points)
            }
            SortColumn::Price => numeric(a.price, b.price),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn numeric(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Auction valuation: value-for-money classification, price tiers, and the
// points-per-unit-price derived lists.
//
// All functions here are pure: categories are functions of (points, price)
// with fixed thresholds, and the derived lists are plain filters over the
// full valuation collection.

use crate::profile::PlayerProfile;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Floor applied to price before division so zero-price (usually unsold)
/// entries keep a very large but finite ratio instead of dividing by zero.
pub const PRICE_FLOOR: f64 = 0.1;

/// Number of entries in the "bargains" list.
pub const BARGAIN_COUNT: usize = 5;

/// Expensive pick: price above this with a ratio below `EXPENSIVE_MAX_RATIO`.
pub const EXPENSIVE_MIN_PRICE: f64 = 10.0;
pub const EXPENSIVE_MAX_RATIO: f64 = 45.0;

/// High risk-reward: price at or above this with a ratio at or above
/// `RISK_REWARD_MIN_RATIO`.
pub const RISK_REWARD_MIN_PRICE: f64 = 15.0;
pub const RISK_REWARD_MIN_RATIO: f64 = 45.0;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Categorical rating of points earned per unit of auction price paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForMoney {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ValueForMoney {
    /// Display wording; an external contract consumed by the rendering layer.
    pub fn label(&self) -> &'static str {
        match self {
            ValueForMoney::Excellent => "Excellent",
            ValueForMoney::Good => "Good",
            ValueForMoney::Fair => "Fair",
            ValueForMoney::Poor => "Poor",
        }
    }
}

/// Price-tier bucket derived from purchase price alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Premium,
    Expensive,
    Medium,
    Budget,
}

impl PriceTier {
    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Premium => "Premium",
            PriceTier::Expensive => "Expensive",
            PriceTier::Medium => "Medium",
            PriceTier::Budget => "Budget",
        }
    }
}

/// Classify value for money from cumulative points and purchase price.
///
/// A missing or zero price cannot produce a ratio; such players are
/// "Excellent" when they scored at all (free points) and "Poor" otherwise.
pub fn value_for_money(points: f64, price: f64) -> ValueForMoney {
    if price <= 0.0 {
        return if points > 0.0 {
            ValueForMoney::Excellent
        } else {
            ValueForMoney::Poor
        };
    }
    let ratio = points / price;
    if ratio >= 150.0 {
        ValueForMoney::Excellent
    } else if ratio >= 100.0 {
        ValueForMoney::Good
    } else if ratio >= 50.0 {
        ValueForMoney::Fair
    } else {
        ValueForMoney::Poor
    }
}

/// Bucket a purchase price into its tier.
pub fn price_category(price: f64) -> PriceTier {
    if price >= 15.0 {
        PriceTier::Premium
    } else if price >= 8.0 {
        PriceTier::Expensive
    } else if price >= 4.0 {
        PriceTier::Medium
    } else {
        PriceTier::Budget
    }
}

/// points / max(price, PRICE_FLOOR).
pub fn points_per_unit_price(points: f64, price: f64) -> f64 {
    points / price.max(PRICE_FLOOR)
}

// ---------------------------------------------------------------------------
// Derived lists
// ---------------------------------------------------------------------------

/// One player's auction valuation: profile key fields plus the ratio.
#[derive(Debug, Clone)]
pub struct ValuationEntry {
    pub name: String,
    pub fantasy_team: String,
    pub price: f64,
    pub total_points: f64,
    /// points_per_unit_price(total_points, price).
    pub ratio: f64,
    pub value_for_money: ValueForMoney,
    pub price_tier: PriceTier,
}

/// The full valuation collection with its derived sub-lists. The filters are
/// independent and non-exclusive.
#[derive(Debug, Clone)]
pub struct AuctionAnalysis {
    /// Every player, sorted descending by ratio (stable).
    pub entries: Vec<ValuationEntry>,
    /// Top `BARGAIN_COUNT` by ratio.
    pub bargains: Vec<ValuationEntry>,
    /// price > EXPENSIVE_MIN_PRICE and ratio < EXPENSIVE_MAX_RATIO.
    pub expensive_picks: Vec<ValuationEntry>,
    /// price >= RISK_REWARD_MIN_PRICE and ratio >= RISK_REWARD_MIN_RATIO.
    pub high_risk_reward: Vec<ValuationEntry>,
}

/// Build the auction analysis from the joined profiles.
pub fn analyze_auction(profiles: &[PlayerProfile]) -> AuctionAnalysis {
    let mut entries: Vec<ValuationEntry> = profiles
        .iter()
        .map(|p| ValuationEntry {
            name: p.aggregate.name.clone(),
            fantasy_team: p.aggregate.team.clone(),
            price: p.price,
            total_points: p.aggregate.total_points,
            ratio: points_per_unit_price(p.aggregate.total_points, p.price),
            value_for_money: p.value_for_money,
            price_tier: p.price_tier,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.ratio
            .partial_cmp(&a.ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let bargains = entries.iter().take(BARGAIN_COUNT).cloned().collect();

    let expensive_picks = entries
        .iter()
        .filter(|e| e.price > EXPENSIVE_MIN_PRICE && e.ratio < EXPENSIVE_MAX_RATIO)
        .cloned()
        .collect();

    let high_risk_reward = entries
        .iter()
        .filter(|e| e.price >= RISK_REWARD_MIN_PRICE && e.ratio >= RISK_REWARD_MIN_RATIO)
        .cloned()
        .collect();

    AuctionAnalysis {
        entries,
        bargains,
        expensive_picks,
        high_risk_reward,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::PlayerAggregate;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn profile(name: &str, points: f64, price: f64) -> PlayerProfile {
        let aggregate = PlayerAggregate {
            name: name.into(),
            team: "Alpha".into(),
            runs: 0.0,
            balls: 0.0,
            fours: 0.0,
            sixes: 0.0,
            wickets: 0.0,
            dots: 0.0,
            catches: 0.0,
            total_points: points,
            matches: 1,
            average_points: points,
        };
        PlayerProfile {
            value_for_money: value_for_money(points, price),
            price_tier: price_category(price),
            aggregate,
            player_type: "BAT".into(),
            ipl_team: "MI".into(),
            price,
            status: "Sold".into(),
            overseas: false,
            capped: "Capped".into(),
        }
    }

    // -- value_for_money --

    #[test]
    fn zero_price_with_points_is_excellent() {
        assert_eq!(value_for_money(120.0, 0.0), ValueForMoney::Excellent);
    }

    #[test]
    fn zero_price_without_points_is_poor() {
        assert_eq!(value_for_money(0.0, 0.0), ValueForMoney::Poor);
    }

    #[test]
    fn ratio_thresholds() {
        // price 1.0 makes the ratio equal the points value.
        assert_eq!(value_for_money(150.0, 1.0), ValueForMoney::Excellent);
        assert_eq!(value_for_money(149.9, 1.0), ValueForMoney::Good);
        assert_eq!(value_for_money(100.0, 1.0), ValueForMoney::Good);
        assert_eq!(value_for_money(99.9, 1.0), ValueForMoney::Fair);
        assert_eq!(value_for_money(50.0, 1.0), ValueForMoney::Fair);
        assert_eq!(value_for_money(49.9, 1.0), ValueForMoney::Poor);
    }

    #[test]
    fn labels_are_the_external_wording() {
        assert_eq!(ValueForMoney::Excellent.label(), "Excellent");
        assert_eq!(PriceTier::Budget.label(), "Budget");
    }

    // -- price_category boundaries --

    #[test]
    fn price_tier_boundaries() {
        assert_eq!(price_category(15.0), PriceTier::Premium);
        assert_eq!(price_category(14.99), PriceTier::Expensive);
        assert_eq!(price_category(8.0), PriceTier::Expensive);
        assert_eq!(price_category(7.99), PriceTier::Medium);
        assert_eq!(price_category(4.0), PriceTier::Medium);
        assert_eq!(price_category(3.99), PriceTier::Budget);
        assert_eq!(price_category(0.0), PriceTier::Budget);
    }

    // -- points_per_unit_price --

    #[test]
    fn price_floor_prevents_division_by_zero() {
        // 120 / 0.1 = 1200
        assert!(approx_eq(points_per_unit_price(120.0, 0.0), 1200.0, 1e-9));
    }

    #[test]
    fn ratio_uses_real_price_above_floor() {
        assert!(approx_eq(points_per_unit_price(100.0, 8.0), 12.5, 1e-9));
    }

    #[test]
    fn floor_applies_below_threshold() {
        assert!(approx_eq(points_per_unit_price(10.0, 0.05), 100.0, 1e-9));
    }

    // -- derived lists --

    #[test]
    fn entries_sorted_descending_by_ratio() {
        let profiles = vec![
            profile("Cheap Star", 100.0, 1.0),  // ratio 100
            profile("Flop", 50.0, 20.0),        // ratio 2.5
            profile("Solid", 90.0, 6.0),        // ratio 15
        ];

        let analysis = analyze_auction(&profiles);
        let names: Vec<&str> = analysis.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cheap Star", "Solid", "Flop"]);
    }

    #[test]
    fn bargains_take_top_five() {
        let profiles: Vec<PlayerProfile> = (0..8)
            .map(|i| profile(&format!("P{i}"), 100.0 - i as f64 * 10.0, 1.0))
            .collect();

        let analysis = analyze_auction(&profiles);
        assert_eq!(analysis.bargains.len(), 5);
        assert_eq!(analysis.bargains[0].name, "P0");
        assert_eq!(analysis.bargains[4].name, "P4");
    }

    #[test]
    fn bargains_shorter_when_pool_is_small() {
        let profiles = vec![profile("Only", 50.0, 2.0)];
        let analysis = analyze_auction(&profiles);
        assert_eq!(analysis.bargains.len(), 1);
    }

    #[test]
    fn expensive_picks_filter() {
        let profiles = vec![
            // price 12, ratio 120/12 = 10 < 45 -> expensive pick
            profile("Dud", 120.0, 12.0),
            // price 12, ratio 600/12 = 50 >= 45 -> not an expensive pick
            profile("Earner", 600.0, 12.0),
            // price 10 is not > 10 -> excluded on price
            profile("Edge", 10.0, 10.0),
        ];

        let analysis = analyze_auction(&profiles);
        let names: Vec<&str> = analysis
            .expensive_picks
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Dud"]);
    }

    #[test]
    fn high_risk_reward_filter() {
        let profiles = vec![
            // price 15, ratio 675/15 = 45 -> qualifies on both boundaries
            profile("Boundary", 675.0, 15.0),
            // price 14.99 -> excluded on price
            profile("JustUnder", 675.0, 14.99),
            // ratio 44.9 -> excluded on ratio
            profile("LowRatio", 673.5, 15.0),
        ];

        let analysis = analyze_auction(&profiles);
        let names: Vec<&str> = analysis
            .high_risk_reward
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Boundary"]);
    }

    #[test]
    fn empty_profile_list() {
        let analysis = analyze_auction(&[]);
        assert!(analysis.entries.is_empty());
        assert!(analysis.bargains.is_empty());
        assert!(analysis.expensive_picks.is_empty());
        assert!(analysis.high_risk_reward.is_empty());
    }
}

// Season report entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (document paths)
// 3. Load the three source documents (fail-fast)
// 4. Build the derived snapshot
// 5. Print a plain-text season summary
//
// The summary printed here stands in for the real rendering layer, which
// consumes the same snapshot structures.

use crease_sheet::config;
use crease_sheet::normalize;
use crease_sheet::query::position_label;
use crease_sheet::snapshot::Snapshot;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("crease-sheet starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: performance={}, roster={}, scoring_rules={}",
        config.data.performance, config.data.roster, config.data.scoring_rules
    );

    // 3. Load documents (any one failing aborts the whole pipeline)
    let docs = normalize::load_documents(&config.data)
        .context("failed to load source documents")?;

    // 4. Build the snapshot
    let snapshot = Snapshot::build(&docs);
    info!(
        "Snapshot ready: {} matches, {} players, {} teams",
        snapshot.headline.total_matches,
        snapshot.headline.total_players,
        snapshot.standings.len()
    );

    // 5. Print the season summary
    print_summary(&snapshot);

    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    println!("== Season summary ==");
    println!(
        "{} matches, {} players, highest team score {:.0}",
        snapshot.headline.total_matches,
        snapshot.headline.total_players,
        snapshot.headline.highest_team_score
    );

    println!("\n== Standings ==");
    for standing in &snapshot.standings {
        println!(
            "{:<20} {:>3} matches  {:>8.1} pts  avg {:>6.1}  high {:>5.0}  low {:>5.0}",
            standing.team,
            standing.matches,
            standing.total_points,
            standing.average_points,
            standing.highest_score,
            if standing.matches > 0 {
                standing.lowest_score
            } else {
                0.0
            },
        );
    }

    println!("\n== Top players ==");
    for profile in snapshot.profiles.iter().take(10) {
        println!(
            "{:<24} {:<13} {:>3} matches  {:>8.1} pts  {}",
            profile.aggregate.name,
            position_label(&profile.player_type),
            profile.aggregate.matches,
            profile.aggregate.total_points,
            profile.value_for_money.label(),
        );
    }

    println!("\n== Bargains ==");
    for entry in &snapshot.auction.bargains {
        println!(
            "{:<24} {:>6.1} pts at {:>5.1}  ({:.1} pts/unit, {})",
            entry.name,
            entry.total_points,
            entry.price,
            entry.ratio,
            entry.price_tier.label(),
        );
    }
}

/// Initialize tracing to stderr so the summary on stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crease_sheet=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

//! Season simulation CLI
//!
//! JSON roster + schedule in, expected-win standings out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use ob_core::api::{build_league, build_schedule, MatchupData, SeasonResponse, TeamData};
use ob_core::engine::{SeasonSimulator, SimConfig, StatWindow};
use ob_core::models::{League, Schedule, SeasonReport};

#[derive(Parser)]
#[command(name = "ob_cli")]
#[command(about = "Monte Carlo baseball season simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a season from roster and schedule files
    Simulate {
        /// Roster JSON file (array of teams)
        #[arg(long)]
        roster: PathBuf,

        /// Schedule JSON file (array of matchups)
        #[arg(long)]
        schedule: PathBuf,

        /// Independent seasons to run
        #[arg(long, default_value = "10")]
        replications: u32,

        /// Base RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Stat window: per_game, per_replication or cumulative
        #[arg(long, default_value = "cumulative")]
        stat_window: String,

        /// Run replications on the rayon pool
        #[arg(long, default_value = "false")]
        parallel: bool,

        /// Abort any game still unresolved at this inning (diagnostic)
        #[arg(long)]
        max_innings: Option<u32>,

        /// Order each lineup by true batting average before the run
        #[arg(long, default_value = "false")]
        sort_lineups: bool,

        /// Print per-team batting tables after the standings
        #[arg(long, default_value = "false")]
        show_players: bool,

        /// Emit the full report as pretty JSON instead of tables
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Write a round-robin schedule for a roster file
    GenerateSchedule {
        /// Roster JSON file (array of teams)
        #[arg(long)]
        roster: PathBuf,

        /// Games per ordered home/away pairing
        #[arg(long, default_value = "2")]
        games_each: u32,

        /// Output schedule JSON file
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            roster,
            schedule,
            replications,
            seed,
            stat_window,
            parallel,
            max_innings,
            sort_lineups,
            show_players,
            json,
        } => {
            let stat_window = parse_stat_window(&stat_window)?;
            let mut league = load_league(&roster)?;
            let games = load_schedule(&schedule, &league)?;
            if sort_lineups {
                league.sort_lineups();
            }

            if !json {
                println!("⚾ Simulating season...");
                println!("   Roster:       {} ({} teams)", roster.display(), league.len());
                println!("   Schedule:     {} ({} games)", schedule.display(), games.len());
                println!("   Replications: {}", replications);
                println!("   Seed:         {}", seed);
            }

            let config = SimConfig {
                replications,
                seed,
                stat_window,
                parallel,
                max_innings,
            };
            let report = run_season(config, &mut league, &games)?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&SeasonResponse::from_report(report))?
                );
            } else {
                println!();
                print!("{}", report.render_table());
                if show_players {
                    for team in league.teams() {
                        println!("\n{}", team.name);
                        print!("{}", report.render_player_table(&team.name));
                    }
                }
            }
        }

        Commands::GenerateSchedule {
            roster,
            games_each,
            out,
        } => {
            let league = load_league(&roster)?;
            let rows = round_robin_rows(&league, games_each);
            fs::write(&out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Failed to write schedule file: {}", out.display()))?;
            println!(
                "📄 Schedule saved to: {} ({} games)",
                out.display(),
                rows.len()
            );
        }
    }

    Ok(())
}

/// Run the simulation, labeling bad roster/schedule/config data as such so
/// the user fixes their files rather than filing an engine bug.
fn run_season(config: SimConfig, league: &mut League, games: &Schedule) -> Result<SeasonReport> {
    SeasonSimulator::new(config)
        .run(league, games)
        .map_err(|e| {
            if e.is_input_error() {
                anyhow::anyhow!("invalid input: {}", e)
            } else {
                anyhow::Error::new(e)
            }
        })
}

fn parse_stat_window(s: &str) -> Result<StatWindow> {
    match s {
        "per_game" => Ok(StatWindow::PerGame),
        "per_replication" => Ok(StatWindow::PerReplication),
        "cumulative" => Ok(StatWindow::Cumulative),
        other => anyhow::bail!(
            "unknown stat window '{}' (expected per_game, per_replication or cumulative)",
            other
        ),
    }
}

fn load_league(path: &Path) -> Result<League> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    let teams: Vec<TeamData> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse roster file: {}", path.display()))?;
    Ok(build_league(teams)?)
}

fn load_schedule(path: &Path, league: &League) -> Result<Schedule> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
    let games: Vec<MatchupData> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse schedule file: {}", path.display()))?;
    Ok(build_schedule(games, league)?)
}

/// Round-robin matchups as name-based rows in the schedule file format.
fn round_robin_rows(league: &League, games_each: u32) -> Vec<serde_json::Value> {
    Schedule::round_robin(league, games_each)
        .games()
        .iter()
        .map(|matchup| {
            json!({
                "away": league.teams()[matchup.away].name,
                "home": league.teams()[matchup.home].name,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    fn slugger(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "true_ba": 1.0,
            "walk_rate": 0.0,
            "single_rate": 0.0,
            "double_rate": 0.0,
            "triple_rate": 0.0,
            "homer_rate": 1.0,
        })
    }

    fn bench_bat(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "true_ba": 0.0,
            "walk_rate": 0.0,
            "single_rate": 1.0,
            "double_rate": 0.0,
            "triple_rate": 0.0,
            "homer_rate": 0.0,
        })
    }

    fn roster_json() -> String {
        let mut aces = vec![slugger("Ace 1")];
        aces.extend((2..=9).map(|i| bench_bat(&format!("Ace {}", i))));
        let cellar: Vec<_> = (1..=9)
            .map(|i| bench_bat(&format!("Cellar {}", i)))
            .collect();
        json!([
            {"name": "Aces", "players": aces},
            {"name": "Cellar", "players": cellar},
        ])
        .to_string()
    }

    #[test]
    fn test_load_league_reads_roster_file() -> Result<()> {
        let roster = write_temp(&roster_json())?;

        let league = load_league(roster.path())?;
        assert_eq!(league.len(), 2);
        assert_eq!(league.teams()[0].name, "Aces");
        assert_eq!(league.teams()[0].lineup.len(), 9);

        Ok(())
    }

    #[test]
    fn test_load_schedule_resolves_names_against_roster() -> Result<()> {
        let roster = write_temp(&roster_json())?;
        let schedule_file = write_temp(
            &json!([
                {"away": "Aces", "home": "Cellar"},
                {"away": "Cellar", "home": "Aces", "date": "2025-04-01"},
            ])
            .to_string(),
        )?;

        let league = load_league(roster.path())?;
        let schedule = load_schedule(schedule_file.path(), &league)?;
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.games()[0].away, 0);
        assert_eq!(schedule.games()[1].home, 0);

        Ok(())
    }

    #[test]
    fn test_loaded_files_drive_a_full_run() -> Result<()> {
        let roster = write_temp(&roster_json())?;
        let schedule_file = write_temp(
            &json!([
                {"away": "Aces", "home": "Cellar"},
                {"away": "Cellar", "home": "Aces"},
            ])
            .to_string(),
        )?;

        let mut league = load_league(roster.path())?;
        let schedule = load_schedule(schedule_file.path(), &league)?;
        let config = SimConfig {
            replications: 3,
            seed: 11,
            ..SimConfig::default()
        };
        let report = SeasonSimulator::new(config).run(&mut league, &schedule)?;

        assert_eq!(report.expected_wins["Aces"], 2.0);
        assert_eq!(report.expected_wins["Cellar"], 0.0);

        Ok(())
    }

    #[test]
    fn test_run_season_labels_input_errors() -> Result<()> {
        // First batter's hit-type split sums to 0.4: a roster file mistake.
        let mut bad = slugger("Ace 1");
        bad["homer_rate"] = json!(0.4);
        let mut aces = vec![bad];
        aces.extend((2..=9).map(|i| bench_bat(&format!("Ace {}", i))));
        let cellar: Vec<_> = (1..=9)
            .map(|i| bench_bat(&format!("Cellar {}", i)))
            .collect();
        let roster = write_temp(
            &json!([
                {"name": "Aces", "players": aces},
                {"name": "Cellar", "players": cellar},
            ])
            .to_string(),
        )?;
        let schedule_file = write_temp(&json!([{"away": "Aces", "home": "Cellar"}]).to_string())?;

        let mut league = load_league(roster.path())?;
        let schedule = load_schedule(schedule_file.path(), &league)?;
        let err = run_season(SimConfig::default(), &mut league, &schedule).unwrap_err();

        assert!(err.to_string().starts_with("invalid input:"), "{}", err);
        assert!(err.to_string().contains("Ace 1"));

        Ok(())
    }

    #[test]
    fn test_run_season_keeps_engine_errors_unlabeled() -> Result<()> {
        // Two all-out lineups never resolve; the inning guard trip is an
        // engine condition, not a data mistake.
        let no_bats: Vec<_> = (1..=9)
            .map(|i| bench_bat(&format!("Zero {}", i)))
            .collect();
        let more_no_bats: Vec<_> = (1..=9)
            .map(|i| bench_bat(&format!("Nil {}", i)))
            .collect();
        let roster = write_temp(
            &json!([
                {"name": "Zeros", "players": no_bats},
                {"name": "Nils", "players": more_no_bats},
            ])
            .to_string(),
        )?;
        let schedule_file = write_temp(&json!([{"away": "Zeros", "home": "Nils"}]).to_string())?;

        let mut league = load_league(roster.path())?;
        let schedule = load_schedule(schedule_file.path(), &league)?;
        let config = SimConfig {
            max_innings: Some(9),
            ..SimConfig::default()
        };
        let err = run_season(config, &mut league, &schedule).unwrap_err();

        assert!(!err.to_string().contains("invalid input"), "{}", err);
        assert!(err.to_string().contains("inning guard"));

        Ok(())
    }

    #[test]
    fn test_round_robin_rows_reload_as_a_schedule() -> Result<()> {
        let roster = write_temp(&roster_json())?;
        let league = load_league(roster.path())?;

        let rows = round_robin_rows(&league, 2);
        // 2 teams, 2 ordered pairings, 2 games each
        assert_eq!(rows.len(), 4);

        let schedule_file = write_temp(&serde_json::to_string_pretty(&rows)?)?;
        let schedule = load_schedule(schedule_file.path(), &league)?;
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.games_for(0), 4);

        Ok(())
    }

    #[test]
    fn test_parse_stat_window_names() {
        assert_eq!(parse_stat_window("per_game").unwrap(), StatWindow::PerGame);
        assert_eq!(
            parse_stat_window("per_replication").unwrap(),
            StatWindow::PerReplication
        );
        assert_eq!(
            parse_stat_window("cumulative").unwrap(),
            StatWindow::Cumulative
        );
        assert!(parse_stat_window("weekly").is_err());
    }

    #[test]
    fn test_missing_roster_file_reports_the_path() {
        let err = load_league(Path::new("/no/such/roster.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/roster.json"));
    }
}

// Season convergence statistics check
// Run with: cargo run --bin season_stats --release
//
// Replays the same synthetic league at increasing replication counts and
// checks that expected win totals stabilize and observed batting rates
// land on the configured ones.

use anyhow::Result;
use serde_json::{json, Value};

use ob_core::api::simulate_season_json;

const TEAMS: [(&str, f64); 4] = [
    ("Harbor Cats", 0.262),
    ("Iron Miners", 0.255),
    ("North Pilots", 0.248),
    ("Valley Reds", 0.241),
];

const REPLICATION_STEPS: [u32; 4] = [10, 50, 200, 1000];

fn slot_ba(base_ba: f64, slot: u32) -> f64 {
    base_ba + slot as f64 * 0.002
}

fn create_season_request(seed: u64, replications: u32) -> String {
    let teams: Vec<Value> = TEAMS
        .iter()
        .map(|(name, base_ba)| {
            let players: Vec<Value> = (1..=9)
                .map(|slot| {
                    json!({
                        "name": format!("{} {}", name.split(' ').next().unwrap_or(name), slot),
                        "seasons": [2023, 2024],
                        "true_ba": slot_ba(*base_ba, slot),
                        "walk_rate": 0.08,
                        "single_rate": 0.64,
                        "double_rate": 0.20,
                        "triple_rate": 0.02,
                        "homer_rate": 0.14,
                    })
                })
                .collect();
            json!({"name": name, "players": players})
        })
        .collect();

    // Double round robin: every ordered pair hosts once, 12 games per team.
    let mut schedule = Vec::new();
    for (away, _) in &TEAMS {
        for (home, _) in &TEAMS {
            if away != home {
                schedule.push(json!({"away": away, "home": home}));
                schedule.push(json!({"away": away, "home": home}));
            }
        }
    }
    let games = schedule.len();

    let request = json!({
        "schema_version": 1,
        "seed": seed,
        "replications": replications,
        "parallel": replications >= 200,
        "teams": teams,
        "schedule": schedule,
    });
    debug_assert_eq!(games, 24);
    request.to_string()
}

fn expected_wins(response: &Value, team: &str) -> f64 {
    response["expected_wins"][team].as_f64().unwrap_or(f64::NAN)
}

fn main() -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║              Season Convergence Statistics Check             ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let seed = 20240400u64;
    let mut responses: Vec<(u32, Value)> = Vec::new();

    for &replications in &REPLICATION_STEPS {
        print!("Running {} replications...", replications);
        use std::io::Write;
        std::io::stdout().flush().ok();

        match simulate_season_json(&create_season_request(seed, replications)) {
            Ok(raw) => {
                let parsed: Value = serde_json::from_str(&raw)?;
                println!(" done");
                responses.push((replications, parsed));
            }
            Err(e) => {
                eprintln!("\nrun with {} replications failed: {}", replications, e);
            }
        }
    }

    if responses.is_empty() {
        anyhow::bail!("no successful runs");
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print!("📊 Expected wins            ");
    for (replications, _) in &responses {
        print!("{:>8}", format!("N={}", replications));
    }
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (team, _) in &TEAMS {
        print!("  {:<26}", team);
        for (_, response) in &responses {
            print!("{:>8.2}", expected_wins(response, team));
        }
        println!();
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📋 Target Validation:");

    let (_, final_response) = &responses[responses.len() - 1];

    // Expected wins must sum to the scheduled game count at every N.
    let sums_ok = responses.iter().all(|(_, response)| {
        let total: f64 = TEAMS.iter().map(|(team, _)| expected_wins(response, team)).sum();
        (total - 24.0).abs() < 1e-9
    });
    println!(
        "  Win totals: {} (sum to 24 scheduled games at every N)",
        if sums_ok { "✅" } else { "⚠️" }
    );

    // The two largest runs should agree to within Monte Carlo noise.
    let drift_ok = if responses.len() >= 2 {
        let (_, prev) = &responses[responses.len() - 2];
        TEAMS
            .iter()
            .map(|(team, _)| (expected_wins(final_response, team) - expected_wins(prev, team)).abs())
            .fold(0.0f64, f64::max)
            <= 0.5
    } else {
        false
    };
    println!(
        "  Convergence: {} (largest team drift between final two runs <= 0.5 wins)",
        if drift_ok { "✅" } else { "⚠️" }
    );

    // Cumulative lines at the largest N should reproduce the input rates.
    let mut worst_ba_gap = 0.0f64;
    if let Some(players) = final_response["players"].as_array() {
        for player in players {
            let team = player["team"].as_str().unwrap_or("");
            let name = player["name"].as_str().unwrap_or("");
            let slot: u32 = name
                .rsplit(' ')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            if let Some((_, base_ba)) = TEAMS.iter().find(|(t, _)| *t == team) {
                let gap = (player["observed_ba"].as_f64().unwrap_or(f64::NAN)
                    - slot_ba(*base_ba, slot))
                .abs();
                worst_ba_gap = worst_ba_gap.max(gap);
            }
        }
    }
    let ba_ok = worst_ba_gap < 0.01;
    println!(
        "  Batting avg: {} (worst observed-vs-true gap {:.4}, target < 0.0100)",
        if ba_ok { "✅" } else { "⚠️" },
        worst_ba_gap
    );

    // Same request twice must serialize identically.
    let request = create_season_request(seed, 50);
    let determinism_ok = match (simulate_season_json(&request), simulate_season_json(&request)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    println!(
        "  Determinism: {} (same seed reproduces the response byte for byte)",
        if determinism_ok { "✅" } else { "⚠️" }
    );

    if sums_ok && drift_ok && ba_ok && determinism_ok {
        println!("\n  🎉 All targets met!");
    }

    println!();
    Ok(())
}

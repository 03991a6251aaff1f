//! League API smoke test
//!
//! Run against a live server:
//! - `/health` and `/` must answer 200, otherwise the run fails
//! - `/league/data` is reported but only warned about, since it needs a
//!   configured ESPN league

use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use matchup_model::WeekSnapshot;
use reqwest::Client;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "api-smoke-test")]
#[command(about = "Smoke test a running League API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Base URL of the League API
    #[arg(short, long, default_value = "http://localhost:8000")]
    base_url: String,
}

async fn check_endpoint(client: &Client, base_url: &str, path: &str, label: &str) -> bool {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    match client.get(&url).timeout(Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => {
            println!("{}", format!("✅ {label} endpoint working").green());
            true
        }
        Ok(response) => {
            println!("{}", format!("❌ {label} endpoint failed: {}", response.status()).red());
            false
        }
        Err(e) => {
            println!("{}", format!("❌ {label} endpoint failed: {e}").red());
            false
        }
    }
}

/// One line per fact worth showing about a served snapshot
fn describe_snapshot(snapshot: &WeekSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("League: {}", snapshot.league_name),
        format!("Week: {}", snapshot.week),
        format!("Matchups: {}", snapshot.matchups.len()),
    ];
    if let Some(median) = snapshot.projected_median {
        lines.push(format!("Projected median: {median:.1}"));
    }
    for m in &snapshot.matchups {
        lines.push(format!(
            "  {} {:.1} vs {:.1} {} ({:.0}%-{:.0}%)",
            m.home_team.team_abbrev,
            m.home_team.current_score,
            m.away_team.current_score,
            m.away_team.team_abbrev,
            m.home_win_probability * 100.0,
            m.away_win_probability * 100.0
        ));
    }
    lines
}

async fn check_league_data(client: &Client, base_url: &str) -> bool {
    let url = format!("{}/league/data", base_url.trim_end_matches('/'));
    let response = match client.get(&url).timeout(Duration::from_secs(10)).send().await {
        Ok(response) => response,
        Err(e) => {
            println!("{}", format!("❌ League data endpoint failed: {e}").red());
            return false;
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            println!("{}", format!("❌ League data endpoint failed: {e}").red());
            return false;
        }
    };

    if !status.is_success() {
        println!("{}", format!("❌ League data endpoint failed: {status}").red());
        println!("   Response: {body}");
        return false;
    }

    match serde_json::from_str::<WeekSnapshot>(&body) {
        Ok(snapshot) => {
            println!("{}", "✅ League data endpoint working".green());
            for line in describe_snapshot(&snapshot) {
                println!("   {line}");
            }
            true
        }
        Err(e) => {
            println!("{}", format!("❌ League data response is not a week snapshot: {e}").red());
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    println!("{}", "Testing Fantasy Football Matrix API...".cyan().bold());
    println!("API Base URL: {}", cli.base_url);
    println!("{}", "-".repeat(50));

    let health_ok = check_endpoint(&client, &cli.base_url, "/health", "Health").await;
    let root_ok = check_endpoint(&client, &cli.base_url, "/", "Root").await;

    println!();
    println!("Testing league data endpoint...");
    println!("(This fails without an ESPN league configured on the server)");
    let league_ok = check_league_data(&client, &cli.base_url).await;

    println!("{}", "-".repeat(50));
    if !(health_ok && root_ok) {
        println!("{}", "❌ Basic API endpoints failing".red().bold());
        bail!("basic endpoints failed");
    }

    println!("{}", "✅ Basic API functionality working!".green().bold());
    if league_ok {
        println!("{}", "✅ League data working - API fully functional!".green());
    } else {
        println!("{}", "⚠️  League data failed - check the server's .env configuration".yellow());
    }
    Ok(())
}

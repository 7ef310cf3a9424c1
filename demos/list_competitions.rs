use anyhow::Result;
use betfair_tables::{config::Config, BetfairClient, MarketFilter};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration and log in
    let config = Config::new()?;
    let client = BetfairClient::connect(&config).await?;
    info!("Login successful");

    // Sport ID from the command line, soccer otherwise
    let sport_id = env::args().nth(1).unwrap_or_else(|| "1".to_string());

    let sports = client.event_types(&MarketFilter::default()).await?;
    println!("Available sports:");
    println!("{:<10} {:<30} {}", "ID", "Name", "Market Count");
    println!("{}", "-".repeat(60));
    for row in sports.records().iter().take(15) {
        println!(
            "{:<10} {:<30} {}",
            row["id"].as_str().unwrap_or_default(),
            row["name"].as_str().unwrap_or_default(),
            row["marketCount"]
        );
    }

    let filter = MarketFilter::builder().event_type_ids([sport_id.as_str()]).build()?;
    let competitions = client.competitions(&filter).await?;

    if competitions.is_empty() {
        println!("\nNo competitions found for sport {sport_id}.");
        return Ok(());
    }

    println!("\nFound {} competitions for sport {}:\n", competitions.len(), sport_id);
    println!("{:<10} {:<50} {:<15} {}", "ID", "Name", "Region", "Markets");
    println!("{}", "-".repeat(90));
    for row in competitions.records().iter().take(30) {
        println!(
            "{:<10} {:<50} {:<15} {}",
            row["id"].as_str().unwrap_or_default(),
            row["name"].as_str().unwrap_or_default(),
            row.get("competitionRegion")
                .and_then(|v| v.as_str())
                .unwrap_or("International"),
            row["marketCount"]
        );
    }

    if competitions.len() > 30 {
        println!("\n... and {} more competitions", competitions.len() - 30);
    }

    Ok(())
}

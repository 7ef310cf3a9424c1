use anyhow::Result;
use betfair_tables::dto::{MarketSort, PriceData, PriceProjection};
use betfair_tables::{config::Config, BetfairClient, CatalogueOptions, MarketBookOptions, MarketFilter};
use chrono::{Duration, Utc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Config::new()?;
    let client = BetfairClient::connect(&config).await?;

    // Soccer match odds starting in the next 24 hours
    let now = Utc::now();
    let filter = MarketFilter::builder()
        .event_type_ids(["1"])
        .market_type_codes(["MATCH_ODDS"])
        .market_start_time(now.to_rfc3339(), (now + Duration::hours(24)).to_rfc3339())
        .build()?;

    let options = CatalogueOptions {
        market_projection: Some(vec![
            "event".to_string(),
            "market_start_time".to_string(),
            "runner_description".to_string(),
        ]),
        sort: Some(MarketSort::FirstToStart),
        max_results: Some(5),
        keep_rules: false,
    };
    let catalogue = client.market_catalogue(&filter, &options).await?;
    info!("Catalogue columns: {:?}", catalogue.columns());

    println!("{:<14} {:<40} {:<30}", "Market", "Event", "Runner");
    println!("{}", "-".repeat(84));
    for row in catalogue.records() {
        println!(
            "{:<14} {:<40} {:<30}",
            row["marketId"].as_str().unwrap_or_default(),
            row.get("event.name").and_then(|v| v.as_str()).unwrap_or_default(),
            row.get("runnerName").and_then(|v| v.as_str()).unwrap_or_default(),
        );
    }

    let mut market_ids: Vec<String> = catalogue
        .column("marketId")
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    market_ids.dedup();
    if market_ids.is_empty() {
        println!("\nNo markets found.");
        return Ok(());
    }

    let books = client
        .market_book(&MarketBookOptions {
            market_ids,
            price_projection: Some(PriceProjection {
                price_data: Some(vec![PriceData::ExBestOffers]),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await?;

    for book in &books {
        println!(
            "\n{} status={} matched={}",
            book["marketId"].as_str().unwrap_or_default(),
            book["status"],
            book["totalMatched"]
        );
        let runners = book["runners"].as_array().map(Vec::as_slice).unwrap_or_default();
        for runner in runners {
            match runner["ex"]["availableToBack"].get(0) {
                Some(level) => println!(
                    "  {:<12} back {} for {}",
                    runner["selectionId"], level["price"], level["size"]
                ),
                None => println!("  {:<12} no prices", runner["selectionId"]),
            }
        }
    }

    Ok(())
}

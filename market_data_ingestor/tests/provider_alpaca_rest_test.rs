use chrono::{Duration, Utc};
use market_data_ingestor::{
    models::{request_params::BarsRequest, timeframe::TimeFrame},
    providers::{DataProvider, alpaca_rest::AlpacaProvider},
};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpaca_provider_fetch_daily_bars() {
    // Requires APCA_API_KEY_ID and APCA_API_SECRET_KEY in the environment.
    if std::env::var("APCA_API_KEY_ID").is_err() || std::env::var("APCA_API_SECRET_KEY").is_err() {
        println!("Skipping test_alpaca_provider_fetch_daily_bars: API keys not set.");
        return;
    }

    let provider = AlpacaProvider::new().expect("Failed to create AlpacaProvider");

    let request = BarsRequest {
        symbol: "AAPL".to_string(),
        timeframe: TimeFrame::day(),
        range: 5,
        start: Utc::now() - Duration::days(30),
        end: Utc::now() - Duration::days(1),
    };

    let result = provider.fetch_bars(&request).await;
    assert!(result.is_ok(), "fetch_bars returned an error: {:?}", result.err());

    let series = result.unwrap();
    assert_eq!(series.symbol, "AAPL");
    assert!(!series.is_empty(), "Expected to fetch at least one bar for AAPL");

    // Oldest first.
    for pair in series.bars.windows(2) {
        assert!(pair[0].open_time <= pair[1].open_time);
    }
}

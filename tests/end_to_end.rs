//! Dashboard against a live API server on an ephemeral port

use obesity_dash::api::{build_router, AppState};
use obesity_dash::config::ApiConfig;
use obesity_dash::dashboard::{self, ApiClient, Chart, DataSource, StatisticsOutcome, StatisticsReply};
use obesity_dash::dataset::{Column, Dataset};
use std::sync::Arc;
use std::time::Duration;

const SAMPLE: &str = "Age,Gender,Height,Weight,BMI
20,Female,150,50,22.2
35,Male,160,60,23.4
40,Female,170,70,24.2
25,Male,180,NA,
";

/// Serve `csv` on 127.0.0.1 and return a client pointed at it
async fn spawn_server(csv: &str) -> ApiClient {
    let dataset = Dataset::from_csv_str(csv).unwrap();
    let state = AppState::new(Arc::new(dataset), ApiConfig::default());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    ApiClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_ping_and_health() {
    let client = spawn_server(SAMPLE).await;

    let root = client.ping().await.unwrap();
    assert_eq!(root.message, "Obesity data API is working!");

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.rows, 3);
    assert_eq!(health.dropped_rows, 1);
}

#[tokio::test]
async fn test_data_rows_are_cleaned() {
    let client = spawn_server(SAMPLE).await;

    let data = client.fetch_data().await.unwrap();
    let rows = data.as_array().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Gender"], "Female");
    assert_eq!(rows[0]["Age_Group_30"], "Under 30");
    assert_eq!(rows[2]["Age_Group_30"], "30 and Above");
}

#[tokio::test]
async fn test_statistics_round_trip() {
    let client = spawn_server(SAMPLE).await;

    let reply = client.fetch_statistics(Column::Height).await.unwrap();
    let StatisticsReply::Summary(summary) = reply else {
        panic!("expected a summary, got {:?}", reply);
    };
    assert!((summary.mean - 160.0).abs() < 1e-9);
    assert!((summary.std - 10.0).abs() < 1e-9);

    let reply = client.statistics("Foo").await.unwrap();
    assert_eq!(
        reply,
        StatisticsReply::Error("Column 'Foo' not found or not allowed".to_string())
    );
}

#[tokio::test]
async fn test_full_dashboard() {
    let client = spawn_server(SAMPLE).await;

    let dashboard = dashboard::build(&client, Some(Column::Weight)).await.unwrap();

    assert_eq!(dashboard.table.len(), 3);
    match dashboard.statistics {
        Some(StatisticsOutcome::Summary { summary, .. }) => {
            assert!((summary.median - 60.0).abs() < 1e-9)
        }
        other => panic!("expected a summary, got {:?}", other),
    }

    assert_eq!(dashboard.charts.len(), 5);
    assert!(dashboard.charts.iter().all(|panel| panel.result.is_ok()));
    let Ok(Chart::Regression(regression)) = &dashboard.charts[4].result else {
        panic!("expected the regression chart last");
    };
    assert!((regression.correlation - 1.0).abs() < 1e-9);

    let html = dashboard::render_html(&dashboard, chrono::Utc::now());
    assert!(html.contains("Statistics for Weight"));
    assert!(html.contains("Correlation Coefficient: 1.00"));
}

#[tokio::test]
async fn test_empty_dataset_halts_dashboard() {
    let client = spawn_server("Height,Weight,Age\n").await;

    let err = dashboard::build(&client, None).await.unwrap_err();
    assert!(matches!(err, dashboard::DashboardError::EmptyDataset));

    let reply = client.fetch_statistics(Column::Age).await.unwrap();
    assert!(matches!(reply, StatisticsReply::Error(ref m) if m.starts_with("Error calculating statistics")));
}

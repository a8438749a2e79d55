//! Resilience Policy Unit Tests
//!
//! Drives `BriefingService` against a mocked spreadsheet and checks which
//! snapshot and advisory end up published.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::briefing::demo::demo_snapshot;
use crate::core::briefing::{
    Advisory, BriefingService, EventConfig, SheetSource, SheetTable, Viewer,
};
use crate::tests::common::{DOCUMENTS_CSV, ORGANIZATION_CSV};

async fn sheet_server(organization: Option<&str>, documents: Option<&str>) -> MockServer {
    let server = MockServer::start().await;
    for (table, body) in [
        (SheetTable::Organization, organization),
        (SheetTable::Documents, documents),
    ] {
        let response = match body {
            Some(text) => ResponseTemplate::new(200).set_body_string(text),
            None => ResponseTemplate::new(500),
        };
        Mock::given(method("GET"))
            .and(path("/export"))
            .and(query_param("sheet", table.sheet_name()))
            .respond_with(response)
            .mount(&server)
            .await;
    }
    server
}

fn service_for(server: &MockServer) -> (BriefingService<SheetSource>, EventConfig) {
    let bootstrap = EventConfig {
        sheets_url: format!("{}/export?sheet=", server.uri()),
        ..EventConfig::default()
    };
    let source = SheetSource::new(&bootstrap.sheets_url, Duration::from_secs(5));
    (BriefingService::with_demo_data(source, &bootstrap), bootstrap)
}

#[tokio::test]
async fn test_starts_on_demo_data_before_refresh() {
    let server = sheet_server(Some(ORGANIZATION_CSV), Some(DOCUMENTS_CSV)).await;
    let (service, _) = service_for(&server);

    let state = service.current();
    assert_eq!(*state.snapshot, demo_snapshot());
    assert_eq!(state.advisory, Some(Advisory::DemoData));
}

#[tokio::test]
async fn test_full_sheet_replaces_demo_data() {
    let server = sheet_server(Some(ORGANIZATION_CSV), Some(DOCUMENTS_CSV)).await;
    let (service, bootstrap) = service_for(&server);

    let state = service.refresh().await;
    assert_eq!(state.advisory, None);
    assert_eq!(state.snapshot.organization.len(), 5);
    assert_eq!(state.snapshot.documents.len(), 8);

    let config = state.config(&bootstrap);
    assert_eq!(config.title, "Operation Nightfall");
    assert_eq!(config.run.number, "2");
    assert_eq!(config.sheets_url, bootstrap.sheets_url);
}

#[tokio::test]
async fn test_missing_documents_table_reverts_to_demo() {
    let server = sheet_server(Some(ORGANIZATION_CSV), None).await;
    let (service, _) = service_for(&server);

    let state = service.refresh().await;
    assert_eq!(state.advisory, Some(Advisory::PartialData));
    assert_eq!(*state.snapshot, demo_snapshot());
}

#[tokio::test]
async fn test_header_only_table_counts_as_empty() {
    let header_only = ORGANIZATION_CSV.lines().next().unwrap();
    let server = sheet_server(Some(header_only), Some(DOCUMENTS_CSV)).await;
    let (service, _) = service_for(&server);

    let state = service.refresh().await;
    assert_eq!(state.advisory, Some(Advisory::PartialData));
}

#[tokio::test]
async fn test_both_tables_failing_keeps_demo() {
    let server = sheet_server(None, None).await;
    let (service, _) = service_for(&server);

    let state = service.refresh().await;
    assert_eq!(state.advisory, Some(Advisory::DemoData));
    assert_eq!(state.snapshot.characters().count(), 99);
}

#[tokio::test]
async fn test_spawned_refresh_notifies_subscribers() {
    let server = sheet_server(Some(ORGANIZATION_CSV), Some(DOCUMENTS_CSV)).await;
    let (service, _) = service_for(&server);
    let mut rx = service.subscribe();

    let handle = service.spawn_refresh(Duration::from_millis(10));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().advisory, None);
    assert_eq!(handle.await.unwrap().advisory, None);

    let broadcast = service.current().documents_for(&Viewer::Everyone);
    let titles: Vec<&str> = broadcast
        .values()
        .flatten()
        .map(|d| d.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Arrival", "Food", "Rumors"]);
}

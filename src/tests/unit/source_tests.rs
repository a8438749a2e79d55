//! Tabular Fetcher Unit Tests
//!
//! Every failure mode must come back as `None` from `fetch_table`, with the
//! category still visible through `try_fetch`.

use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::briefing::source::{FetchFailure, SheetSource, SheetTable, TableSource};
use crate::tests::common::ORGANIZATION_CSV;

fn source_for(server: &MockServer, timeout: Duration) -> SheetSource {
    SheetSource::new(&format!("{}/export?sheet=", server.uri()), timeout)
}

async fn mount_table(server: &MockServer, table: SheetTable, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/export"))
        .and(query_param("sheet", table.sheet_name()))
        .respond_with(response)
        .mount(server)
        .await;
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_fetch_returns_body_verbatim() {
    let server = MockServer::start().await;
    mount_table(
        &server,
        SheetTable::Organization,
        ResponseTemplate::new(200).set_body_string(ORGANIZATION_CSV),
    )
    .await;

    let source = source_for(&server, Duration::from_secs(5));
    let text = source.fetch_table(SheetTable::Organization).await;
    assert_eq!(text.as_deref(), Some(ORGANIZATION_CSV));
}

#[tokio::test]
async fn test_fetch_asks_to_bypass_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server, Duration::from_secs(5));
    assert!(source.fetch_table(SheetTable::Documents).await.is_some());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_non_success_status_is_absent() {
    let server = MockServer::start().await;
    mount_table(&server, SheetTable::Documents, ResponseTemplate::new(404)).await;

    let source = source_for(&server, Duration::from_secs(5));
    assert!(matches!(
        source.try_fetch(SheetTable::Documents).await,
        Err(FetchFailure::Status(404))
    ));
    assert!(source.fetch_table(SheetTable::Documents).await.is_none());
}

#[tokio::test]
async fn test_blank_body_is_absent() {
    let server = MockServer::start().await;
    mount_table(
        &server,
        SheetTable::Organization,
        ResponseTemplate::new(200).set_body_string("  \n"),
    )
    .await;

    let source = source_for(&server, Duration::from_secs(5));
    assert!(matches!(
        source.try_fetch(SheetTable::Organization).await,
        Err(FetchFailure::EmptyBody)
    ));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    mount_table(
        &server,
        SheetTable::Organization,
        ResponseTemplate::new(200)
            .set_body_string(ORGANIZATION_CSV)
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let timeout = Duration::from_millis(100);
    let source = source_for(&server, timeout);
    assert!(matches!(
        source.try_fetch(SheetTable::Organization).await,
        Err(FetchFailure::Timeout(t)) if t == timeout
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_absent() {
    // Port 9 (discard) on localhost is not expected to be listening.
    let source = SheetSource::new("http://127.0.0.1:9/export?sheet=", Duration::from_secs(2));
    assert!(source.fetch_table(SheetTable::Organization).await.is_none());
}

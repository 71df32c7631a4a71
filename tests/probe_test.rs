//! Tests for HEAD probing of common and CMS signature paths

use std::time::Duration;

use sitescout::discovery::probe_paths;

mod common;
use common::*;

#[tokio::test]
async fn test_probe_confirms_only_200_paths() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _about = create_head_mock(&mut server, "/about", 200).await;
    let _login = create_head_mock(&mut server, "/wp-login.php", 200).await;
    let _hidden = create_head_mock(&mut server, "/api", 403).await;

    let report = probe_paths(&test_fetcher(), &base, Duration::from_secs(2)).await;

    assert_eq!(
        report.confirmed,
        vec![format!("{base}/about"), format!("{base}/wp-login.php")]
    );
    assert!(report.detected_cms.contains("wordpress"));
    assert_eq!(report.detected_cms.len(), 1);
}

#[tokio::test]
async fn test_shared_signature_path_marks_every_cms() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _admin = create_head_mock(&mut server, "/admin", 200).await;

    let report = probe_paths(&test_fetcher(), &base, Duration::from_secs(2)).await;

    assert_eq!(report.confirmed, vec![format!("{base}/admin")]);
    for cms in ["shopify", "drupal", "magento"] {
        assert!(report.detected_cms.contains(cms), "missing {cms}");
    }
}

#[tokio::test]
async fn test_redirected_probe_keeps_final_url() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _redirect = server
        .mock("HEAD", "/blog")
        .with_status(301)
        .with_header("location", "/journal")
        .create_async()
        .await;
    let _target = create_head_mock(&mut server, "/journal", 200).await;

    let report = probe_paths(&test_fetcher(), &base, Duration::from_secs(2)).await;

    assert_eq!(report.confirmed, vec![format!("{base}/journal")]);
    assert!(report.detected_cms.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_confirms_nothing() {
    let report = probe_paths(
        &test_fetcher(),
        "http://127.0.0.1:9",
        Duration::from_millis(500),
    )
    .await;
    assert!(report.confirmed.is_empty());
}

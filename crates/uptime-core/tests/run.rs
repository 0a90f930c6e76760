use std::time::Duration;

use serde_json::Value;
use uptime_core::{CheckConfig, CheckOutcome, DeliveryOutcome, Runner, Site, SiteError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn site_server(routes: &[(&str, u16)]) -> MockServer {
    let server = MockServer::start().await;
    for (route, status) in routes {
        Mock::given(method("GET"))
            .and(path(*route))
            .respond_with(ResponseTemplate::new(*status))
            .expect(1)
            .mount(&server)
            .await;
    }
    server
}

async fn hook_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(status).set_body_string("hook says no"))
        .mount(&server)
        .await;
    server
}

fn runner_for(hook: &MockServer) -> Runner {
    let config = CheckConfig::default()
        .with_request_timeout(Duration::from_millis(500))
        .with_webhook_timeout(Duration::from_secs(2));
    Runner::new(&format!("{}/hook", hook.uri()), None, &config).unwrap()
}

async fn webhook_bodies(hook: &MockServer) -> Vec<Value> {
    hook.received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r: &Request| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn healthy_site_sends_no_webhook() {
    let sites = site_server(&[("/a", 200)]).await;
    let hook = hook_server(200).await;

    let report = runner_for(&hook)
        .run(&[Site::new("A", format!("{}/a", sites.uri()), &[200])])
        .await
        .unwrap();

    assert_eq!(report.up_count(), 1);
    assert!(report.deliveries.is_empty());
    assert!(webhook_bodies(&hook).await.is_empty());
}

#[tokio::test]
async fn unexpected_status_sends_one_webhook_with_code() {
    let sites = site_server(&[("/a", 503)]).await;
    let hook = hook_server(200).await;
    let url = format!("{}/a", sites.uri());

    let report = runner_for(&hook)
        .run(&[Site::new("A", url.clone(), &[200])])
        .await
        .unwrap();

    assert_eq!(report.down_count(), 1);
    let bodies = webhook_bodies(&hook).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["siteName"], "A");
    assert_eq!(bodies[0]["siteUrl"], url.as_str());
    assert_eq!(bodies[0]["status"], "DOWN");
    assert_eq!(bodies[0]["httpCode"], 503);
    assert!(bodies[0]["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn connection_refused_sends_null_code() {
    let hook = hook_server(200).await;

    let report = runner_for(&hook)
        .run(&[Site::new("A", "http://127.0.0.1:1/", &[200])])
        .await
        .unwrap();

    assert!(matches!(report.results[0].outcome, CheckOutcome::Unreachable { .. }));
    let bodies = webhook_bodies(&hook).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0]["httpCode"].is_null());
}

#[tokio::test]
async fn timeout_sends_null_code() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&sites)
        .await;
    let hook = hook_server(200).await;

    let report = runner_for(&hook)
        .run(&[Site::new("slow", sites.uri(), &[200])])
        .await
        .unwrap();

    assert_eq!(report.results[0].status_code(), None);
    let bodies = webhook_bodies(&hook).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["siteName"], "slow");
    assert!(bodies[0]["httpCode"].is_null());
}

#[tokio::test]
async fn webhook_count_matches_down_sites_with_shared_timestamp() {
    let sites = site_server(&[("/up", 200), ("/moved", 301), ("/err", 500), ("/gone", 404)]).await;
    let hook = hook_server(200).await;
    let base = sites.uri();

    let list = vec![
        Site::new("up", format!("{base}/up"), &[200]),
        Site::new("moved", format!("{base}/moved"), &[200, 301]),
        Site::new("err", format!("{base}/err"), &[200]),
        Site::new("gone", format!("{base}/gone"), &[200]),
        Site::new("dead", "http://127.0.0.1:1/", &[200]),
    ];
    let report = runner_for(&hook).run(&list).await.unwrap();

    assert_eq!(report.up_count(), 2);
    assert_eq!(report.down_count(), 3);

    let bodies = webhook_bodies(&hook).await;
    assert_eq!(bodies.len(), report.down_count());

    let names: Vec<_> = bodies.iter().map(|b| b["siteName"].as_str().unwrap()).collect();
    assert_eq!(names, ["err", "gone", "dead"]);

    let codes: Vec<_> = bodies.iter().map(|b| b["httpCode"].clone()).collect();
    assert_eq!(codes, [Value::from(500), Value::from(404), Value::Null]);

    let first = &bodies[0]["timestamp"];
    assert!(bodies.iter().all(|b| &b["timestamp"] == first));
}

#[tokio::test]
async fn empty_site_list_makes_no_calls() {
    let hook = hook_server(200).await;

    let report = runner_for(&hook).run(&[]).await.unwrap();

    assert_eq!(report.results.len(), 0);
    assert!(webhook_bodies(&hook).await.is_empty());
}

#[tokio::test]
async fn failing_webhook_does_not_fail_the_run() {
    let sites = site_server(&[("/a", 503), ("/b", 502)]).await;
    let hook = hook_server(500).await;
    let base = sites.uri();

    let report = runner_for(&hook)
        .run(&[
            Site::new("A", format!("{base}/a"), &[200]),
            Site::new("B", format!("{base}/b"), &[200]),
        ])
        .await
        .unwrap();

    assert_eq!(report.deliveries.len(), 2);
    assert_eq!(report.failed_deliveries(), 2);
    assert_eq!(
        report.deliveries[0].1,
        DeliveryOutcome::Rejected {
            status: 500,
            body: "hook says no".into()
        }
    );
}

#[tokio::test]
async fn incomplete_site_entry_only_fails_itself() {
    let sites = site_server(&[("/ok", 200)]).await;
    let hook = hook_server(200).await;

    let list: Vec<Site> = serde_json::from_value(serde_json::json!([
        { "name": "partial", "url": "http://127.0.0.1:1/" },
        { "name": "ok", "url": format!("{}/ok", sites.uri()), "expectedStatus": [200] },
    ]))
    .unwrap();

    let report = runner_for(&hook).run(&list).await.unwrap();

    assert!(matches!(report.results[0].outcome, CheckOutcome::Misconfigured { .. }));
    assert!(report.results[1].is_up());

    let bodies = webhook_bodies(&hook).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["siteName"], "partial");
    assert!(bodies[0]["httpCode"].is_null());
}

#[tokio::test]
async fn malformed_site_entries_only_fail_themselves() {
    let sites = site_server(&[("/ok", 200), ("/anon", 200)]).await;
    let hook = hook_server(200).await;
    let base = sites.uri();

    let list: Vec<Site> = serde_json::from_value(serde_json::json!([
        { "name": "typed-wrong", "url": "http://127.0.0.1:1/", "expectedStatus": "200" },
        { "name": "ok", "url": format!("{base}/ok"), "expectedStatus": [200] },
        { "name": null, "url": format!("{base}/anon"), "expectedStatus": [200] },
        { "name": "bad-url", "url": 42, "expectedStatus": [200] },
    ]))
    .unwrap();

    let report = runner_for(&hook).run(&list).await.unwrap();

    assert!(matches!(
        report.results[0].outcome,
        CheckOutcome::Misconfigured { error: SiteError::Invalid { .. } }
    ));
    assert!(report.results[1].is_up());
    assert!(report.results[2].is_up());
    assert!(matches!(
        report.results[3].outcome,
        CheckOutcome::Misconfigured { error: SiteError::Invalid { .. } }
    ));

    let bodies = webhook_bodies(&hook).await;
    let names: Vec<_> = bodies.iter().map(|b| b["siteName"].as_str().unwrap()).collect();
    assert_eq!(names, ["typed-wrong", "bad-url"]);
    assert!(bodies.iter().all(|b| b["httpCode"].is_null()));
    assert_eq!(bodies[0]["siteUrl"], "http://127.0.0.1:1/");
    assert_eq!(bodies[1]["siteUrl"], "");
}

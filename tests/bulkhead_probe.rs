use std::sync::Mutex;

use loadforge_bulkhead::client::build_client;
use loadforge_bulkhead::error::TransportError;
use loadforge_bulkhead::models::outcome::{Outcome, Sample};
use loadforge_bulkhead::models::probe_config::ProbeConfig;
use loadforge_bulkhead::probe::{BulkheadProbe, ResultSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CollectingSink {
    samples: Mutex<Vec<Sample>>,
}

impl ResultSink for CollectingSink {
    fn record(&self, sample: Sample) {
        self.samples.lock().unwrap().push(sample);
    }
}

impl CollectingSink {
    fn outcomes(&self) -> Vec<Outcome> {
        self.samples.lock().unwrap().iter().map(|s| s.outcome.clone()).collect()
    }
}

async fn server_returning(status: u16, expected_hits: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/api/products"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_hits)
        .mount(&server)
        .await;
    server
}

fn probe_for(server: &MockServer) -> BulkheadProbe {
    let config = ProbeConfig {
        host: server.uri(),
        ..Default::default()
    };
    BulkheadProbe::new(build_client(), &config).expect("valid probe config")
}

#[tokio::test]
async fn admitted_request_is_a_success() {
    let server = server_returning(200, 1).await;
    let sink = CollectingSink::default();

    probe_for(&server).run_iteration(&sink).await;

    let outcomes = sink.outcomes();
    assert_eq!(outcomes, vec![Outcome::Success]);
    assert_eq!(outcomes[0].failure_message(), None);
}

#[tokio::test]
async fn service_unavailable_is_a_bulkhead_rejection() {
    let server = server_returning(503, 1).await;
    let sink = CollectingSink::default();

    probe_for(&server).run_iteration(&sink).await;

    let outcomes = sink.outcomes();
    assert_eq!(outcomes, vec![Outcome::BulkheadRejection(503)]);
    assert_eq!(outcomes[0].failure_message().unwrap(), "Bulkhead Rejection: 503");
}

#[tokio::test]
async fn internal_error_is_a_bulkhead_rejection() {
    let server = server_returning(500, 1).await;
    let sink = CollectingSink::default();

    probe_for(&server).run_iteration(&sink).await;

    assert_eq!(
        sink.outcomes()[0].failure_message().unwrap(),
        "Bulkhead Rejection: 500"
    );
}

#[tokio::test]
async fn too_many_requests_is_unexpected() {
    let server = server_returning(429, 1).await;
    let sink = CollectingSink::default();

    probe_for(&server).run_iteration(&sink).await;

    assert_eq!(
        sink.outcomes()[0].failure_message().unwrap(),
        "Unexpected status: 429"
    );
}

#[tokio::test]
async fn each_iteration_hits_the_endpoint_exactly_once() {
    let server = server_returning(503, 5).await;
    let sink = CollectingSink::default();
    let probe = probe_for(&server);

    for _ in 0..5 {
        probe.run_iteration(&sink).await;
    }

    let outcomes = sink.outcomes();
    assert_eq!(outcomes.len(), 5);
    assert!(outcomes.iter().all(|o| *o == Outcome::BulkheadRejection(503)));

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.iter().all(|r| r.url.path() == "/app/api/products"));
}

#[tokio::test]
async fn response_body_is_drained_before_classifying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fallback products"))
        .mount(&server)
        .await;

    let probe = probe_for(&server);
    for _ in 0..3 {
        assert_eq!(probe.run_once().await.outcome, Outcome::Success);
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ProbeConfig {
        host: format!("http://127.0.0.1:{}", port),
        ..Default::default()
    };
    let probe = BulkheadProbe::new(build_client(), &config).unwrap();

    let sample = probe.run_once().await;
    assert_eq!(sample.outcome, Outcome::Transport(TransportError::Connect));
    assert_eq!(sample.outcome.status_key(), "REQUEST_ERROR");
}

#[tokio::test]
async fn slow_response_past_the_timeout_is_a_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/api/products"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = ProbeConfig {
        host: server.uri(),
        timeout_ms: Some(50),
        ..Default::default()
    };
    let probe = BulkheadProbe::new(build_client(), &config).unwrap();

    let sample = probe.run_once().await;
    assert_eq!(sample.outcome, Outcome::Transport(TransportError::Timeout));
    assert_eq!(sample.outcome.failure_message().unwrap(), "Timeout");
}

use apds::{
    backend::{
        AssessmentBackend, BackendErrorKind, CredentialRef, HttpBackend, HttpBackendConfig,
        TriageResponse,
    },
    guidance::{RiskBand, synthesize},
    observation::{PatientSearchInput, validate_observation},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

use super::triage_input;

/// Accepts one connection, answers with the canned response, and yields the
/// raw request text.
async fn serve_once(status_line: &str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let base_url = format!(
        "http://{}",
        listener.local_addr().expect("listener should have an address")
    );
    let status_line = status_line.to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("client should connect");
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("response should be written");
        let _ = stream.shutdown().await;
        request
    });

    (base_url, handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = stream.read(&mut chunk).await.expect("request should be readable");
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).to_string()
}

fn backend(base_url: &str, credential: CredentialRef) -> HttpBackend {
    HttpBackend::new(&HttpBackendConfig {
        base_url: format!("{base_url}/"),
        credential,
        timeout_ms: 5_000,
    })
    .expect("backend should build")
}

#[tokio::test]
async fn given_remote_assessment_when_triage_scored_then_body_is_decoded_and_auth_sent() {
    let observation = validate_observation(&triage_input()).expect("input should validate");
    let expected = TriageResponse::new(
        observation.clone(),
        synthesize(&observation, 0.42).expect("synthesis should succeed"),
    );
    let body = serde_json::to_string(&expected).expect("response should encode");
    let (base_url, server) = serve_once("200 OK", body).await;

    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var("APDS_TEST_HTTP_BACKEND_PASSWORD", "s3cret") };
    let backend = backend(
        &base_url,
        CredentialRef::Env {
            username: "apds".to_string(),
            password_var: "APDS_TEST_HTTP_BACKEND_PASSWORD".to_string(),
        },
    );
    assert_eq!(backend.base_url(), base_url);

    let response = backend
        .triage_score(observation)
        .await
        .expect("remote triage should succeed");
    let request = server.await.expect("server task should finish");

    assert_eq!(response, expected);
    assert!(request.starts_with("POST /triage-score HTTP/1.1"), "{request}");
    assert!(
        request
            .to_ascii_lowercase()
            .contains("authorization: basic yxbkczpzm2nyzxq="),
        "{request}"
    );
    assert!(request.contains("\"bloodPressure\":\"120/80\""), "{request}");
}

#[tokio::test]
async fn given_minimal_remote_triage_body_when_scored_then_assessment_is_completed() {
    let body = serde_json::json!({
        "triage_input": triage_input(),
        "score": 0.55,
        "summary": "Based on the provided vitals, the patient (35, Female) presenting with \"atypical chest pain\" has a calculated disparity risk score of 0.55.",
        "echartsOption": {"series": [{"type": "gauge", "data": [{"value": 0.55, "name": "Disparity Risk"}]}]},
        "expert_guidance": "This is a mocked clinical tip."
    });
    let (base_url, server) = serve_once("200 OK", body.to_string()).await;
    let backend = backend(&base_url, CredentialRef::None);
    let observation = validate_observation(&triage_input()).expect("input should validate");

    let response = backend
        .triage_score(observation.clone())
        .await
        .expect("remote triage should decode");
    server.await.expect("server task should finish");

    assert_eq!(response.triage_input, observation);
    assert_eq!(response.assessment.score, 0.55);
    assert_eq!(response.assessment.band, RiskBand::Moderate);
    assert_eq!(response.expert_guidance, "This is a mocked clinical tip.");
    assert_eq!(response.echarts_option["series"][0]["data"][0]["value"], 0.55);
}

#[tokio::test]
async fn given_remote_summary_without_sections_when_searched_then_html_is_kept() {
    let body = serde_json::json!({
        "patient_id": "MRN-7",
        "summary": "<h3>MHRS-E Summary for Patient ID: MRN-7</h3>"
    });
    let (base_url, server) = serve_once("200 OK", body.to_string()).await;
    let backend = backend(&base_url, CredentialRef::None);

    let summary = backend
        .patient_summary(PatientSearchInput {
            patient_id: "MRN-7".to_string(),
        })
        .await
        .expect("remote summary should decode");
    server.await.expect("server task should finish");

    assert!(summary.sections.is_empty());
    assert!(summary.summary.contains("MRN-7"));
}

#[tokio::test]
async fn given_error_detail_when_backend_rejects_then_detail_is_surfaced() {
    let (base_url, server) = serve_once(
        "422 Unprocessable Entity",
        r#"{"detail":"patientId not found"}"#.to_string(),
    )
    .await;
    let backend = backend(&base_url, CredentialRef::None);

    let err = backend
        .patient_summary(PatientSearchInput {
            patient_id: "missing".to_string(),
        })
        .await
        .expect_err("422 should fail");
    let request = server.await.expect("server task should finish");

    assert_eq!(err.kind, BackendErrorKind::Http);
    assert_eq!(err.message, "patientId not found");
    assert_eq!(err.http_status, Some(422));
    assert!(!request.to_ascii_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn given_plain_server_error_when_backend_fails_then_status_line_is_surfaced() {
    let (base_url, server) =
        serve_once("500 Internal Server Error", "upstream crashed".to_string()).await;
    let backend = backend(&base_url, CredentialRef::None);
    let observation = validate_observation(&triage_input()).expect("input should validate");

    let err = backend
        .triage_score(observation)
        .await
        .expect_err("500 should fail");
    server.await.expect("server task should finish");

    assert_eq!(err.message, "API Error: 500 Internal Server Error");
    assert_eq!(err.endpoint.as_deref(), Some("/triage-score"));
}

#[tokio::test]
async fn given_unexpected_body_when_backend_answers_then_protocol_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"score":"high"}"#.to_string()).await;
    let backend = backend(&base_url, CredentialRef::None);
    let observation = validate_observation(&triage_input()).expect("input should validate");

    let err = backend
        .triage_score(observation)
        .await
        .expect_err("malformed body should fail");
    server.await.expect("server task should finish");

    assert_eq!(err.kind, BackendErrorKind::Protocol);
}

#[tokio::test]
async fn given_unreachable_backend_when_called_then_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    drop(listener);
    let backend = backend(&format!("http://{address}"), CredentialRef::None);

    let err = backend
        .patient_summary(PatientSearchInput {
            patient_id: "synthetic-id-123".to_string(),
        })
        .await
        .expect_err("closed port should fail");

    assert_eq!(err.kind, BackendErrorKind::Transport);
}

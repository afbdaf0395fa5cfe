use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{
    backend::build_backend,
    config::Config,
    protocol::{ClientRequest, ResponseKind, ServerResponse, parse_client_request},
    service::AssessmentService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExitMessage,
    EndOfInput,
    Signal(&'static str),
}

/// Serves NDJSON requests from stdin until `exit`, end of input, or Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let backend =
        build_backend(&config.backend).context("failed to construct assessment backend")?;
    let service = AssessmentService::new(backend);
    tracing::info!(target: "server", backend = service.backend_name(), "server_started");

    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    let reason = tokio::select! {
        result = serve(&service, reader, writer) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("unable to listen for Ctrl+C")?;
            ExitReason::Signal("SIGINT")
        }
    };

    tracing::info!(target: "server", reason = ?reason, "server_stopped");
    Ok(())
}

/// Handles one request at a time; a malformed line yields an error response
/// and the loop keeps going.
pub async fn serve<R, W>(service: &AssessmentService, reader: R, mut writer: W) -> Result<ExitReason>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read request line")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match parse_client_request(line) {
            Ok(ClientRequest::Exit) => return Ok(ExitReason::ExitMessage),
            Ok(request) => dispatch(service, request).await,
            Err(err) => {
                tracing::warn!(target: "server", error = %err, "invalid_request_line");
                ServerResponse::protocol_error(format!("invalid request: {err}"))
            }
        };
        write_response(&mut writer, &response).await?;
    }

    Ok(ExitReason::EndOfInput)
}

async fn dispatch(service: &AssessmentService, request: ClientRequest) -> ServerResponse {
    let outcome = match request {
        ClientRequest::TriageScore(input) => service
            .submit_triage(&input)
            .await
            .map(|body| ServerResponse::ok(ResponseKind::TriageScore, &body)),
        ClientRequest::PatientSummary(input) => service
            .submit_patient_search(&input)
            .await
            .map(|body| ServerResponse::ok(ResponseKind::PatientSummary, &body)),
        ClientRequest::ExploreEquity(input) => service
            .submit_equity(&input)
            .await
            .map(|body| ServerResponse::ok(ResponseKind::ExploreEquity, &body)),
        ClientRequest::Diagnostics => service
            .run_diagnostics()
            .await
            .map(|body| ServerResponse::ok(ResponseKind::Diagnostics, &body)),
        ClientRequest::Exit => return ServerResponse::protocol_error("exit is not dispatchable"),
    };
    outcome.unwrap_or_else(ServerResponse::from_service_error)
}

async fn write_response<W>(writer: &mut W, response: &ServerResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response).context("failed to encode response")?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .context("failed to write response")?;
    writer.flush().await.context("failed to flush response")
}

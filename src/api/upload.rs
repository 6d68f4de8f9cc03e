//! Bulk upload endpoints: multipart CSV/XLSX import and its progress stream.

use std::convert::Infallible;
use std::time::Duration;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use futures_util::{Stream, StreamExt, stream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Part, ProgressEvent, ProgressQuery, UploadQuery, UploadResponse};
use crate::services::parser::{FileKind, parse_file_content};
use crate::services::{BatchProcessor, ProgressHub};

/// Multipart field carrying the spreadsheet.
const FILE_FIELD: &str = "file";

/// Silence after which the progress stream sends a comment line.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Import parts from a CSV or spreadsheet.
///
/// Every data row is validated and imported independently. The response is
/// 200 when all rows were imported and 207 when some failed; failed rows are
/// listed with their spreadsheet row number.
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    tag = "Upload",
    params(UploadQuery),
    request_body(
        content_type = "multipart/form-data",
        description = "Form with a `file` field (xlsx, xls or csv)"
    ),
    responses(
        (status = 200, description = "All rows imported", body = UploadResponse),
        (status = 207, description = "Some rows failed", body = UploadResponse),
        (status = 400, description = "No file, unsupported type or file too large", body = crate::error::UnsupportedFileTypeResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 500, description = "File could not be parsed", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn upload_parts(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    processor: web::Data<BatchProcessor>,
    hub: web::Data<ProgressHub>,
    query: web::Query<UploadQuery>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let user = pool.session_user(auth.user_id).await?;

    let upload_id = query.upload_id.unwrap_or_else(Uuid::now_v7);
    let (kind, bytes) = read_file_field(&mut payload, config.upload.max_upload_size).await?;

    info!(
        upload_id = %upload_id,
        user = %user.email,
        size = bytes.len(),
        kind = ?kind,
        "Processing upload"
    );

    let reporter = hub.reporter(upload_id);
    let rows = match parse_file_content(&bytes, kind) {
        Ok(rows) => rows,
        Err(e) => {
            reporter.failed(e.to_string());
            return Err(e);
        }
    };

    let outcome = processor.process(&rows, Some(&reporter)).await;

    let (status, message) = if outcome.all_succeeded() {
        (StatusCode::OK, "File processed successfully")
    } else {
        (StatusCode::MULTI_STATUS, "File processed with some errors")
    };

    let response = UploadResponse {
        message: message.to_string(),
        upload_id,
        summary: outcome.summary,
        processed_parts: outcome.parts.into_iter().map(Part::from).collect(),
    };

    Ok(HttpResponse::build(status).json(response))
}

/// Pull the `file` field out of the form, checking its declared type before
/// reading and its size while reading. Other fields are drained and ignored.
async fn read_file_field(
    payload: &mut Multipart,
    max_size: usize,
) -> AppResult<(FileKind, Vec<u8>)> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        if field.name() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            }
            continue;
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        let kind = FileKind::from_mime(&content_type).ok_or_else(|| {
            warn!(content_type = %content_type, "Rejected upload file type");
            AppError::UnsupportedFileType { content_type }
        })?;

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            if data.len() + chunk.len() > max_size {
                return Err(AppError::InvalidInput(format!(
                    "File exceeds maximum upload size of {} bytes",
                    max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        return Ok((kind, data));
    }

    Err(AppError::NoFileProvided)
}

/// Stream upload progress as Server-Sent Events.
///
/// Each event is sent as `event: progress` with a JSON payload. The stream
/// ends after a `completed` or `error` event.
#[utoipa::path(
    get,
    path = "/api/v1/upload/progress",
    tag = "Upload",
    params(ProgressQuery),
    responses(
        (status = 200, description = "text/event-stream of progress events", body = ProgressEvent, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn upload_progress(
    _auth: SessionAuth,
    hub: web::Data<ProgressHub>,
    query: web::Query<ProgressQuery>,
) -> HttpResponse {
    let (latest, receiver) = hub.subscribe(query.upload_id);
    debug!(upload_id = %query.upload_id, "Progress subscriber connected");

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(progress_stream(latest, receiver, KEEP_ALIVE_INTERVAL))
}

struct StreamState {
    pending: Option<ProgressEvent>,
    receiver: broadcast::Receiver<ProgressEvent>,
    keep_alive: Duration,
    finished: bool,
}

/// SSE frames for one subscriber: the replayed latest event (if any), then
/// live events, with a comment line after each `keep_alive` of silence.
pub(crate) fn progress_stream(
    latest: Option<ProgressEvent>,
    receiver: broadcast::Receiver<ProgressEvent>,
    keep_alive: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> + 'static {
    let state = StreamState {
        pending: latest,
        receiver,
        keep_alive,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        if let Some(event) = state.pending.take() {
            state.finished = event.status.is_terminal();
            return Some((Ok(sse_frame(&event)), state));
        }

        loop {
            match tokio::time::timeout(state.keep_alive, state.receiver.recv()).await {
                Err(_) => return Some((Ok(Bytes::from_static(b": keep-alive\n\n")), state)),
                Ok(Ok(event)) => {
                    state.finished = event.status.is_terminal();
                    return Some((Ok(sse_frame(&event)), state));
                }
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    debug!(skipped, "Progress subscriber lagged");
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => return None,
            }
        }
    })
}

fn sse_frame(event: &ProgressEvent) -> Bytes {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Bytes::from(format!("event: progress\ndata: {}\n\n", data))
}

/// Configure upload routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/upload").route(web::post().to(upload_parts)))
        .service(web::resource("/upload/progress").route(web::get().to(upload_progress)));
}

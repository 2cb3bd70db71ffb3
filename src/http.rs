//! HTTP upload endpoint
//!
//! Serves a small upload form and accepts `multipart/form-data` posts with a
//! `csvFile` part and an `outputFormat` field (`json` or `txt`). The response
//! is the ZIP archive as an attachment, or a plain-text 400 explaining why the
//! upload was rejected.
//!
//! # Example
//!
//! ```no_run
//! use csvzip::config::ServerConfig;
//! use csvzip::http::router;
//!
//! # async fn run() -> std::io::Result<()> {
//! let config = ServerConfig::default();
//! let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//! axum::serve(listener, router(&config)).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ServerConfig;
use crate::converter::convert;
use crate::error::ConvertError;
use crate::types::{ConvertedArchive, Upload};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, info};

/// Multipart part holding the CSV file
pub const FILE_FIELD: &str = "csvFile";
/// Multipart field selecting the output format
pub const FORMAT_FIELD: &str = "outputFormat";

const UPLOAD_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>CSV to ZIP</title></head>
<body>
<h1>Convert CSV rows</h1>
<form method="post" action="/upload" enctype="multipart/form-data">
  <p><input type="file" name="csvFile" accept=".csv" required></p>
  <p>
    <label for="outputFormat">Output format</label>
    <select id="outputFormat" name="outputFormat">
      <option value="json">JSON</option>
      <option value="txt">Text</option>
    </select>
  </p>
  <p><button type="submit">Convert</button></p>
</form>
</body>
</html>
"#;

/// Build the application router
pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(upload_form))
        .route("/upload", get(upload_form).post(upload_csv))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
}

async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

async fn upload_csv(mut multipart: Multipart) -> Result<Response, Response> {
    let mut upload = Upload::default();
    let mut output_format: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_rejection)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            FILE_FIELD => {
                upload.file_name = field.file_name().unwrap_or("").to_string();
                upload.data = field.bytes().await.map_err(multipart_rejection)?.to_vec();
            }
            FORMAT_FIELD => {
                output_format = Some(field.text().await.map_err(multipart_rejection)?);
            }
            _ => {}
        }
    }

    match convert(&upload, output_format.as_deref()) {
        Ok(archive) => {
            info!(
                "Converted {} into {} ({} entries)",
                upload.file_name, archive.file_name, archive.entry_count
            );
            Ok(archive_response(archive))
        }
        Err(e) => {
            if e.is_client_error() {
                info!("Rejected upload {:?}: {}", upload.file_name, e);
            } else {
                error!("Failed to convert {}: {}", upload.file_name, e);
            }
            Err(e.into_response())
        }
    }
}

fn multipart_rejection(e: MultipartError) -> Response {
    info!("Rejected multipart body: {}", e);
    (e.status(), e.body_text()).into_response()
}

fn archive_response(archive: ConvertedArchive) -> Response {
    (
        [
            (header::CONTENT_TYPE, archive.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&archive.file_name),
            ),
        ],
        archive.data,
    )
        .into_response()
}

/// `attachment` disposition with a header-safe file name
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            (StatusCode::BAD_REQUEST, self.to_string()).into_response()
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build archive.").into_response()
        }
    }
}

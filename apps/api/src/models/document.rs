use serde::Serialize;

/// Response body of `POST /upload`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub filename: String,
    pub text_length: usize,
    pub pages: usize,
}

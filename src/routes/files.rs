use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::AppResult, state::AppState};

/// Serve a stored blob back to whoever holds its URL. The URL embeds the
/// order number, which is the customer's proof of ownership; there is no
/// additional authentication on retrieval.
pub async fn get_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<Response> {
    let bytes = state.store.get(&path).await?;
    let name = path.rsplit('/').next().unwrap_or("download");
    let disposition = format!("attachment; filename=\"{name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

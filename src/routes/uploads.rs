use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::uploads::{PublicShop, UploadReceipt},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::upload_service::{self, UploadFile},
    state::AppState,
};

// Anonymous routes: this is where scanned QR codes land.
pub fn router() -> Router<AppState> {
    Router::new().route("/{shop_id}", get(shop_info).post(upload_files))
}

#[utoipa::path(
    get,
    path = "/api/upload/{shop_id}",
    params(
        ("shop_id" = Uuid, Path, description = "Shop ID from the scanned QR code"),
    ),
    responses(
        (status = 200, description = "Shop accepting uploads", body = ApiResponse<PublicShop>),
        (status = 404, description = "Invalid or expired QR code"),
    ),
    tag = "Upload"
)]
pub async fn shop_info(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicShop>>> {
    let resp = upload_service::public_shop(&state, shop_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/upload/{shop_id}",
    params(
        ("shop_id" = Uuid, Path, description = "Shop ID from the scanned QR code"),
    ),
    responses(
        (status = 200, description = "All files stored as one pending order", body = ApiResponse<UploadReceipt>),
        (status = 400, description = "No files selected"),
        (status = 404, description = "Invalid or expired QR code"),
    ),
    tag = "Upload"
)]
pub async fn upload_files(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadReceipt>>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        // Non-file fields are ignored.
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        files.push(UploadFile {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let resp = upload_service::create_order(&state, shop_id, files).await?;
    Ok(Json(resp))
}

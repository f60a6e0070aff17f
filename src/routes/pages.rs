//! The handful of server-rendered pages: the marketing landing page, the
//! customer upload page every QR code points at, and the 404 fallback.
//! Styling is intentionally minimal; the dashboard frontend lives elsewhere.

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{entity::shops::Entity as Shops, state::AppState};

const LANDING_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>PrintDrop</title></head>
<body>
  <h1>PrintDrop</h1>
  <p>Hang a QR code at your counter. Customers scan it and their files land
  in your dashboard as orders &mdash; no email attachments, no USB sticks.</p>
  <ul>
    <li>One QR code per shop, printable and customizable</li>
    <li>Orders move through pending, processing, completed and archived</li>
    <li>The dashboard updates live as uploads arrive</li>
  </ul>
  <p><a href="/docs">API documentation</a></p>
</body>
</html>"#;

const SHOP_NOT_FOUND_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Shop Not Found</title></head>
<body>
  <h1>Shop Not Found</h1>
  <p>This QR code may be invalid or expired.</p>
</body>
</html>"#;

const NOT_FOUND_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Page Not Found</title></head>
<body>
  <h1>Page Not Found</h1>
  <p>There is nothing here. <a href="/">Back to the start.</a></p>
</body>
</html>"#;

pub async fn landing() -> Html<&'static str> {
    Html(LANDING_HTML)
}

/// The anonymous upload page. Must resolve without authentication; this
/// URL is what the printed QR codes encode.
pub async fn upload_page(State(state): State<AppState>, Path(shop_id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&shop_id) else {
        return (StatusCode::NOT_FOUND, Html(SHOP_NOT_FOUND_HTML)).into_response();
    };
    let shop = match Shops::find_by_id(id).one(&state.orm).await {
        Ok(Some(shop)) => shop,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Html(SHOP_NOT_FOUND_HTML)).into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "upload page shop lookup failed");
            return (StatusCode::NOT_FOUND, Html(SHOP_NOT_FOUND_HTML)).into_response();
        }
    };

    let name = escape(&shop.name);
    let page = format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Upload Files</title></head>
<body>
  <h1>Upload Files</h1>
  <p>to {name}</p>
  <form action="/api/upload/{id}" method="post" enctype="multipart/form-data">
    <input type="file" name="files" multiple required>
    <button type="submit">Upload</button>
  </form>
  <p>Your files will be securely uploaded and the shop owner will be notified.</p>
</body>
</html>"#
    );
    Html(page).into_response()
}

pub async fn not_found(_uri: Uri) -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_names_are_html_escaped() {
        assert_eq!(escape("A & B <Print>"), "A &amp; B &lt;Print&gt;");
    }
}

//! Anonymous upload session: a batch of customer files becomes blobs plus
//! exactly one pending order, or nothing at all.

use chrono::Utc;
use rand::Rng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::uploads::{PublicShop, UploadReceipt},
    entity::{
        orders::ActiveModel as OrderActive,
        shops::Entity as Shops,
    },
    error::{AppError, AppResult},
    lifecycle::OrderStatus,
    models::FileRecord,
    response::{ApiResponse, Meta},
    state::AppState,
    storage::{self, BlobStore},
};

/// One file as received from the customer, fully buffered.
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The short, human-typeable code a customer quotes at the counter: last 4
/// digits of the millisecond clock plus 3 random base-36 characters. Low
/// collision odds, no uniqueness guarantee; it is display-only and never a
/// lookup key.
pub fn generate_order_number() -> String {
    const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..3)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("{:04}{}", millis % 10_000, suffix)
}

/// Keep only the final path component of a client-supplied file name.
pub fn sanitize_file_name(name: &str) -> AppResult<String> {
    let name = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::BadRequest("Invalid file name".to_string()));
    }
    Ok(name)
}

/// Sequential per-file upload with coarse progress. Each session gets a
/// fresh order number; "upload more" is a brand-new session.
pub struct UploadSession {
    shop_id: Uuid,
    order_number: String,
    progress: f64,
}

impl UploadSession {
    pub fn new(shop_id: Uuid) -> Self {
        Self {
            shop_id,
            order_number: generate_order_number(),
            progress: 0.0,
        }
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    /// Percentage of files fully uploaded, `(done / total) * 100`. Whole
    /// files only; bytes in flight do not move it.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Upload every file, strictly one after another. Any failure aborts
    /// the session: no records are returned and blobs already written are
    /// left behind without compensation.
    pub async fn run(
        &mut self,
        store: &dyn BlobStore,
        files: &[UploadFile],
    ) -> AppResult<Vec<FileRecord>> {
        if files.is_empty() {
            return Err(AppError::BadRequest(
                "Please select at least one file".to_string(),
            ));
        }

        let total = files.len();
        let mut records = Vec::with_capacity(total);
        for (i, file) in files.iter().enumerate() {
            let name = sanitize_file_name(&file.name)?;
            let path = storage::upload_path(self.shop_id, &self.order_number, &name);
            let url = store.put(&path, &file.bytes).await?;

            records.push(FileRecord {
                id: format!("{}-{}", Utc::now().timestamp_millis(), i),
                name,
                size: file.bytes.len() as i64,
                content_type: file.content_type.clone(),
                url,
                path,
            });

            self.progress = (records.len() as f64 / total as f64) * 100.0;
            tracing::debug!(
                order_number = %self.order_number,
                progress = self.progress,
                "upload progress"
            );
        }

        Ok(records)
    }
}

/// What the scanned-QR landing flow may learn about a shop. An unknown id
/// is a hard not-found, rendered as its own page rather than a toast.
pub async fn public_shop(state: &AppState, shop_id: Uuid) -> AppResult<ApiResponse<PublicShop>> {
    let shop = Shops::find_by_id(shop_id).one(&state.orm).await?;
    match shop {
        Some(shop) => Ok(ApiResponse::success(
            "Ok",
            PublicShop {
                id: shop.id,
                name: shop.name,
            },
            Some(Meta::empty()),
        )),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_order(
    state: &AppState,
    shop_id: Uuid,
    files: Vec<UploadFile>,
) -> AppResult<ApiResponse<UploadReceipt>> {
    // Validation happens before any I/O.
    if files.is_empty() {
        return Err(AppError::BadRequest(
            "Please select at least one file".to_string(),
        ));
    }

    let shop = Shops::find_by_id(shop_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut session = UploadSession::new(shop.id);
    let records = session.run(state.store.as_ref(), &files).await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop.id),
        order_number: Set(session.order_number().to_string()),
        files: Set(serde_json::to_value(&records)?),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        deleted: Set(false),
        completed_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_created",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "order_number": order.order_number,
            "files": records.len(),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.changes.orders_changed(Some(shop.owner_id));

    Ok(ApiResponse::success(
        "Files uploaded successfully",
        UploadReceipt {
            order_id: order.id,
            order_number: order.order_number,
            files: records.len(),
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::{FailingBlobStore, MemoryBlobStore};

    fn file(name: &str, bytes: &[u8]) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            content_type: "application/octet-stream".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn order_numbers_are_4_digits_then_3_uppercase_alphanumerics() {
        for _ in 0..200 {
            let number = generate_order_number();
            assert_eq!(number.len(), 7, "{number}");
            assert!(number[..4].bytes().all(|b| b.is_ascii_digit()), "{number}");
            assert!(
                number[4..]
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
                "{number}"
            );
        }
    }

    #[test]
    fn file_names_lose_their_directories() {
        assert_eq!(sanitize_file_name("doc.pdf").unwrap(), "doc.pdf");
        assert_eq!(sanitize_file_name("a/b/doc.pdf").unwrap(), "doc.pdf");
        assert_eq!(sanitize_file_name("C:\\tmp\\doc.pdf").unwrap(), "doc.pdf");
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name("a/..").is_err());
    }

    #[tokio::test]
    async fn session_uploads_every_file_in_order() {
        let store = MemoryBlobStore::default();
        let shop_id = Uuid::new_v4();
        let mut session = UploadSession::new(shop_id);
        let files = vec![file("doc.pdf", b"pdf"), file("image.png", b"png")];

        let records = session.run(&store, &files).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "doc.pdf");
        assert_eq!(records[1].name, "image.png");
        assert_eq!(records[0].size, 3);
        let expected = storage::upload_path(shop_id, session.order_number(), "doc.pdf");
        assert_eq!(records[0].path, expected);
        assert!(store.contains(&expected));
        assert_eq!(session.progress(), 100.0);
    }

    #[tokio::test]
    async fn empty_file_list_is_rejected_before_any_io() {
        let store = MemoryBlobStore::default();
        let mut session = UploadSession::new(Uuid::new_v4());
        assert!(session.run(&store, &[]).await.is_err());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn a_mid_session_failure_yields_no_records() {
        let store = FailingBlobStore::new(1);
        let mut session = UploadSession::new(Uuid::new_v4());
        let files = vec![file("one.pdf", b"1"), file("two.pdf", b"2"), file("three.pdf", b"3")];

        let result = session.run(&store, &files).await;

        assert!(result.is_err());
        // The blob written before the failure stays behind; that leak is
        // accepted as long as no order references it.
        assert_eq!(store.inner.len(), 1);
    }

    #[tokio::test]
    async fn each_session_gets_its_own_order_number() {
        let a = UploadSession::new(Uuid::new_v4());
        let b = UploadSession::new(Uuid::new_v4());
        // Same millisecond is possible; the random suffix still separates
        // them in all but 1/46656 runs. Keep the assertion loose.
        assert_eq!(a.order_number().len(), 7);
        assert_eq!(b.order_number().len(), 7);
    }
}

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::shops::{CreateShopRequest, QrImage, ShopList},
    entity::shops::{ActiveModel as ShopActive, Column as ShopCol, Entity as Shops, Model as ShopModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Shop,
    qr::{self, QrOptions},
    response::{ApiResponse, Meta},
    routes::params::QrQuery,
    state::AppState,
};

pub async fn list_shops(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ShopList>> {
    let shops = Shops::find()
        .filter(ShopCol::OwnerId.eq(user.user_id))
        .order_by_asc(ShopCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(shop_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ShopList { items: shops },
        Some(Meta::empty()),
    ))
}

pub async fn create_shop(
    state: &AppState,
    user: &AuthUser,
    payload: CreateShopRequest,
) -> AppResult<ApiResponse<Shop>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Please enter a shop name".to_string()));
    }

    let shop = ShopActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        owner_id: Set(user.user_id),
        qr_code_url: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    // The QR step runs after the shop row exists. A failure here leaves the
    // shop without a code instead of rolling back the creation; the field
    // is optional for exactly that window.
    let shop = match qr::data_url(&upload_url(state, shop.id), &QrOptions::default()) {
        Ok(data_url) => {
            let mut active: ShopActive = shop.into();
            active.qr_code_url = Set(Some(data_url));
            active.update(&state.orm).await?
        }
        Err(err) => {
            tracing::warn!(shop_id = %shop.id, error = %err, "qr generation failed");
            shop
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "shop_created",
        Some("shops"),
        Some(serde_json::json!({ "shop_id": shop.id, "name": shop.name })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.changes.shops_changed(user.user_id);

    Ok(ApiResponse::success(
        "Shop created",
        shop_from_entity(shop),
        Some(Meta::empty()),
    ))
}

/// Designer variant: re-render the shop's QR with caller-chosen colors and
/// size, without touching the stored default code.
pub async fn design_qr(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    query: QrQuery,
) -> AppResult<ApiResponse<QrImage>> {
    let shop = find_owned_shop(state, user, id).await?;

    let opts = QrOptions {
        width: query.width.unwrap_or(512),
        margin: query.margin.unwrap_or(2),
        dark: query.dark.unwrap_or_else(|| "#000000".to_string()),
        light: query.light.unwrap_or_else(|| "#ffffff".to_string()),
    };
    let data_url = qr::data_url(&upload_url(state, shop.id), &opts)?;

    Ok(ApiResponse::success(
        "Ok",
        QrImage { data_url },
        Some(Meta::empty()),
    ))
}

/// Shops are visible to their owner only; anyone else gets the same 404 a
/// nonexistent id would.
pub async fn find_owned_shop(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ShopModel> {
    let shop = Shops::find_by_id(id).one(&state.orm).await?;
    match shop {
        Some(shop) if shop.owner_id == user.user_id => Ok(shop),
        _ => Err(AppError::NotFound),
    }
}

fn upload_url(state: &AppState, shop_id: Uuid) -> String {
    format!("{}/upload/{}", state.config.public_base_url(), shop_id)
}

pub fn shop_from_entity(model: ShopModel) -> Shop {
    Shop {
        id: model.id,
        name: model.name,
        owner_id: model.owner_id,
        qr_code_url: model.qr_code_url,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

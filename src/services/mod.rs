pub mod auth_service;
pub mod order_service;
pub mod shop_service;
pub mod upload_service;

//! 供应驱动路由模块

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{
    create_database, delete_database, get_info, grant_access, health_check, list_databases,
    revoke_access,
};
use crate::state::AppState;

/// 创建驱动 RPC 路由
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/databases", get(list_databases).post(create_database))
        .route("/api/databases/{database_id}", delete(delete_database))
        .route("/api/databases/{database_id}/access", post(grant_access))
        .route(
            "/api/databases/{database_id}/access/{account_id}",
            delete(revoke_access),
        )
        .route("/api/info", get(get_info))
        .route("/api/health", get(health_check))
}

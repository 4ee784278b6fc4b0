//! Handler模块

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use common::errors::AppError;
use common::middleware::RequestId;
use common::models::{
    CreateDatabaseRequest, CreateDatabaseResponse, CredentialBundle, GrantAccessRequest,
    ProviderInfo,
};
use common::response::ApiResponse;

use crate::state::AppState;

fn envelope<T: Serialize>(
    state: &AppState,
    request_id: &RequestId,
    data: T,
) -> Json<ApiResponse<T>> {
    Json(
        ApiResponse::ok(data)
            .with_service(state.config.service_name.clone())
            .with_request_id(request_id.as_str()),
    )
}

fn empty(state: &AppState, request_id: &RequestId) -> Json<ApiResponse<()>> {
    Json(
        ApiResponse::success()
            .with_service(state.config.service_name.clone())
            .with_request_id(request_id.as_str()),
    )
}

/// 创建数据库
#[utoipa::path(
    post,
    path = "/api/databases",
    tag = "databases",
    request_body = CreateDatabaseRequest,
    responses(
        (status = 200, description = "数据库已创建", body = ApiResponse<CreateDatabaseResponse>),
        (status = 400, description = "名称非法"),
        (status = 409, description = "数据库已存在")
    )
)]
pub async fn create_database(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<CreateDatabaseRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CreateDatabaseResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    tracing::info!(name = %req.name, "Create database");
    let database_id = state.lifecycle.create_database(&req.name).await?;
    Ok(envelope(&state, &request_id, CreateDatabaseResponse { database_id }))
}

/// 列出所有数据库
#[utoipa::path(
    get,
    path = "/api/databases",
    tag = "databases",
    responses(
        (status = 200, description = "数据库列表", body = ApiResponse<Vec<String>>)
    )
)]
pub async fn list_databases(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let names = state.lifecycle.list_databases().await?;
    Ok(envelope(&state, &request_id, names))
}

/// 删除数据库
#[utoipa::path(
    delete,
    path = "/api/databases/{database_id}",
    tag = "databases",
    params(
        ("database_id" = String, Path, description = "数据库 ID")
    ),
    responses(
        (status = 200, description = "数据库已删除"),
        (status = 404, description = "数据库未找到")
    )
)]
pub async fn delete_database(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(database_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    tracing::info!(name = %database_id, "Delete database");
    state.lifecycle.delete_database(&database_id).await?;
    Ok(empty(&state, &request_id))
}

/// 授予数据库访问权限
///
/// 返回的是共享的管理员凭据，并非按主体生成。
#[utoipa::path(
    post,
    path = "/api/databases/{database_id}/access",
    tag = "access",
    params(
        ("database_id" = String, Path, description = "数据库 ID")
    ),
    request_body = GrantAccessRequest,
    responses(
        (status = 200, description = "凭据", body = ApiResponse<CredentialBundle>)
    )
)]
pub async fn grant_access(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(database_id): Path<String>,
    body: Result<Option<Json<GrantAccessRequest>>, JsonRejection>,
) -> Result<Json<ApiResponse<CredentialBundle>>, AppError> {
    let account_name = body?.and_then(|Json(req)| req.account_name);
    tracing::info!(name = %database_id, account = ?account_name, "Grant access");
    let bundle = state.credentials.grant_access(&database_id)?;
    Ok(envelope(&state, &request_id, bundle))
}

/// 撤销数据库访问权限（空操作）
#[utoipa::path(
    delete,
    path = "/api/databases/{database_id}/access/{account_id}",
    tag = "access",
    params(
        ("database_id" = String, Path, description = "数据库 ID"),
        ("account_id" = String, Path, description = "账户 ID")
    ),
    responses(
        (status = 200, description = "始终成功")
    )
)]
pub async fn revoke_access(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((database_id, account_id)): Path<(String, String)>,
) -> Json<ApiResponse<()>> {
    state.credentials.revoke_access(&database_id, &account_id);
    empty(&state, &request_id)
}

/// 驱动身份信息
#[utoipa::path(
    get,
    path = "/api/info",
    tag = "identity",
    responses(
        (status = 200, description = "驱动名称", body = ApiResponse<ProviderInfo>),
        (status = 400, description = "驱动名称为空")
    )
)]
pub async fn get_info(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ProviderInfo>>, AppError> {
    let info = state.identity.get_info()?;
    Ok(envelope(&state, &request_id, info))
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 服务名称
    pub service: String,
    /// 服务版本
    pub version: String,
    /// 当前时间戳
    pub timestamp: DateTime<Utc>,
}

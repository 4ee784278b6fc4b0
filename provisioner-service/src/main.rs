//! Postgres 数据库供应驱动服务
//!
//! 供编排器通过 RPC 调用，提供：
//! - 数据库的创建与删除
//! - 数据库访问凭据的授予与撤销
//! - 驱动身份信息

mod classifier;
mod connector;
mod credentials;
mod handlers;
mod identity;
mod lifecycle;
mod routes;
mod state;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use common::config::{load_dotenv, AppConfig, ListenAddr, LogFormat};
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "provisioner-service";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "数据库供应驱动 API",
        version = "0.1.0",
        description = "Postgres 数据库生命周期与访问凭据"
    ),
    paths(
        handlers::create_database,
        handlers::list_databases,
        handlers::delete_database,
        handlers::grant_access,
        handlers::revoke_access,
        handlers::get_info,
        handlers::health_check,
    ),
    components(schemas(
        common::models::CreateDatabaseRequest,
        common::models::CreateDatabaseResponse,
        common::models::GrantAccessRequest,
        common::models::CredentialBundle,
        common::models::CredentialDetails,
        common::models::ProviderInfo,
        handlers::HealthResponse,
    )),
    tags(
        (name = "databases", description = "数据库生命周期端点"),
        (name = "access", description = "访问凭据端点"),
        (name = "identity", description = "驱动身份端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME).context("加载配置失败")?;

    // 初始化日志追踪
    init_tracing(config.log_format);

    info!(
        provisioner = %config.provisioner_name,
        database = ?config.database,
        "配置已加载"
    );

    let listen_addr = config.listen_addr.clone();
    let app = create_router(AppState::new(config));

    // 启动服务
    info!(service = SERVICE_NAME, address = %listen_addr, "启动服务");
    match listen_addr {
        ListenAddr::Tcp(addr) => {
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("绑定地址失败: {}", addr))?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("服务运行失败")?;
        }
        #[cfg(unix)]
        ListenAddr::Unix(path) => {
            remove_stale_socket(&path)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建目录: {}", parent.display()))?;
            }
            let listener = tokio::net::UnixListener::bind(&path)
                .with_context(|| format!("绑定套接字失败: {}", path.display()))?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("服务运行失败")?;
        }
        #[cfg(not(unix))]
        ListenAddr::Unix(path) => {
            anyhow::bail!("unix sockets are not supported on this platform: {}", path.display());
        }
    }

    info!(service = SERVICE_NAME, "服务已停止");
    Ok(())
}

/// Removes a socket left behind by a previous run, which would make bind fail.
///
/// Anything at `path` that is not a socket is left alone and reported.
#[cfg(unix)]
fn remove_stale_socket(path: &std::path::Path) -> anyhow::Result<()> {
    use std::os::unix::fs::FileTypeExt;

    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("无法检查套接字路径: {}", path.display()))
        }
    };
    if !metadata.file_type().is_socket() {
        anyhow::bail!("DRIVER_ADDR 指向的不是套接字: {}", path.display());
    }
    std::fs::remove_file(path)
        .with_context(|| format!("无法删除旧的套接字: {}", path.display()))
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "无法监听 Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "无法监听 SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

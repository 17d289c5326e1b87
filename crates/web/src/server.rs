//! Web server implementation

use crate::static_files;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sentrybox_common::LauncherConfig;
use sentrybox_core::Provisioner;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<WebServerState>,
}

struct WebServerState {
    provisioner: Provisioner,
}

#[derive(Debug, Deserialize)]
struct InstallRequest {
    /// Optional manual OS hint; logged by the orchestrator, never used
    /// for dispatch.
    #[serde(default)]
    os: Option<String>,
}

impl WebServer {
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            state: Arc::new(WebServerState {
                provisioner: Provisioner::new(config),
            }),
        }
    }

    /// Create router
    pub fn router(&self) -> Router {
        Router::new()
            // Launcher page
            .route("/", get(index_handler))
            .route("/app.js", get(app_js_handler))
            // Health
            .route("/api/health", get(health_handler))
            // Orchestrator operations
            .route("/api/system", get(check_system_handler))
            .route("/api/os", get(os_info_handler))
            .route("/api/hypervisor/install", post(install_hypervisor_handler))
            .route("/api/appliance", get(appliance_handler))
            .route("/api/vm/import", post(import_handler))
            .route("/api/vm/start", post(start_handler))
            .route("/api/vm/stop", post(stop_handler))
            .route("/api/vm/status", get(vm_status_handler))
            .route("/api/vm/ip", get(guest_ip_handler))
            .route("/api/vm/ip/wait", get(wait_guest_ip_handler))
            .route("/api/credentials", get(credentials_handler))
            .fallback(not_found_handler)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!("SentryBox console starting on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn index_handler() -> impl IntoResponse {
    static_files::index()
}

async fn app_js_handler() -> impl IntoResponse {
    static_files::app_js()
}

async fn not_found_handler() -> impl IntoResponse {
    static_files::not_found()
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "sentrybox-web",
        "version": sentrybox_common::VERSION,
    }))
}

async fn check_system_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.check_hypervisor().await)
}

async fn os_info_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.os_info().await)
}

async fn install_hypervisor_handler(
    State(state): State<Arc<WebServerState>>,
    Json(req): Json<InstallRequest>,
) -> impl IntoResponse {
    Json(state.provisioner.install_hypervisor(req.os.as_deref()).await)
}

async fn appliance_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    let present = state.provisioner.appliance_present();
    Json(serde_json::json!({
        "present": present,
        "path": state.provisioner.config().appliance_path,
    }))
}

async fn import_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.import_appliance().await)
}

async fn start_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.start_vm().await)
}

async fn stop_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.stop_vm().await)
}

async fn vm_status_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.vm_check().await)
}

async fn guest_ip_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.guest_ip().await)
}

async fn wait_guest_ip_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.wait_for_guest_ip().await)
}

async fn credentials_handler(State(state): State<Arc<WebServerState>>) -> impl IntoResponse {
    Json(state.provisioner.credentials())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_server() -> WebServer {
        let mut config = LauncherConfig::default();
        // Point at a tool that cannot exist so nothing real is invoked
        config.hypervisor.command = "/nonexistent/VBoxManage".to_string();
        config.appliance_path = std::path::PathBuf::from("/nonexistent/appliance.ova");
        WebServer::new(config)
    }

    async fn get_json(router: Router, uri: &str) -> serde_json::Value {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let json = get_json(test_server().router(), "/api/health").await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "sentrybox-web");
    }

    #[tokio::test]
    async fn test_index_served() {
        let response = test_server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_vm_status_degrades_without_tool() {
        let json = get_json(test_server().router(), "/api/vm/status").await;
        assert_eq!(json["exists"], false);
        assert_eq!(json["running"], false);
        assert_eq!(json["logged_in"], false);
    }

    #[tokio::test]
    async fn test_credentials_endpoint() {
        let json = get_json(test_server().router(), "/api/credentials").await;
        assert_eq!(json["vm_user"], "wazuh-user");
        assert_eq!(json["dashboard_user"], "admin");
    }

    #[tokio::test]
    async fn test_appliance_endpoint_reports_absence() {
        let json = get_json(test_server().router(), "/api/appliance").await;
        assert_eq!(json["present"], false);
    }

    #[tokio::test]
    async fn test_system_check_errors_without_tool() {
        let json = get_json(test_server().router(), "/api/system").await;
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("VirtualBox"));
    }
}

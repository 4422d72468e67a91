use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_template_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tenant_contracts::config::AppConfig;
use tenant_contracts::error::AppError;
use tenant_contracts::telemetry;
use tenant_contracts::templates::ContractTemplateService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let body_limit = config.templates.request_body_limit();
    let template_service = Arc::new(ContractTemplateService::new(config.templates));

    let app = with_template_routes(template_service)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_upload_bytes = config.templates.max_upload_bytes,
        "contract template service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_hunter::config::AppConfig;
use job_hunter::error::AppError;
use job_hunter::gateway_router;
use job_hunter::telemetry;
use job_hunter::workflows::apply::KestraClient;
use job_hunter::workflows::listings::FileListingRepository;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

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

    let engine = Arc::new(KestraClient::new(&config.kestra)?);
    let repository = Arc::new(FileListingRepository::new(&config.listings));
    info!(
        kestra = %config.kestra.base_url,
        namespace = %config.kestra.namespace,
        flow_id = %config.kestra.flow_id,
        dataset = %repository.path().display(),
        cache = config.listings.cache,
        "gateway collaborators configured"
    );

    let gateway = gateway_router(engine, repository, &config.kestra, config.environment)?;
    let app = with_operational_routes(gateway)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job hunter gateway ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received ctrl-c, shutting down"),
        Err(err) => {
            error!(%err, "failed to listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

use crate::cli::ServeArgs;
use crate::infra::{load_field_mapping, AppState};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use guardian_intake::config::AppConfig;
use guardian_intake::error::AppError;
use guardian_intake::telemetry;
use guardian_intake::workflows::intake::ApplicationIntakeService;
use guardian_intake::workflows::jotform::JotformClient;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.jotform.api_key.is_none() {
        warn!("JOTFORM_API_KEY is not set; submissions will fail until it is configured");
    }
    if config.jotform.forms.stage1.is_none() {
        warn!("JOTFORM_FORM_ID_STAGE1 is not set; submissions will fail until it is configured");
    }

    let mapping = Arc::new(load_field_mapping(&config.jotform.field_mapping_path)?);
    let client = Arc::new(JotformClient::new(&config.jotform)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let intake_service = Arc::new(ApplicationIntakeService::new(
        mapping,
        client,
        config.jotform.forms.stage1.clone(),
    ));

    let app = with_intake_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "application intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use actix_web::{web, App, HttpServer};
use ebs::config::Config;
use ebs::infra::state::build_state;
use ebs::middleware::cors::cors_middleware;
use ebs::middleware::request_trace::RequestTrace;
use ebs::middleware::trace_span::TraceSpan;
use ebs::routes;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (EBS_CLIENT_ID, EBS_OWNER_ID, EBS_SECRET; the rest have defaults).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state().with_config(&config).build() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %config.host,
        port = config.port,
        pubsub_base_url = %config.pubsub_base_url,
        "starting extension backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

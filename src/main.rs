use actix_web::{web, App, HttpServer};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use loadforge_bulkhead::executor::{report::print_report, run_load_test};
use loadforge_bulkhead::settings::WorkerSettings;
use loadforge_bulkhead::ws;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = WorkerSettings::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    if settings.headless {
        let metrics = run_load_test(settings.probe, Arc::new(AtomicBool::new(true)))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        print_report(&metrics);
        return Ok(());
    }

    tracing::info!("worker started on ws://{}/ws", settings.bind_addr);

    HttpServer::new(|| App::new().route("/ws", web::get().to(ws::ws_handler)))
        .bind(&settings.bind_addr)?
        .run()
        .await
}

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::info;

pub const HEALTH_BODY: &str = "YT Tracker Active";

/// Liveness probe. Answers every method on every path.
///
/// # Example
/// ```shell
/// curl http://localhost:10000/
/// ```
///
/// # Returns
/// ```text
/// YT Tracker Active
/// ```
pub async fn health() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(HEALTH_BODY)
}

/// Run the health server until the process exits.
pub async fn run_api_server(port: u16) -> std::io::Result<()> {
    info!("Health endpoint listening on 0.0.0.0:{}", port);
    HttpServer::new(|| App::new().default_service(web::to(health)))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}

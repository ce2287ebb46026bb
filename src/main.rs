use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use message_service::app;
use message_service::config::app_config::AppConfig;
use message_service::logger::init_logger;
use message_service::services::message_service::open_store;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Configuración inválida: {:?}", e);
            std::process::exit(1);
        }
    };

    let store = open_store(&config.database_url, config.db_max_connections).await;
    let message_service = match store {
        Ok(svc) => svc,
        Err(e) => {
            log::error!("No se pudo iniciar el store de mensajes: {:?}", e);
            std::process::exit(1);
        }
    };

    // Levantar servidor
    log::info!(
        "Levantando servidor en {}:{} (origen permitido: {})",
        config.host,
        config.port,
        config.frontend_url
    );
    let frontend_url = config.frontend_url.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(app::cors_headers(&frontend_url))
            .app_data(web::Data::new(message_service.clone()))
            .configure(app::init_app)
    });
    if let Some(workers) = config.http_workers {
        server = server.workers(workers);
    }

    server.bind((config.host.as_str(), config.port))?.run().await
}

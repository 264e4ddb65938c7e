use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{anyhow, Context};
use sqlearn_api::configure_service;
use sqlearn_assistant::{Assistant, OpenAiClient, SqlExecutor};
use sqlearn_auth::HashingConfig;
use sqlearn_common::config::{AssistantConfig, Config};
use sqlearn_db::connection::create_connection_pool;
use sqlearn_db::run_migrations;

fn build_assistant(db_path: &str, cfg: &AssistantConfig) -> anyhow::Result<Assistant> {
    if cfg.api_key.is_none() {
        log::warn!("OPENAI_API_KEY is not set; /chat will report the assistant as unavailable");
    }
    let client = OpenAiClient::new(
        cfg.api_key.clone(),
        cfg.base_url.clone(),
        cfg.model.clone(),
        cfg.timeout,
    )
    .map_err(|e| anyhow!("cannot build completion client: {}", e))?;
    let executor = SqlExecutor::new(db_path, cfg.max_rows, cfg.statement_timeout)
        .allow_writes(&cfg.allowed_writes);
    if !cfg.allowed_writes.is_empty() {
        log::warn!("assistant may execute: {}", cfg.allowed_writes.join(", "));
    }
    Ok(Assistant::new(Arc::new(client), executor, cfg.timeout))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let pool = create_connection_pool(&config.database_url, config.db_pool_size)
        .with_context(|| format!("cannot open database {}", config.database_url))?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn).map_err(|e| anyhow!("migrations failed: {}", e))?;
    }

    let hashing = HashingConfig {
        cost: config.bcrypt_cost,
    };
    let assistant = build_assistant(&config.database_url, &config.assistant)?;
    let cors_origin = config.cors_allowed_origin.clone();

    log::info!("listening on {}", config.bind_addr);
    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };
        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(hashing))
            .app_data(web::Data::new(assistant.clone()))
            .configure(configure_service)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await?;
    Ok(())
}

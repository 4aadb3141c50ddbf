use linkcut::{config, runtime, system};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::init_config();
    let _log_guard = system::logging::init_logging(config);

    runtime::server::run_server().await
}

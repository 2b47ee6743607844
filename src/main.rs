use techblog::{make_router, run_app, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "techblog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!("Configuration error: {error:#}");
            std::process::exit(1);
        }
    };
    let router = make_router();
    if let Err(error) = run_app(router, settings).await {
        tracing::error!("Error: {error:#}");
        std::process::exit(1);
    }
}

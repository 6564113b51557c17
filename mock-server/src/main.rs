use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let app_id = std::env::var("ROOT_APP_ID").unwrap_or_else(|_| "test_app".to_string());
    let app_secret = std::env::var("ROOT_APP_SECRET").unwrap_or_default();

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_root_api::run(listener, &app_id, &app_secret).await
}

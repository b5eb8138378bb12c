use log::info;
use mock_server::Store;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    env_logger::init();
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let login = std::env::var("MOCK_LOGIN").unwrap_or_else(|_| "alice".to_string());
    let addr = format!("127.0.0.1:{port}");

    let store = Store::new(&login)
        .with_board("Road Trips", "travel_places", "Places worth the drive", 60)
        .with_board("Recipes", "food_drink", "Weeknight dinners", 8);
    let session = store.session();
    info!("session login={} cookie={:?} csrf={:?}", session.login, session.cookie, session.csrf_token);

    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    mock_server::run(listener, store).await
}

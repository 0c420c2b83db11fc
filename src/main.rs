use cisium::engine::Engine;
use cisium::server::serve;
use cisium::store::Store;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("CISIUM_DB_PATH").unwrap_or_else(|_| "cisium.db".into());

    let store = Store::open(&db_path).unwrap();
    let engine = Engine::new(store).unwrap();

    serve(engine).await;
}

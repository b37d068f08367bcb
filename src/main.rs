#[tokio::main]
async fn main() {
    if let Err(err) = atelier_api::run().await {
        eprintln!("server error: {}", err);
        std::process::exit(1);
    }
}

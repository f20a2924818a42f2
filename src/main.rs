#[tokio::main]
async fn main() {
    if let Err(e) = hepatoguard_lib::run().await {
        eprintln!("hepatoguard: {e}");
        std::process::exit(1);
    }
}

use quarantine_relay::app;

#[tokio::main]
async fn main() -> Result<(), quarantine_relay::RelayError> {
    app::main().await
}

#[tokio::main]
async fn main() {
    if let Err(e) = med_reminder_lib::run().await {
        tracing::error!("{e}");
        eprintln!("med-reminder: {e}");
        std::process::exit(1);
    }
}

use dotenvy::dotenv;
use service::extra_credit::{cache_round_trip, cast_and_add, spawn_worker, Command};
use service::storage::{CacheValue, ConcurrentMap};
use tracing::{info, warn};

fn init_logging() {
    dotenv().ok();
    common::utils::logging::init_logging_json();
    info!(service = "extra_credit", event = "logger_init", "tracing subscriber initialized");
}

fn checked_conversion() {
    let boxed = CacheValue::Int(10);
    match cast_and_add(&boxed, 5) {
        Some(sum) => info!(event = "cast", sum, "converted value holding 10 to an integer and added five"),
        None => warn!(event = "cast", value = ?boxed, "value was not an integer"),
    }
}

async fn worker_lifecycle() -> anyhow::Result<()> {
    let worker = spawn_worker(1);
    for _ in 0..3 {
        worker.send(Command::Double).await?;
    }
    worker.send(Command::Print).await?;
    let report = worker.quit().await?;
    info!(event = "worker", value = report.value, printed = ?report.printed, "worker stopped");
    Ok(())
}

fn cache_demo() {
    let cache = ConcurrentMap::new();
    match cache_round_trip(&cache, "test", "some value here") {
        Some(value) => info!(event = "cache", %value, "read value back from cache"),
        None => warn!(event = "cache", "value missing after write"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!(event = "stage", "testing checked conversion");
    checked_conversion();
    info!(event = "stage", "testing worker lifecycle");
    worker_lifecycle().await?;
    info!(event = "stage", "testing cache");
    cache_demo();
    Ok(())
}

//! Load the demonstration fixtures into the configured database.

use tracing::info;

use placement_db::Database;
use placement_server::config::Config;
use placement_server::telemetry;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init();

    let config = Config::from_env()?;
    let db = Database::open(&config.db_path)?;
    let summary = placement_api::seed::load(&db)?;

    info!("Seeded {}", summary);
    info!(
        "Fixture accounts log in with password '{}'",
        placement_api::seed::FIXTURE_PASSWORD
    );
    Ok(())
}

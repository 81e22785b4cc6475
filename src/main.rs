use anyhow::Context;

use biblio_app::modules;
use biblio_db::{Database, DbConfig};
use biblio_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load biblio settings")?;

    biblio_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "biblio bootstrap starting"
    );

    let db = Database::connect(
        DbConfig::new(&settings.database.url).max_connections(settings.database.max_connections),
    )
    .await
    .with_context(|| "failed to connect to database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);

    for (module_name, migration) in registry.collect_migrations() {
        tracing::info!(
            module = %module_name,
            migration = migration.id,
            "applying migration"
        );
        db.execute_ddl(migration.up)
            .await
            .with_context(|| format!("failed to apply migration '{}'", migration.id))?;
    }

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;

    biblio_http::start_server(&registry, &settings).await?;

    db.close().await;
    tracing::info!("biblio shutdown complete");
    Ok(())
}

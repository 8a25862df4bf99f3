use annulus_engine::AppConfig;
use annulus_engine::logging::init_logging;
use annulus_engine::window::Runtime;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::default();
    init_logging(&config.logging);

    log::info!(
        "starting annulus viewer: {} rings, {} subdivisions",
        config.scene.object_count,
        config.scene.ring.subdivisions
    );

    Runtime::run(config)
}

use lantern_demos::DemoConfig;
use lantern_engine::logging::{init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    lantern_demos::run(DemoConfig::assignment1())
}

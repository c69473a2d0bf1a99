//! Logging setup for the command-line binary.

use color_eyre::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a stderr subscriber filtered by `RUST_LOG` plus crate defaults.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("stakedash=info".parse()?)
        .add_directive("stakedash_chain=info".parse()?)
        .add_directive("stakedash_core=info".parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

//! The `qrscan serve` command.

use clap::Args;
use qrscan_core::Config;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable request tracing (overrides `server.debug`)
    #[arg(long)]
    pub quiet: bool,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config)?;
    crate::server::serve(config).await
}

fn apply_overrides(args: &ServeArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        if host.trim().is_empty() {
            anyhow::bail!("--host must not be empty");
        }
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        if port == 0 {
            anyhow::bail!("--port must be > 0");
        }
        config.server.port = port;
    }
    if args.quiet {
        config.server.debug = false;
    }
    Ok(())
}

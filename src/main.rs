use clap::Parser;
use host_watch::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    // Routes log::info!() etc. to /tmp/host_watch_debug.log. The CLI
    // --log-level flag takes precedence over RUST_LOG and DEBUG_LEVEL.
    host_watch::debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));
    log::info!("Starting host-watch {}", host_watch::VERSION);

    match cli::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("host-watch: error: {e:#}");
            std::process::exit(2);
        }
    }
}

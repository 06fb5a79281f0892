//! Console quick installer for the Defacto compiler

use clap::Parser;
use defacto_install::cli::{self, QuickInstallArgs};
use defacto_install::runners;

fn main() {
    let args = QuickInstallArgs::parse();

    // --verbose sets the default level; RUST_LOG overrides it
    env_logger::Builder::new()
        .filter_level(cli::log_level(args.verbose))
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{} {}] {}", buf.timestamp_millis(), record.level(), record.args())
        })
        .init();

    if let Err(e) = runners::run_quick_install(&args) {
        log::debug!("{e:#}");
        std::process::exit(1);
    }
}

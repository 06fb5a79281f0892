//! Builds the Defacto Windows installer package

use clap::Parser;
use defacto_install::cli::{self, PackageArgs};
use defacto_install::runners;

fn main() {
    let args = PackageArgs::parse();

    env_logger::Builder::new()
        .filter_level(cli::log_level(args.verbose))
        .parse_default_env()
        .init();

    if let Err(e) = runners::run_package(&args) {
        // Pipeline errors were already printed by the runner
        log::debug!("{e:#}");
        std::process::exit(1);
    }
}

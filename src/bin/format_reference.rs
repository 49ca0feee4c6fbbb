use std::env;
use std::path::PathBuf;
use std::process;

use nestest_compare::config::Config;
use nestest_compare::convert::ensure_canonical_reference;

fn main() {
    nestest_compare::init_logging();

    // [reference.log] [canonical.log]
    let args: Vec<String> = env::args().skip(1).collect();
    let defaults = Config::default();
    let reference = args.first().map_or(defaults.reference_log, PathBuf::from);
    let canonical = args.get(1).map_or(defaults.canonical_reference, PathBuf::from);

    if let Err(e) = ensure_canonical_reference(&reference, &canonical) {
        eprintln!("Failed to format reference log: {}", e);
        process::exit(1);
    }
}

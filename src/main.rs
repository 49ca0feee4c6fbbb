use std::env;
use std::process;

use nestest_compare::compare::Outcome;
use nestest_compare::config::Config;
use nestest_compare::verify;

fn main() {
    nestest_compare::init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_args(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("Usage: nestest-compare [emulator] [rom.nes] [reference.log] [work_dir]");
        process::exit(2);
    });

    match verify::run(&config) {
        Ok(Outcome::Matched { .. }) => {}
        Ok(Outcome::Diverged(divergence)) => {
            print!("{}", divergence);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Verification error: {}", e);
            process::exit(1);
        }
    }
}

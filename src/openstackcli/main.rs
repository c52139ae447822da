//! # openstackcli
//!
//! The binary is intentionally thin: parsing, dispatch and every command live
//! in the library. This file and `cli/` only turn results into process
//! output:
//!
//! - help text goes to stdout and the process exits 0
//! - parse errors print the usage of the scope being parsed to stdout, then
//!   the message to stderr, and exit 1
//! - every other error prints only the message to stderr and exits 1

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        if let Some(usage) = e.usage() {
            print!("{}", usage);
        }
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

//! Process-level wiring: argv in, output and exit status out.

use cmdtable::{CommandOptions, Parsed, Result};
use openstackcli::{build_program, logging, BaseOptions, OpenStackBootstrap};

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let log_filter = logging::init(logging::debug_requested(&args));
    let program = build_program()?;

    match program.parse(&args)? {
        Parsed::Help(text) => {
            print!("{}", text);
            Ok(())
        }
        Parsed::Run(invocation) => {
            let base = BaseOptions::from_bound(invocation.base())?;
            if let Some(handle) = &log_filter {
                logging::set_debug(handle, base.debug);
            }
            tracing::debug!(command = invocation.command(), "running");

            invocation.execute(&OpenStackBootstrap::from_env())
        }
    }
}

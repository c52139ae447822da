use console::Term;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Lets the binary settle the level once `--debug` has been parsed.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

/// Scans raw arguments for `--debug` before they are parsed, so that events
/// from the parse itself are not lost. Stops at `--`; the last occurrence wins.
pub fn debug_requested<S: AsRef<str>>(args: &[S]) -> bool {
    let mut debug = false;
    for arg in args.iter().map(AsRef::as_ref) {
        match arg {
            "--" => break,
            "--debug" => debug = true,
            _ => {
                if let Some(value) = arg.strip_prefix("--debug=") {
                    debug = matches!(
                        value.to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    );
                }
            }
        }
    }
    debug
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--debug`.
///
/// Returns a handle for [`set_debug`] when the level follows `--debug`. Calling
/// this twice is harmless; the second call keeps the first subscriber.
pub fn init(debug: bool) -> Option<FilterHandle> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let follows_flag = from_env.is_none();
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(default_directive(debug)));
    let (filter, handle) = reload::Layer::new(filter);

    let output = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(Term::stderr().features().colors_supported())
        .with_target(true)
        .without_time();

    match tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
    {
        Ok(()) => follows_flag.then_some(handle),
        Err(_) => {
            tracing::trace!("logging already initialized");
            None
        }
    }
}

/// Switches to the level for the parsed `--debug` value.
pub fn set_debug(handle: &FilterHandle, debug: bool) {
    if let Err(err) = handle.reload(EnvFilter::new(default_directive(debug))) {
        tracing::warn!(error = %err, "could not change log level");
    }
}

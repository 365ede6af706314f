use clap::Parser;

/// Initialise logging and parse the command line for an evaluation binary.
///
/// Logs at `info` unless `RUST_LOG` says otherwise.
pub fn init<C: Parser>() -> C {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    C::parse()
}

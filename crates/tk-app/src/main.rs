//! `tk` command-line entry point

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tk_app=debug,tk_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(error) = tk_app::run_from_env() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

/// Initialises the global tracing subscriber for a host binary.
/// Respects `RUST_LOG`, defaulting to `info` for everything except corvid
/// crates, which default to `debug`.
#[macro_export]
macro_rules! tracing_init {
    () => {{
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,corvid_core=debug,corvid_common=debug"));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }};
}

#[macro_export]
macro_rules! ok_or_continue {
    ($expression:expr) => {
        match $expression {
            Ok(v) => v,
            Err(_) => continue,
        }
    };
}

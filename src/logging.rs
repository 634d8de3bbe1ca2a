use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr tracing subscriber if none is set yet
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks between `debug` and
/// `warn` for this crate. Returns true if a subscriber was installed by this
/// call, false if one already existed.
pub fn init_tracing(verbose: bool) -> bool {
    let default_filter = if verbose { "figtail=debug" } else { "figtail=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_no_op() {
        init_tracing(false);
        assert!(!init_tracing(true));
    }
}

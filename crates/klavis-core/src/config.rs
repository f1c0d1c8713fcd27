//! Server configuration.

/// What the server does when a callback fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// The first failing callback aborts the cycle and stops the loop;
    /// `start()` returns the error. Panics unwind out of `start()`.
    #[default]
    Propagate,
    /// Failures and panics are logged and the remaining callbacks still run.
    Isolate,
}

/// Configuration for the event server.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub dispatch: DispatchPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.dispatch, DispatchPolicy::Propagate);
    }
}

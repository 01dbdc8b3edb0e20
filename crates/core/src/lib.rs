pub mod domain;
pub mod engine;
pub mod fleet;
pub mod format;
pub mod notify;
pub mod registry;
pub mod session;

pub mod config {
    use crate::format::DEFAULT_CURRENCY_SYMBOL;
    use crate::registry::TerminalRegistry;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        /// JSON array of terminals; the built-in demo fleet is used when unset.
        pub terminals_path: Option<String>,
        pub currency_symbol: String,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                terminals_path: non_empty_var("CASHLOAD_TERMINALS_PATH"),
                currency_symbol: non_empty_var("CASHLOAD_CURRENCY_SYMBOL")
                    .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
            })
        }

        pub fn load_registry(&self) -> anyhow::Result<TerminalRegistry> {
            match self.terminals_path.as_deref() {
                Some(path) => {
                    let registry = TerminalRegistry::from_json_file(path)?;
                    tracing::info!(path, terminals = registry.len(), "loaded terminal registry");
                    Ok(registry)
                }
                None => Ok(TerminalRegistry::seeded()),
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

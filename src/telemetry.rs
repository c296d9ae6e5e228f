use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Installs the global subscriber; JSON lines in production.
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if environment.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

pub fn init_logger_once() {
    INIT_LOGGER.call_once(|| {
        let mut env_filter = EnvFilter::from_default_env().add_directive(Level::DEBUG.into());
        // HTTP client, TLS and HTML parser internals
        for noisy in ["hyper_util=info", "rustls=info", "html5ever=off", "selectors=off"] {
            if let Ok(directive) = noisy.parse::<Directive>() {
                env_filter = env_filter.add_directive(directive);
            }
        }
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    });
}

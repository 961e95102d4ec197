use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "velige_engine=debug"). When unset, `RUST_LOG` is used, then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Caps wgpu and naga at `warn` unless the filter names them.
    pub quiet_gpu_stack: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            quiet_gpu_stack: true,
        }
    }
}

const GPU_STACK: [&str; 4] = ["wgpu_core", "wgpu_hal", "wgpu", "naga"];

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log::LevelFilter::Info);

        let filter = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());

        if config.quiet_gpu_stack {
            for module in GPU_STACK {
                let named = filter.as_deref().is_some_and(|f| f.contains(module));
                if !named {
                    builder.filter_module(module, log::LevelFilter::Warn);
                }
            }
        }
        if let Some(filter) = &filter {
            builder.parse_filters(filter);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::debug!("a logger was already installed");
            return;
        }
        log::debug!("logging initialized");
    });
}

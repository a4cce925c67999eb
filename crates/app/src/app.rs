use paths::PathContext;
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
/// This is a pure marker trait - no logic, just constants.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "campus";
    const PROJECT_ID: &'static str = "visitor_pass";
    /// Mirror log output to stdout. Terminal UIs own the screen and turn this off.
    const CONSOLE_LOG: bool = true;
}

/// Builder for creating applications with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Initializes logging (file + optional console)
    /// - Ensures all directories exist
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::STUDIO,
            A::PROJECT_ID,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID);

        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path should have parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path should have filename")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        #[cfg(debug_assertions)]
        let level = LevelFilter::INFO;

        #[cfg(not(debug_assertions))]
        let level = LevelFilter::WARN;

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(env_filter(level));

        let console_layer = A::CONSOLE_LOG.then(|| {
            fmt::Layer::default()
                .with_target(false)
                .with_filter(env_filter(level))
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .with(tracing_error::ErrorLayer::default())
            .try_init()?;

        tracing::info!(app_id = A::APP_ID, version, "logging initialised");

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Build a simple application.
    pub fn build_simple(self) -> AppContext {
        self.context
    }
}

/// `RUST_LOG` wins over the build-profile default.
fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

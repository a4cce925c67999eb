use std::sync::OnceLock;

use color_eyre::Result;
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the eyre report hook and a panic hook that gives the terminal
/// back before anything is printed. Safe to call more than once.
pub fn init() -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("The kiosk stopped unexpectedly. Please notify campus IT staff.")
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(err) = crate::tui::restore() {
            error!("Unable to restore terminal: {err:?}");
        }

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!();
            let file_path = handle_dump(&metadata, panic_info);
            let _ = print_msg(file_path, &metadata);
            eprintln!("{}", panic_hook.panic_report(panic_info));
        }
        let report = panic_hook.panic_report(panic_info).to_string();
        error!("Error: {}", strip_ansi_escapes::strip_str(report));

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INIT.set(());
    Ok(())
}

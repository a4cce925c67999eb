use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use kiosk::{
    app::App,
    cli::{Cli, Command},
    config::Config,
    Kiosk,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    kiosk::errors::init()?;

    let base = ::app::AppBuilder::<Kiosk>::new(env!("CARGO_PKG_VERSION"))
        .map_err(|e| eyre!("initialisation failed: {e}"))?
        .build_simple();
    let config = Config::new(&base.path_context().config_dir(), &args)?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let mut app = App::new(config)?;
            app.run().await?;
        }
        Command::Register(register) => {
            let passes_dir = base.path_context().passes_dir();
            kiosk::headless::register(&config, register, &passes_dir).await?
        }
    }
    Ok(())
}

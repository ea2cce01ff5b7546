use clap::Parser;
use tariffscope::cli::{Args, Command, default_data_dir};
use tariffscope::state::AppState;
use tariffscope::{App, Settings, commands, init_logging};
use tokio::runtime::Runtime;

fn runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let config_path = args.config.unwrap_or_else(|| Settings::path(&data_dir));
    let settings = Settings::load_or_default(&config_path);
    let loader = settings.loader();
    let export_dir = settings.export_dir(&data_dir);
    let mut selections = settings.defaults.clone();

    match args.command.unwrap_or_default() {
        Command::Dashboard { tariff_a, tariff_b } => {
            selections.tariff_a = tariff_a.unwrap_or(selections.tariff_a);
            selections.tariff_b = tariff_b.unwrap_or(selections.tariff_b);
            let mut app = App::new(AppState::new(selections, export_dir), loader)?;

            ratatui::run(|terminal| app.run(terminal))?;

            tracing::info!("Application shutting down");

            if let Err(err) = ratatui::try_restore() {
                tracing::error!("Failed to restore terminal: {err}");
            }
        }
        Command::List => runtime()?.block_on(commands::list(&loader, &mut std::io::stdout()))?,
        Command::Compare {
            tables,
            baseline,
            pretty,
        } => runtime()?.block_on(commands::compare(
            &loader,
            &tables,
            baseline.as_deref(),
            pretty,
            &mut std::io::stdout(),
        ))?,
        Command::Export {
            format,
            out,
            tariff_a,
            tariff_b,
        } => {
            selections.tariff_a = tariff_a.unwrap_or(selections.tariff_a);
            selections.tariff_b = tariff_b.unwrap_or(selections.tariff_b);
            let path = runtime()?.block_on(commands::export(
                &loader,
                selections,
                format,
                out.as_deref(),
                &export_dir,
            ))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

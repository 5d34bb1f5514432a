use clap::Parser;
use wheeld::app::AppModel;
use wheeld::config;
use wheeld::sys::runtime::Services;

#[derive(Parser, Debug)]
#[command(name = "wheeld", version, about, long_about = None)]
struct Cli {
    /// Write the default config file if there is none, then exit
    #[arg(long)]
    init: bool,

    /// Print where the config file is read from, then exit
    #[arg(long)]
    print_config_path: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = config::get_config_path()?;
    if cli.print_config_path {
        println!("{}", config_path.display());
        return Ok(());
    }
    if cli.init {
        if !config::write_default_config(&config_path)? {
            log::info!("Keeping existing config");
        }
        println!("{}", config_path.display());
        return Ok(());
    }

    let config = config::load_or_default()?;
    let app = AppModel::new(config.clone())?;

    let (tx, rx) = async_channel::bounded(32);

    Services {
        socket: config.daemon.socket,
        config_path,
    }
    .start(tx)?;

    app.run_blocking(rx)
}

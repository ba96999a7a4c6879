use clap::Parser;
use sentinel::cli::app::{build_api, load_config_with_overrides, renderers, session_store};
use sentinel::cli::{
    handle_completions, handle_config_init, health, options, session, show, watch, Cli, Commands,
    ConfigCommands,
};
use sentinel::logging::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Commands that never touch the backend skip config loading
    match cli.command {
        Commands::Config(ConfigCommands::Init(ref args)) => {
            println!("{}", handle_config_init(args)?);
            return Ok(());
        }
        Commands::Completions(ref args) => {
            handle_completions(args);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config_with_overrides(&cli.global)?;
    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Login(args) => {
            let store = session_store(&config, build_api(&config)?);
            println!("{}", session::handle_login(&args, &store).await?);
        }
        Commands::Logout => {
            let store = session_store(&config, build_api(&config)?);
            println!("{}", session::handle_logout(&store));
        }
        Commands::Whoami(args) => {
            let api = build_api(&config)?;
            let store = session_store(&config, api.clone());
            println!("{}", session::handle_whoami(&args, &store, api).await?);
        }
        Commands::Show(args) => show::handle_show(&args, config).await?,
        Commands::Watch(args) => watch::handle_watch(&args, config).await?,
        Commands::Options(args) => {
            let api = build_api(&config)?;
            let (renderer, _) = renderers(args.json);
            options::handle_options(api.as_ref(), renderer.as_ref()).await?;
        }
        Commands::Health(args) => {
            let api = build_api(&config)?;
            println!(
                "{}",
                health::handle_health(&args, api.as_ref(), &config.api.base_url).await?
            );
        }
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sweetmix")]
#[command(about = "SweetMix Messenger bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook server. Secrets come from the environment (VERIFY_TOKEN, PAGE_TOKEN, OPENAI_KEY; a .env file in the working directory is loaded first) or the config file.
    Serve {
        /// Config file path (default: SWEETMIX_CONFIG_PATH or ~/.sweetmix/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from PORT, config, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Ok(path) = dotenv {
        log::debug!("loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("sweetmix {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("server failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(config_path: Option<std::path::PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, path) = sweetmix_core::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting sweetmix on {}:{} (config {})",
        config.gateway.bind,
        config.gateway.port,
        path.display()
    );
    sweetmix_core::gateway::run_gateway(config).await
}

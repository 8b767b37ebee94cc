use clap::Parser;

use location_timezone::cli::{Cli, Commands};
use location_timezone::config::init_config;
use location_timezone::runtime::modes::{cli, run_server};
use location_timezone::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    let config = match init_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let _guard = init_logging(&config.logging)?;
            run_server(config).await
        }
        Commands::Lookup { ip } => match cli::lookup(&config.geoip, &ip) {
            Ok(json) => {
                println!("{}", json);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        },
        Commands::GenerateConfig { output } => {
            if let Some(rendered) = cli::generate_config(output.as_deref())? {
                println!("{}", rendered);
            }
            Ok(())
        }
    }
}

use clap::{Parser, Subcommand};
use distance_calculation::server::{self, parse_decimal, ServerConfig};
use distance_calculation::{compute, logging, GeographicLocation, Unit};
use rust_decimal::Decimal;

/// Great-circle distance service.
///
/// Examples:
///   distances serve --port 8080
///   distances compute --lat-start -23.5505 --lon-start -46.6333 --lat-end -22.9068 --lon-end -43.1729 --unit MI
#[derive(Parser)]
#[command(name = "distances", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve GET /distances over HTTP.
    Serve {
        /// Address to bind.
        #[arg(long, env = "DISTANCES_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind.
        #[arg(long, short = 'p', env = "DISTANCES_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Compute one distance and print it as JSON.
    Compute {
        /// Start latitude in degrees.
        #[arg(long, allow_hyphen_values = true, value_parser = parse_coordinate)]
        lat_start: Decimal,

        /// Start longitude in degrees.
        #[arg(long, allow_hyphen_values = true, value_parser = parse_coordinate)]
        lon_start: Decimal,

        /// End latitude in degrees.
        #[arg(long, allow_hyphen_values = true, value_parser = parse_coordinate)]
        lat_end: Decimal,

        /// End longitude in degrees.
        #[arg(long, allow_hyphen_values = true, value_parser = parse_coordinate)]
        lon_end: Decimal,

        /// Output unit: M, MI or KM.
        #[arg(long, short = 'u', default_value = "KM")]
        unit: Unit,
    },
}

fn parse_coordinate(s: &str) -> Result<Decimal, String> {
    parse_decimal(s).ok_or_else(|| format!("'{}' is not a decimal number", s))
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            let config = ServerConfig { host, port };
            if let Err(e) = server::start(&config).await {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Command::Compute { lat_start, lon_start, lat_end, lon_end, unit } => {
            let result = compute(
                GeographicLocation::new(lat_start, lon_start),
                GeographicLocation::new(lat_end, lon_end),
                unit,
            );
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    tracing::error!("cannot serialize result: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

use aeroimpact_cli::{estimate_lines, inspect_snapshot, render_outcome, render_report};
use aeroimpact_core::{refresh, AircraftCategory, FixedCategory};
use aeroimpact_opensky::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_S};
use aeroimpact_opensky::{OpenSkyClient, OpenSkyConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OpenSky API base URL
    #[arg(long, env = "OPENSKY_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// OpenSky account name
    #[arg(long, env = "OPENSKY_USERNAME")]
    username: Option<String>,

    /// OpenSky account password
    #[arg(long, env = "OPENSKY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "OPENSKY_TIMEOUT_S", default_value_t = DEFAULT_TIMEOUT_S)]
    timeout_s: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a snapshot, sample it and print aggregate estimates
    Refresh {
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Estimate a single flight from the live snapshot
    Inspect {
        /// ICAO24 transponder address
        icao24: String,

        #[arg(long)]
        seed: Option<u64>,

        /// Use this category instead of querying the metadata endpoint
        #[arg(long)]
        category: Option<u8>,
    },
    /// Run the estimation engine without any network access
    Estimate {
        #[arg(long)]
        distance_km: f64,

        /// Number of flights, ignored with --category
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Weight category code (2 light .. 6 super heavy)
        #[arg(long)]
        category: Option<u8>,

        /// Altitude in meters, only used together with --category
        #[arg(long, default_value_t = 10_000.0)]
        altitude_m: f64,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

impl Args {
    fn client(&self) -> Result<OpenSkyClient> {
        let mut config = OpenSkyConfig::default()
            .with_base_url(self.url.clone())
            .with_timeout(Duration::from_secs(self.timeout_s));
        config.username = self.username.clone();
        config.password = self.password.clone();
        OpenSkyClient::new(config)
    }
}

async fn inspect(client: &OpenSkyClient, icao24: &str, seed: Option<u64>, category: Option<u8>) {
    let snapshot = client.fetch_states().await;
    if let Some(err) = &snapshot.error {
        println!("Upstream unavailable: {}", err);
    }

    let mut rng = rng_from(seed);
    let outcome = match category {
        Some(code) => {
            let lookup = FixedCategory(AircraftCategory::new(code));
            inspect_snapshot(&snapshot, icao24, &lookup, &mut rng).await
        }
        None => inspect_snapshot(&snapshot, icao24, client, &mut rng).await,
    };
    print!("{}", render_outcome(&outcome));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match &args.command {
        Command::Refresh { seed } => {
            let client = args.client()?;
            let report = refresh(&client, &mut rng_from(*seed)).await;
            print!("{}", render_report(&report));
        }
        Command::Inspect { icao24, seed, category } => {
            let client = args.client()?;
            inspect(&client, icao24, *seed, *category).await;
        }
        Command::Estimate {
            distance_km,
            count,
            category,
            altitude_m,
        } => {
            let category = (*category).map(AircraftCategory::new);
            for line in estimate_lines(*distance_km, *count, category, *altitude_m) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

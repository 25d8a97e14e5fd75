use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use flagquiz_core::model::{QuizSettings, QuizSettingsDraft, SettingsError};
use services::{Clock, DEFAULT_ADVANCE_DELAY, QuizService};
use storage::Storage;

mod console;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDelay { raw: String },
    Settings(SettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDelay { raw } => write!(f, "invalid --delay-ms value: {raw}"),
            ArgsError::Settings(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  flagquiz [--catalog <json>] [--assets <dir>] [--choices <n>] [--region <name>] [--delay-ms <ms>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --catalog data/countries.json");
    eprintln!("  --assets  data/flags");
    eprintln!("  --choices 4   (2, 4, 6 or 8)");
    eprintln!("  --region  All");
    eprintln!("  --delay-ms {}", DEFAULT_ADVANCE_DELAY.as_millis());
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FLAGQUIZ_CATALOG, FLAGQUIZ_ASSETS, FLAGQUIZ_CHOICES, FLAGQUIZ_REGION, RUST_LOG");
}

struct Args {
    catalog: PathBuf,
    assets: PathBuf,
    settings: QuizSettings,
    delay: Duration,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut catalog = std::env::var("FLAGQUIZ_CATALOG")
            .map_or_else(|_| PathBuf::from("data/countries.json"), PathBuf::from);
        let mut assets = std::env::var("FLAGQUIZ_ASSETS")
            .map_or_else(|_| PathBuf::from("data/flags"), PathBuf::from);
        let mut draft = QuizSettingsDraft {
            choices: std::env::var("FLAGQUIZ_CHOICES").ok(),
            region: std::env::var("FLAGQUIZ_REGION").ok(),
        };
        let mut delay = DEFAULT_ADVANCE_DELAY;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => catalog = require_value(args, "--catalog")?.into(),
                "--assets" => assets = require_value(args, "--assets")?.into(),
                "--choices" => draft.choices = Some(require_value(args, "--choices")?),
                "--region" => draft.region = Some(require_value(args, "--region")?),
                "--delay-ms" => {
                    let value = require_value(args, "--delay-ms")?;
                    let millis: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDelay { raw: value.clone() })?;
                    delay = Duration::from_millis(millis);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let settings = draft.validate().map_err(ArgsError::Settings)?;
        Ok(Self {
            catalog,
            assets,
            settings,
            delay,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if !parsed.assets.is_dir() {
        log::warn!(
            "flag directory {} not found; prompts will show the asset id only",
            parsed.assets.display()
        );
    }
    let storage = Storage::files(parsed.catalog, parsed.assets);
    let quiz = QuizService::load(Clock::system(), storage.catalog.as_ref(), parsed.settings)
        .await?
        .with_advance_delay(parsed.delay);

    console::play(quiz, storage.assets.as_ref()).await
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use laptime_topk::ingest::{self, DriverDirectory, IngestMode};
use laptime_topk::{LapFilter, Options, Report, RetrievalDriver};

#[derive(Parser, Debug)]
#[command(name = "laptimes")]
#[command(about = "Rank the fastest laps of a race with a heap and an ordered index")]
#[command(version)]
struct Cli {
    /// Lap time rows: raceId,driverId,lap,position,time,milliseconds
    #[arg(long)]
    lap_times: PathBuf,

    /// Driver table: driverId,driverRef,number,code,forename,surname,...
    #[arg(long)]
    drivers: PathBuf,

    /// Race to rank
    #[arg(long)]
    race: u32,

    /// Lap within the race
    #[arg(long)]
    lap: u32,

    /// How many of the fastest laps to keep
    #[arg(short = 'k', long = "top", default_value_t = laptime_topk::retrieval::DEFAULT_K)]
    k: usize,

    /// Where to write the JSON report
    #[arg(long, default_value = "report.json")]
    report: PathBuf,

    /// Fail on malformed lap time rows instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn ingest_mode(&self) -> IngestMode {
        if self.strict {
            IngestMode::Strict
        } else {
            IngestMode::Lenient
        }
    }

    fn options(&self) -> Options {
        Options::default().with_k(self.k)
    }

    fn filter(&self) -> LapFilter {
        LapFilter::new(self.race, self.lap)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> laptime_topk::Result<()> {
    let rows = ingest::load_lap_times(&cli.lap_times, cli.ingest_mode())?;
    let drivers = DriverDirectory::load(&cli.drivers)?;

    let driver = RetrievalDriver::new(cli.options());
    let comparison = driver.compare(&rows, cli.filter());

    let report = Report::from_comparison(&comparison, &drivers);
    print!("{report}");
    report.write_json(&cli.report)
}

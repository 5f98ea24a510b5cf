use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use posetrack_rs::integration::replay::{Replayer, read_records};
use posetrack_rs::tracker::EventKind;
use posetrack_rs::{TrackerConfig, TrackerError};

#[derive(Parser)]
#[command(version, about, author)]
struct ReplayCli {
    /// path to a JSON-lines detection recording
    #[arg(short, long)]
    input: String,

    /// optional JSON tracker config
    #[arg(short, long)]
    config: Option<String>,

    /// override the expiry scan period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

fn run(cli: &ReplayCli) -> Result<(), TrackerError> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(tick_ms) = cli.tick_ms {
        config.expiry_interval_ms = tick_ms;
    }

    let mut replayer = Replayer::new(config)?;
    let events = replayer.subscribe();
    let reader = BufReader::new(File::open(&cli.input)?);

    let mut count = 0usize;
    for record in read_records(reader) {
        let record = record?;
        let t_ms = record.t_ms;
        if let Err(e) = replayer.push(record) {
            log::warn!("skipping detection at {t_ms} ms: {e}");
        }
        count += 1;

        for event in events.try_iter() {
            let kind = event.kind();
            let t = event.into_tracker();
            match kind {
                EventKind::Added => log::info!("{t_ms:>8} ms  added   {}", t.guid()),
                EventKind::Expired => {
                    log::info!("{t_ms:>8} ms  expired {} ({} samples)", t.guid(), t.samples())
                }
            }
        }
    }

    let tracker = replayer.tracker();
    println!(
        "replayed {count} detections over {} ms, {} live tracker(s)",
        replayer.now_ms(),
        tracker.len()
    );
    for t in tracker.trackers_by_age() {
        println!(
            "{:<24} age {:>6} ms  samples {:>5}",
            t.guid().as_str(),
            t.elapsed_ms(),
            t.samples()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = ReplayCli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

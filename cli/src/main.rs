mod config;
mod frame_decoder;
mod iq_io;
mod logging;
mod telemetry;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use config::Cli;
use ieee80211ag_core::config::{ChannelImpairmentConfig, ReceiveOptions, TransmitOptions};
use ieee80211ag_core::frame_fields::append_crc32;
use ieee80211ag_core::{FrameResult, Receiver, Transmitter};
use logging::{LogEvent, StructuredLogger};
use telemetry::TelemetryAggregator;

fn receive_options(args: &Cli) -> ReceiveOptions {
    ReceiveOptions {
        correct_frequency_offset: args.correct_frequency_offset,
        use_max_ratio_combining: args.use_max_ratio_combining,
        sample_advance: args.sample_advance,
        ..ReceiveOptions::default()
    }
}

/// Build one synthetic frame through the reference transmitter and channel
/// impairment model, for `--self-test` runs with no capture on disk.
fn run_self_test(args: &Cli, logger: &StructuredLogger) -> Result<Vec<(String, FrameResult)>> {
    let payload: Vec<u8> = (0..args.self_test_psdu_len).map(|i| (i % 256) as u8).collect();
    let psdu = append_crc32(&payload);
    let tx_opts = TransmitOptions { random_seed: args.random_seed, leading_padding: 160, trailing_padding: 160 };

    let tx = Transmitter::new().transmit(&psdu, args.self_test_rate_key, &tx_opts)?;
    logger.log(LogEvent::Info {
        message: format!(
            "self-test: {} byte PSDU at rate_key={:#06b}, {} samples, scrambler_seed={}",
            psdu.len(),
            args.self_test_rate_key,
            tx.samples.len(),
            tx.scrambler_seed
        ),
    })?;

    let mut rng = match args.random_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let impaired = ieee80211ag_core::channel_sim::apply_defects(&tx.samples, &ChannelImpairmentConfig::default(), &mut rng);

    let result = Receiver::new().receive(&impaired, &receive_options(args));
    Ok(vec![("self-test".to_string(), result)])
}

fn run_iq_file(path: &std::path::Path, args: &Cli) -> Result<Vec<(String, FrameResult)>> {
    let samples = iq_io::read_iq_file(path)?;
    let result = Receiver::new().receive(&samples, &receive_options(args));
    let label = path.file_stem().and_then(|s| s.to_str()).unwrap_or("capture").to_string();
    Ok(vec![(label, result)])
}

fn run_frame_archive(dir: &std::path::Path, args: &Cli) -> Result<Vec<(String, FrameResult)>> {
    let frames = iq_io::read_frame_archive(dir)?;
    if frames.is_empty() {
        return Err(eyre!("no *.iq files found under {}", dir.display()));
    }

    let progress = ProgressBar::new(frames.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames ({eta})").unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let opts = receive_options(args);
    let results: Vec<(String, FrameResult)> = frames
        .par_iter()
        .map(|frame| {
            let result = Receiver::new().receive(&frame.samples, &opts);
            progress.inc(1);
            (frame.label.clone(), result)
        })
        .collect();
    progress.finish_and_clear();

    Ok(results)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let logger = StructuredLogger::new(args.log_format);
    logger.log(LogEvent::Info { message: "starting 802.11a/g receive run".to_string() })?;

    let outcomes = if args.self_test {
        run_self_test(&args, &logger)?
    } else if let Some(path) = &args.iq_file {
        run_iq_file(path, &args)?
    } else if let Some(dir) = &args.frame_archive {
        run_frame_archive(dir, &args)?
    } else {
        unreachable!("clap's input_mode ArgGroup guarantees exactly one is set")
    };

    let mut telemetry = TelemetryAggregator::new();
    for (label, result) in &outcomes {
        telemetry.record(result);
        logger.log(LogEvent::Frame(frame_decoder::describe_frame(label.clone(), result, args.verbose)))?;
    }

    logger.log(LogEvent::Statistics(telemetry.finish(logger.elapsed())))?;

    Ok(())
}

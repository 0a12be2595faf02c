//! pcm2wav - Raw PCM to WAV Converter

use anyhow::Context;
use clap::Parser;
use log::warn;
use std::process;
use pcm2wav::{init_logging, verify_wav_file, Args, Config, PcmFormat, WavInfo};

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_args_and_config(args)?;

    // After the config file, so `[logging] verbose` applies too.
    init_logging(config.verbose());

    if config.verbose() {
        println!("{}", pcm2wav::get_library_info());
        println!();
    }

    let report = config.converter().convert(&config.input_path, &config.output_path)?;

    println!("Input: {}", report.input_path.display());
    println!("Output: {}", report.output_path.display());
    println!("PCM bytes: {}", report.pcm_bytes);
    println!("Duration: {:.3}s", report.duration_secs);

    if config.verify() {
        verify_wav_file(&report.output_path, report.pcm_bytes)
            .with_context(|| format!("verifying {}", report.output_path.display()))?;

        let format = PcmFormat::default();
        if report.pcm_bytes % format.block_align() as u64 == 0 {
            let info = WavInfo::from_file(&report.output_path)
                .with_context(|| format!("reading back {}", report.output_path.display()))?;
            println!("Verified: {}", info);
        } else {
            warn!(
                "{} PCM bytes is not a whole number of {}-byte samples, players may ignore the trailing byte",
                report.pcm_bytes, format.block_align()
            );
            println!("Verified: header and {} payload bytes", report.pcm_bytes);
        }
    }

    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{command, CommandFactory, Parser};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
};
use typical_core::sampler::typical::{DecodeMode, TypicalSampler};

use crate::route::DecodeRequest;

mod config;
mod route;

pub async fn load_config(path: impl AsRef<Path>) -> Result<config::Config> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents).await?;
    Ok(toml::from_str(&contents)?)
}

/// Parse one decoding step: numbers separated by whitespace or commas.
pub fn parse_scores(line: &str) -> Result<Vec<f32>> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<f32>()
                .with_context(|| format!("invalid score `{x}`"))
        })
        .collect()
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Probability mass of typical tokens to keep, in (0, 1].
    #[arg(long, short)]
    threshold: Option<f32>,
    /// `sample` or `greedy`.
    #[arg(long, short)]
    mode: Option<DecodeMode>,
    #[arg(long, short)]
    seed: Option<u64>,
    #[arg(long, short)]
    verbose: bool,
}

async fn run(args: Args) -> Result<()> {
    let mut config = {
        let path = args
            .config
            .clone()
            .unwrap_or("assets/configs/Config.toml".into());
        log::info!("reading config {}...", path.to_string_lossy());
        match load_config(&path).await {
            Ok(config) => config,
            Err(err) if args.config.is_some() => {
                return Err(err.context(format!("load config {}", path.to_string_lossy())))
            }
            Err(err) => {
                log::warn!("failed to read config: {err}, using defaults");
                Default::default()
            }
        }
    };

    if let Some(threshold) = args.threshold {
        config.decoder.mass_threshold = threshold;
    }
    if let Some(mode) = args.mode {
        config.decoder.mode = mode;
    }
    if let Some(seed) = args.seed {
        config.decoder.seed = Some(seed);
    }
    let sampler = TypicalSampler::new(config.decoder).context("invalid decoder config")?;

    let (sender, receiver) = flume::unbounded::<DecodeRequest>();
    let worker = tokio::spawn(route::decode_route(receiver, sampler));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_number = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let scores = match parse_scores(&line) {
            Ok(scores) if scores.is_empty() => continue,
            Ok(scores) => scores,
            Err(err) => {
                log::warn!("line {line_number}: {err:#}");
                continue;
            }
        };

        let (reply, response) = flume::bounded(1);
        sender
            .send_async(DecodeRequest {
                scores,
                sender: reply,
            })
            .await
            .map_err(|_| anyhow!("decoder stopped"))?;
        match response.recv_async().await {
            Ok(Ok(token)) => println!("{token}"),
            Ok(Err(err)) => log::warn!("line {line_number}: {err}"),
            Err(_) => bail!("decoder stopped"),
        }
    }

    drop(sender);
    worker.await?
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        true => log::LevelFilter::Trace,
        false => log::LevelFilter::Info,
    };
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .with_module_level("typical", level)
        .with_module_level("typical_core", level)
        .init()
        .expect("start logger");

    let cmd = Args::command();
    let version = cmd.get_version().unwrap_or("0.0.1");
    let bin_name = cmd.get_bin_name().unwrap_or("typical");

    log::info!("{}\tversion: {}", bin_name, version);

    if let Err(err) = run(args).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_separators() {
        assert_eq!(
            parse_scores("5.0, 1 1.0,\t-2e1").unwrap(),
            vec![5.0, 1.0, 1.0, -20.0]
        );
        assert!(parse_scores("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_sentinels() {
        let scores = parse_scores("-inf 0.5 NaN").unwrap();
        assert_eq!(scores[0], f32::NEG_INFINITY);
        assert!(scores[2].is_nan());
        assert!(parse_scores("1.0 abc").is_err());
    }

    #[test]
    fn args_override() {
        let args = Args::try_parse_from(["typical", "-t", "0.5", "--mode", "greedy", "-s", "3"])
            .unwrap();
        assert_eq!(args.threshold, Some(0.5));
        assert_eq!(args.mode, Some(DecodeMode::Greedy));
        assert_eq!(args.seed, Some(3));
        assert!(Args::try_parse_from(["typical", "--mode", "beam"]).is_err());
    }
}

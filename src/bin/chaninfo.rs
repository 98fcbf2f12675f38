use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chankit::{
    channel_type, infer_meg_system, open_raw, rename_channels, Alias, ChannelOps, ChannelType,
};

#[derive(Parser)]
#[command(name = "chaninfo", about = "Inspect and edit the channels of a FIF recording")]
struct Args {
    /// Input .fif file
    input: PathBuf,

    /// Channel names to drop (comma-separated)
    #[arg(long)]
    drop: Option<String>,

    /// Renames to apply, as old=new pairs (comma-separated)
    #[arg(long)]
    rename: Option<String>,

    /// Read the data buffers after the channel edits and report the shape
    #[arg(long)]
    preload: bool,

    /// List every channel with its resolved type
    #[arg(long)]
    list: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut raw = open_raw(&args.input)?;

    println!(
        "{}: {} ch × {} samples @ {} Hz ({:.1} s, {} buffers)",
        args.input.display(),
        raw.info.n_chan,
        raw.n_times(),
        raw.info.sfreq,
        raw.duration_secs(),
        raw.n_buffers(),
    );
    if !raw.info.bads.is_empty() {
        println!("bad channels: {}", raw.info.bads.join(", "));
    }
    if raw.contains("meg")? {
        println!("MEG system: {}", infer_meg_system(&raw.info));
    }

    if let Some(drop) = &args.drop {
        let names: Vec<&str> = drop.split(',').map(str::trim).collect();
        raw.drop_channels(&names)?;
        println!("dropped {} channel(s), {} remain", names.len(), raw.info.n_chan);
    }

    if let Some(rename) = &args.rename {
        let alias = parse_renames(rename)?;
        rename_channels(&mut raw.info, &alias)?;
        println!("renamed {} channel(s)", alias.len());
    }

    if args.list {
        for idx in 0..raw.info.n_chan {
            let label = match channel_type(&raw.info, idx) {
                Ok(t) => t.as_str(),
                Err(_) => "?",
            };
            println!("{idx:4}  {:12}  {label}", raw.info.chs[idx].name);
        }
    } else {
        print_type_counts(&raw);
    }

    if args.preload {
        raw.preload()?;
        let data = raw.data().ok_or_else(|| anyhow::anyhow!("preload produced no data"))?;
        println!("data: [{} x {}] f64", data.nrows(), data.ncols());
    }

    Ok(())
}

/// Parse `old=new` pairs separated by commas.
fn parse_renames(arg: &str) -> Result<Vec<(String, Alias)>> {
    let mut alias = Vec::new();
    for pair in arg.split(',') {
        match pair.split_once('=') {
            Some((old, new)) if !old.trim().is_empty() && !new.trim().is_empty() => {
                alias.push((old.trim().to_string(), Alias::name(new.trim())));
            }
            _ => bail!("malformed rename '{pair}' (expected old=new)"),
        }
    }
    Ok(alias)
}

/// Count channels per resolved type and print the non-zero buckets.
fn print_type_counts(raw: &chankit::Raw) {
    let mut counts = [0usize; ChannelType::ALL.len()];
    let mut other = 0usize;
    for idx in 0..raw.info.n_chan {
        match channel_type(&raw.info, idx) {
            Ok(t) => {
                if let Some(slot) = ChannelType::ALL.iter().position(|x| *x == t) {
                    counts[slot] += 1;
                }
            }
            Err(_) => other += 1,
        }
    }
    let mut parts = Vec::new();
    for (t, n) in ChannelType::ALL.iter().zip(counts) {
        if n > 0 {
            parts.push(format!("{n} {t}"));
        }
    }
    if other > 0 {
        parts.push(format!("{other} unclassified"));
    }
    println!("types: {}", parts.join(", "));
}

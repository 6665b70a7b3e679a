use anyhow::Context;
use clap::Parser;
use mp4meta::{MediaInfo, TrackKind};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Media info summary for MP4/ISOBMFF files")]
struct Args {
    /// MP4/ISOBMFF file path
    path: PathBuf,

    /// Output as JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut file =
        File::open(&args.path).with_context(|| format!("opening {}", args.path.display()))?;

    let info = mp4meta::parse(&mut file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_human(&args.path, &info);
    }

    Ok(())
}

fn print_human(path: &Path, info: &MediaInfo) {
    println!("File: {}", path.display());
    if let Some(t) = info.creation_time {
        println!("Created:  {}", t);
    }
    if let Some(t) = info.modification_time {
        println!("Modified: {}", t);
    }
    if let Some(d) = info.duration {
        println!("Duration: {} s", d.as_secs());
    }
    if let (Some(w), Some(h)) = (info.width, info.height) {
        println!("Picture:  {}x{}", w, h);
    }
    if let Some(rate) = info.sound_sampling_rate {
        println!("Sound sampling rate: {} Hz", rate);
    }

    if info.tracks.is_empty() {
        println!("Tracks: (none)");
        return;
    }

    println!("Tracks:");
    for (i, t) in info.tracks.iter().enumerate() {
        let kind = match t.kind {
            TrackKind::Video => "video",
            TrackKind::Sound => "sound",
        };
        println!("  Track {} ({}):", i + 1, kind);
        if !t.name.is_empty() {
            println!("    handler: {}", t.name);
        }
        println!("    duration: {} ticks", t.duration);
        println!("    volume: {}", t.volume);
        if let (Some(w), Some(h)) = (t.width, t.height) {
            println!("    size: {}x{}", w, h);
        }
        if let Some(rate) = t.sampling_rate {
            println!("    sampling rate: {} Hz", rate);
        }
    }
}

use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4meta::{BoxData, BoxNode, ParseError};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Minimal MP4/ISOBMFF box tree explorer")]
struct Args {
    /// MP4/ISOBMFF file path
    path: PathBuf,

    /// Limit recursion depth (for text/tree output)
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Print decoded fields when a decoder exists
    #[arg(long, action = ArgAction::SetTrue)]
    decode: bool,

    /// Emit JSON instead of a human-readable tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut file =
        File::open(&args.path).with_context(|| format!("opening {}", args.path.display()))?;

    let root = mp4meta::parse_tree(&mut file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&root.node.children)?);
        return Ok(());
    }

    for child in &root.node.children {
        print_box(&mut file, child, 0, args.max_depth, args.decode)?;
    }

    Ok(())
}

// Depth is a display concern only: computed while walking, never stored.
fn print_box<R: Read + Seek>(
    r: &mut R,
    node: &BoxNode,
    depth: usize,
    max_depth: usize,
    decode: bool,
) -> anyhow::Result<()> {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{:>8} {:>10} {}",
        format!("{:#x}", node.offset),
        node.header.size,
        node.header.typ
    );

    if decode && node.children.is_empty() {
        match BoxData::decode(r, node) {
            Ok(data) => println!("{indent}        -> {:?}", data),
            Err(ParseError::UnknownBoxType(_)) => {}
            Err(e) => println!("{indent}        -> [decode error: {}]", e),
        }
    }

    if depth + 1 <= max_depth {
        for c in &node.children {
            print_box(r, c, depth + 1, max_depth, decode)?;
        }
    }

    Ok(())
}

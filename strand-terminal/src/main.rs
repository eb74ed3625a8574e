/// Strand terminal tool: inspect, bake and preview hair strand files
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use strand_core::{FileResolver, HairConfig, HairShape, StrandStats, DEFAULT_RADIUS};
use strand_terminal::{Report, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strand-terminal", version, about = "Inspect, bake and preview hair strand files")]
struct Cli {
    /// Strand text file, or a baked store with --binary
    file: PathBuf,

    /// Radius shared by every sphere and cylinder
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: f32,

    /// Extra directories relative file names are looked up in
    #[arg(short = 'I', long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Read FILE as a baked binary store
    #[arg(long)]
    binary: bool,

    /// Write the binary store to this path
    #[arg(long, value_name = "OUT")]
    bake: Option<PathBuf>,

    /// Print segment and primitive counts
    #[arg(long)]
    stats: bool,

    /// Open the interactive preview
    #[arg(long)]
    view: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut resolver = FileResolver::default();
    for path in &cli.search_paths {
        resolver.append(path);
    }

    let (shape, strands) = load(&cli, &resolver)?;

    if let Some(out) = &cli.bake {
        bake(&shape, out)?;
    }

    if cli.stats || !cli.view {
        println!("{}", Report::new(&shape, strands));
    }

    if cli.view {
        let mut app = TerminalApp::new(shape).context("failed to start the terminal preview")?;
        app.run()?;
    }

    Ok(())
}

fn load(cli: &Cli, resolver: &FileResolver) -> Result<(HairShape, Option<StrandStats>)> {
    if cli.binary {
        let path = resolver.resolve(&cli.file);
        let file = File::open(&path)
            .with_context(|| format!("failed to open \"{}\"", path.display()))?;
        let shape = HairShape::read_from(&mut BufReader::new(file))
            .with_context(|| format!("failed to read baked strands from \"{}\"", path.display()))?;
        log::info!("Read {} baked hair segments", shape.segment_count());
        return Ok((shape, None));
    }

    let config = HairConfig::new(&cli.file).with_radius(cli.radius);
    let (shape, stats) = HairShape::load_with_stats(&config, resolver)
        .with_context(|| format!("failed to load hair geometry \"{}\"", cli.file.display()))?;
    Ok((shape, Some(stats)))
}

fn bake(shape: &HairShape, out: &Path) -> Result<()> {
    let file = File::create(out).with_context(|| format!("failed to create \"{}\"", out.display()))?;
    let mut writer = BufWriter::new(file);
    shape.write_to(&mut writer)?;
    writer.flush()?;
    log::info!(
        "Baked {} segments to \"{}\"",
        shape.segment_count(),
        out.display()
    );
    Ok(())
}

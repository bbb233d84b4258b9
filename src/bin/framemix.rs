use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "framemix", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported pixel formats and the kernels selected for each.
    Formats(FormatsArgs),
    /// Composite a JSON scene into a raw video file.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct FormatsArgs {
    /// Force the scalar kernels instead of probing the CPU.
    #[arg(long)]
    scalar: bool,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output file receiving raw frames back to back.
    #[arg(long)]
    out: PathBuf,

    /// Also write the last composed frame as a PNG.
    #[arg(long)]
    png: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Formats(args) => cmd_formats(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_formats(args: FormatsArgs) -> anyhow::Result<()> {
    let registry = if args.scalar {
        std::sync::Arc::new(framemix::Registry::with_tier(framemix::KernelTier::Scalar))
    } else {
        framemix::Registry::shared()
    };

    println!("{:<6} {:>6} {:>9} {:>7}", "format", "planes", "alignment", "kernels");
    for desc in registry.iter() {
        let (xa, ya) = desc.alignment();
        println!(
            "{:<6} {:>6} {:>9} {:>7}",
            desc.format().name(),
            desc.info().n_planes,
            format!("{xa}x{ya}"),
            desc.tier().name(),
        );
    }
    Ok(())
}

fn read_scene(path: &Path) -> anyhow::Result<framemix::SceneFile> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let scene: framemix::SceneFile =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse scene JSON")?;
    scene.validate()?;
    Ok(scene)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.scene)?;
    let (compositor, _handles) = scene.build()?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let mut sink = framemix::RawFileSink::create(&args.out)?;
    let stats = compositor.run(&mut sink)?;
    let info = compositor
        .output_info()
        .context("compositor never negotiated an output")?;

    eprintln!(
        "wrote {} ({} frames, {}x{} {} @ {} fps)",
        args.out.display(),
        stats.frames,
        info.width,
        info.height,
        info.format,
        info.fps,
    );

    if let Some(png) = &args.png {
        let frame = sink
            .last_frame()
            .context("no frame was composed, nothing to preview")?;
        let rgba = framemix::video::preview::to_rgba8(frame)?;
        image::save_buffer_with_format(
            png,
            &rgba,
            frame.width(),
            frame.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", png.display()))?;
        eprintln!("wrote {}", png.display());
    }

    let bytes = std::fs::read(&args.out)
        .with_context(|| format!("read back '{}'", args.out.display()))?;
    println!("sha256 {}", hex(&sha2::Sha256::digest(&bytes)));
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sprig", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a frame script into SVG markup.
    Render(RenderArgs),
    /// Print the signature of a JSON filter list.
    Signature(SignatureArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input frame script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Only render the first N frames.
    #[arg(long)]
    frames: Option<usize>,

    /// Force fps logging on, regardless of the script options.
    #[arg(long)]
    fps_log: bool,
}

#[derive(Parser, Debug)]
struct SignatureArgs {
    /// Filter list, e.g. `[{"type":"blur","value":2}]`.
    #[arg(long)]
    filters: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Signature(args) => cmd_signature(args),
    }
}

const STAGE_ID: &str = "stage";

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let script = sprig::FrameScript::from_path(&args.in_path)
        .with_context(|| format!("load frame script '{}'", args.in_path.display()))?;

    let mut opts = script.opts;
    opts.fps_log |= args.fps_log;

    let mut dom = sprig::MemoryDom::new();
    dom.create_container(STAGE_ID);
    let mut renderer = sprig::Renderer::new(
        dom,
        STAGE_ID.into(),
        script.width,
        script.height,
        opts,
    )?;

    let limit = args.frames.unwrap_or(script.frames.len());
    for frame in script.frames.iter().take(limit) {
        renderer.render(frame);
    }

    let svg = *renderer.surface().svg_element();
    let markup = renderer.surface().dom().to_markup(svg);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, markup)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!(
        "rendered {} frame(s), {} node(s); wrote {}",
        renderer.frames_rendered(),
        renderer.node_count(),
        args.out.display()
    );
    Ok(())
}

fn cmd_signature(args: SignatureArgs) -> anyhow::Result<()> {
    let filters: Vec<sprig::Filter> =
        serde_json::from_str(&args.filters).with_context(|| "parse filter list JSON")?;
    println!("{}", sprig::filter_signature(&filters));
    Ok(())
}

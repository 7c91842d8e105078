use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use strand_core::layout::ResolvedTrack;
use strand_core::spec::{Channel, Domain};
use strand_core::tabular::RawTile;
use strand_core::{
    CompileState, Compiled, NoValidation, SpecValidator, StructuralValidator, Theme, TrackRenderer,
    compile, compile_spec,
};
use strand_protocol::{RenderCommand, TileView};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "strand", version)]
struct Cli {
    /// Log filter, e.g. `warn` or `strand_core=debug`.
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize and lay out a spec, printing the compile result as JSON.
    Compile(CompileArgs),
    /// Draw tiles for every track of a spec into an SVG preview.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input spec JSON.
    spec: PathBuf,

    /// Skip the structural check of the raw document.
    #[arg(long, default_value_t = false)]
    no_validate: bool,

    /// Write the result here instead of stdout.
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input spec JSON.
    spec: PathBuf,

    /// Tiles per track id: `{"<track id>": [tile, ...]}`.
    #[arg(long)]
    tiles: Option<PathBuf>,

    /// Output SVG path.
    #[arg(long, short)]
    out: PathBuf,

    /// Built-in theme name (`light`, `dark`) or a theme JSON file.
    #[arg(long, default_value = "light")]
    theme: String,

    /// Start of the visible genomic interval.
    #[arg(long, requires = "end")]
    start: Option<f64>,

    /// End of the visible genomic interval.
    #[arg(long, requires = "start")]
    end: Option<f64>,

    /// Zoom level reported to semantic-zoom conditions.
    #[arg(long, default_value_t = 0.0)]
    zoom: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid --log filter")?)
        .with_writer(std::io::stderr)
        .init();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(&args),
        Command::Render(args) => cmd_render(&args),
    }
}

fn validator(skip: bool) -> &'static dyn SpecValidator {
    if skip { &NoValidation } else { &StructuralValidator }
}

fn cmd_compile(args: &CompileArgs) -> anyhow::Result<()> {
    let json = read(&args.spec)?;
    let result = compile(&json, validator(args.no_validate));
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    let rendered = serde_json::to_string_pretty(&result)?;
    match &args.out {
        Some(path) => write(path, &rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }
    if result.state == CompileState::Error {
        bail!("{}", result.message);
    }
    Ok(())
}

fn cmd_render(args: &RenderArgs) -> anyhow::Result<()> {
    let json = read(&args.spec)?;
    let compiled = compile_spec(&json, &StructuralValidator)?;
    for warning in compiled.warnings() {
        tracing::warn!("{warning}");
    }

    let tiles: IndexMap<String, Vec<RawTile>> = match &args.tiles {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("parse tiles '{}'", path.display()))?,
        None => IndexMap::new(),
    };
    let theme = load_theme(&args.theme)?;

    let commands = draw_all(&compiled, &tiles, &theme, args);
    let svg = strand_core::svg::render_svg(&commands, compiled.width, compiled.height, &theme);
    write(&args.out, &svg)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn draw_all(
    compiled: &Compiled,
    tiles: &IndexMap<String, Vec<RawTile>>,
    theme: &Theme,
    args: &RenderArgs,
) -> Vec<RenderCommand> {
    let static_tile = [RawTile {
        key: "static".into(),
        ..RawTile::default()
    }];
    let mut commands = Vec::new();
    for resolved in &compiled.tracks {
        let label = resolved.track.label();
        let track_tiles = tiles.get(&label).map_or(&static_tile[..], Vec::as_slice);
        let x_domain = match (args.start, args.end) {
            (Some(start), Some(end)) => [start, end],
            _ => visible_domain(resolved, track_tiles),
        };
        let view = TileView {
            x_domain,
            zoom_level: args.zoom,
        };
        let mut renderer = TrackRenderer::new(resolved.clone(), theme.clone());
        // Load everything first so each tile is drawn with the merged domains.
        for tile in track_tiles {
            renderer.load_tile(tile);
        }
        for tile in track_tiles {
            commands.extend(renderer.draw_loaded(&tile.key, &view));
        }
        tracing::debug!(track = %label, tiles = track_tiles.len(), "rendered track");
    }
    commands
}

/// The interval to draw when none is given: the track's x domain, else
/// the span of its tiles, else the whole assembly.
fn visible_domain(resolved: &ResolvedTrack, tiles: &[RawTile]) -> [f64; 2] {
    let track = &resolved.track;
    let assembly = track.assembly.unwrap_or_default();
    let declared = track
        .x
        .as_ref()
        .and_then(Channel::as_deep)
        .and_then(|x| x.domain.as_ref());
    let declared = match declared {
        Some(Domain::Numbers(n)) if n.len() == 2 => Some([n[0], n[1]]),
        Some(Domain::Genomic(genomic)) => assembly.resolve_domain(genomic),
        _ => None,
    };
    if let Some(domain) = declared {
        return domain;
    }
    let spans = tiles.iter().filter_map(RawTile::interval);
    let covered = spans.fold(None, |acc: Option<[f64; 2]>, [a, b]| {
        Some(acc.map_or([a, b], |[lo, hi]| [lo.min(a), hi.max(b)]))
    });
    covered.unwrap_or([0.0, assembly.total_size()])
}

fn load_theme(name: &str) -> anyhow::Result<Theme> {
    match Theme::builtin(name) {
        Ok(theme) => Ok(theme),
        Err(_) if Path::new(name).is_file() => Ok(Theme::from_json(&read(Path::new(name))?)?),
        Err(err) => Err(err.into()),
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}

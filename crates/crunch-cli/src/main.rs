use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use crunch_core::compositing::blit_rgba;
use crunch_core::config::{parse_padding, parse_page_size, Config};
use crunch_core::error::CrunchError;
use crunch_core::fingerprint;
use crunch_core::manifest::build_manifest;
use crunch_core::serialize::{to_bin, to_json, to_xml};
use crunch_core::{build_bitmap, pack, Bitmap, DecodedImage};
use image::{ImageReader, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use walkdir::WalkDir;

const MAX_PAGE_INDEX: u32 = 16;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "crunch",
    about = "Pack a folder of PNGs into texture atlas pages plus an XML/JSON/BIN manifest",
    version
)]
struct Cli {
    /// Output path prefix; the final filename stem is used as the atlas name.
    output: PathBuf,
    /// Comma-separated list of input files or directories.
    #[arg(value_delimiter = ',')]
    inputs: Vec<PathBuf>,

    /// Equivalent to -x -p -t -u.
    #[arg(short = 'd', long = "default")]
    default_flags: bool,
    /// Emit an XML manifest.
    #[arg(short = 'x', long = "xml")]
    xml: bool,
    /// Emit a binary manifest.
    #[arg(short = 'b', long = "binary")]
    binary: bool,
    /// Emit a JSON manifest.
    #[arg(short = 'j', long = "json")]
    json: bool,
    /// Premultiply alpha. Short form is `-p` (disambiguated from `-p<N>` / `--pad`).
    #[arg(long = "premultiply")]
    premultiply: bool,
    /// Tight-trim bitmaps to their opaque bounding box.
    #[arg(short = 't', long = "trim")]
    trim: bool,
    /// Print progress to stdout.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
    /// Bypass the fingerprint gate.
    #[arg(short = 'f', long = "force")]
    force: bool,
    /// Deduplicate by pixel equality.
    #[arg(short = 'u', long = "unique")]
    unique: bool,
    /// Allow 90 degree clockwise rotation.
    #[arg(short = 'r', long = "rotate")]
    rotate: bool,
    /// Page size; one of 64/128/256/512/1024/2048/4096.
    #[arg(long = "size", value_parser = parse_page_size, default_value_t = 4096)]
    size: u32,
    /// Padding between placements, in pixels (0..=16).
    #[arg(long = "pad", value_parser = parse_padding, default_value_t = 1)]
    pad: u32,
}

fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let cli = Cli::parse_from(normalize_args(raw_args.clone()));
    init_tracing(cli.verbose);

    match run(&cli, &raw_args[1..]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("crunch: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, raw_arg_tokens: &[String]) -> anyhow::Result<()> {
    let mut cli = cli.clone();
    if cli.default_flags {
        cli.xml = true;
        cli.premultiply = true;
        cli.trim = true;
        cli.unique = true;
    }
    if cli.inputs.is_empty() {
        return Err(CrunchError::InvalidArguments("at least one input path is required".into()).into());
    }

    let cfg = Config {
        page_size: cli.size,
        padding: cli.pad,
        premultiply: cli.premultiply,
        trim: cli.trim,
        unique: cli.unique,
        allow_rotation: cli.rotate,
    };
    cfg.validate()?;

    let output_prefix = cli.output.to_string_lossy().replace('\\', "/");
    let inputs = gather_inputs(&cli.inputs)?;
    if inputs.is_empty() {
        return Err(CrunchError::InvalidArguments("no PNG inputs found".into()).into());
    }

    let file_contents = read_all(&inputs)?;
    let new_fingerprint = fingerprint::compute(raw_arg_tokens, &file_contents);
    let hash_path = format!("{output_prefix}.hash");

    if !cli.force {
        if let Some(old) = read_existing_fingerprint(&hash_path)? {
            if old == new_fingerprint {
                println!("atlas is unchanged");
                return Ok(());
            }
        }
    }

    delete_previous_outputs(&output_prefix)?;

    let bitmaps = load_bitmaps(&inputs, &cfg, cli.verbose)?;
    let out = pack(&bitmaps, &cfg)?;
    if cli.verbose {
        info!(pages = out.pages.len(), "packed");
    }

    if let Some(parent) = Path::new(&output_prefix).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory {}", parent.display()))?;
        }
    }

    for (i, page) in out.pages.iter().enumerate() {
        let mut canvas = RgbaImage::new(page.width, page.height);
        for placement in &page.placements {
            if placement.duplicate_of.is_some() {
                continue;
            }
            let bmp = &bitmaps[placement.bitmap_ref];
            blit_rgba(&bmp.pixels, &mut canvas, placement.x, placement.y, placement.rotated);
        }
        let png_path = format!("{output_prefix}{i}.png");
        canvas
            .save(&png_path)
            .map_err(|source| CrunchError::PngEncode {
                path: PathBuf::from(&png_path),
                source,
            })?;
        if cli.verbose {
            info!(path = %png_path, "wrote page");
        }
    }

    let manifest = build_manifest(&output_prefix, &out.pages, &bitmaps);

    if cli.xml {
        let path = format!("{output_prefix}.xml");
        write_text(&path, &to_xml(&manifest, cli.trim, cli.rotate))?;
    }
    if cli.json {
        let path = format!("{output_prefix}.json");
        let value = to_json(&manifest, cli.trim, cli.rotate);
        write_text(&path, &serde_json::to_string_pretty(&value)?)?;
    }
    if cli.binary {
        let path = format!("{output_prefix}.bin");
        write_bytes(&path, &to_bin(&manifest, cli.trim, cli.rotate))?;
    }

    write_text(&hash_path, &new_fingerprint.to_string())?;

    Ok(())
}

/// Rewrites `-s<N>`/`-p<N>` (attached-digit short flags) into their long
/// forms before clap ever sees them, and leaves a bare `-p` as
/// `--premultiply`. Long (`--`) tokens pass through untouched.
fn normalize_args(raw: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(raw.len());
    for arg in raw {
        if arg.starts_with("--") {
            out.push(arg);
            continue;
        }
        if let Some(rest) = arg.strip_prefix("-s") {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                out.push("--size".to_string());
                out.push(rest.to_string());
                continue;
            }
        }
        if let Some(rest) = arg.strip_prefix("-p") {
            if rest.is_empty() {
                out.push("--premultiply".to_string());
                continue;
            }
            if rest.bytes().all(|b| b.is_ascii_digit()) {
                out.push("--pad".to_string());
                out.push(rest.to_string());
                continue;
            }
        }
        out.push(arg);
    }
    out
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "error" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// Discovers input files: directories are walked recursively (sorted
/// lexicographically by full path, per the portability requirement this
/// crate carries over the host filesystem's unspecified iteration order);
/// single-file inputs are included directly rather than skipped.
fn gather_inputs(roots: &[PathBuf]) -> anyhow::Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    for root in roots {
        if root.is_dir() {
            for entry in WalkDir::new(root) {
                let entry = entry.map_err(|e| CrunchError::IoRead {
                    path: root.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, e),
                })?;
                if entry.file_type().is_file() && is_png(entry.path()) {
                    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    out.push((entry.path().to_path_buf(), relative_name(rel)));
                }
            }
        } else {
            let name = relative_name(Path::new(root.file_name().unwrap_or(root.as_os_str())));
            out.push((root.clone(), name));
        }
    }
    out.sort_by(|a, b| a.0.to_string_lossy().cmp(&b.0.to_string_lossy()));
    Ok(out)
}

fn is_png(p: &Path) -> bool {
    matches!(
        p.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("png")
    )
}

fn relative_name(p: &Path) -> String {
    p.with_extension("").to_string_lossy().replace('\\', "/")
}

fn read_all(inputs: &[(PathBuf, String)]) -> anyhow::Result<Vec<Vec<u8>>> {
    inputs
        .iter()
        .map(|(path, _)| {
            fs::read(path).map_err(|source| {
                CrunchError::IoRead {
                    path: path.clone(),
                    source,
                }
                .into()
            })
        })
        .collect()
}

fn load_bitmaps(
    inputs: &[(PathBuf, String)],
    cfg: &Config,
    verbose: bool,
) -> anyhow::Result<Vec<Bitmap>> {
    let bar = if verbose {
        let b = ProgressBar::new(inputs.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };

    let mut bitmaps = Vec::with_capacity(inputs.len());
    for (path, name) in inputs {
        if let Some(b) = &bar {
            b.set_message(name.clone());
        } else {
            info!(?path, "loading");
        }
        let decoded = ImageReader::open(path)
            .map_err(|source| CrunchError::IoRead {
                path: path.clone(),
                source,
            })?
            .decode()
            .map_err(|source| CrunchError::PngDecode {
                path: path.clone(),
                source,
            })?;
        bitmaps.push(build_bitmap(
            DecodedImage {
                name: name.clone(),
                pixels: decoded.to_rgba8(),
            },
            cfg.premultiply,
            cfg.trim,
        ));
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(bitmaps)
}

fn read_existing_fingerprint(path: &str) -> anyhow::Result<Option<u64>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s.trim().parse::<u64>().ok()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CrunchError::IoRead {
            path: PathBuf::from(path),
            source,
        }
        .into()),
    }
}

/// Unconditionally removes any outputs from a previous run before writing
/// new ones, per the persisted-state contract.
fn delete_previous_outputs(output_prefix: &str) -> anyhow::Result<()> {
    for suffix in [".hash", ".bin", ".xml", ".json"] {
        remove_if_exists(&format!("{output_prefix}{suffix}"))?;
    }
    for i in 0..MAX_PAGE_INDEX {
        remove_if_exists(&format!("{output_prefix}{i}.png"))?;
    }
    Ok(())
}

fn remove_if_exists(path: &str) -> anyhow::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CrunchError::IoWrite {
            path: PathBuf::from(path),
            source,
        }
        .into()),
    }
}

fn write_text(path: &str, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).map_err(|source| {
        CrunchError::IoWrite {
            path: PathBuf::from(path),
            source,
        }
        .into()
    })
}

fn write_bytes(path: &str, contents: &[u8]) -> anyhow::Result<()> {
    fs::write(path, contents).map_err(|source| {
        CrunchError::IoWrite {
            path: PathBuf::from(path),
            source,
        }
        .into()
    })
}

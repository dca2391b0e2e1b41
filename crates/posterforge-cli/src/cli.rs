//! Argument parsing and command execution.

use posterforge_core::{EditorConfig, SizePreset, TemplateRecord};
use posterforge_render::{HtmlRenderer, PreviewRenderer, Renderer};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: posterforge <COMMAND>

Commands:
  render <TEMPLATE>   Export a saved template as HTML
  preview <TEMPLATE>  Print the scaled preview layout as JSON
  sizes               List the available output sizes

Options:
  --out <FILE>             Write output to FILE instead of stdout
  --standalone             Wrap exported HTML in a full page
  --preview-height <PX>    Preview viewport height (default from config)
  --config <FILE>          Editor configuration (JSON)
  --json                   Machine-readable output for `sizes`
  -h, --help               Print this help message";

/// Command-line errors.
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },
}

/// Options shared by the template commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateArgs {
    pub template: PathBuf,
    pub out: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub preview_height: Option<f64>,
    pub standalone: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render(TemplateArgs),
    Preview(TemplateArgs),
    Sizes { json: bool },
    Help,
}

pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    match args {
        [] => Err(CliError::Usage("missing command".into())),
        [flag, ..] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [cmd, rest @ ..] if cmd == "sizes" => match rest {
            [] => Ok(Command::Sizes { json: false }),
            [flag] if flag == "--json" => Ok(Command::Sizes { json: true }),
            _ => Err(CliError::Usage("unexpected arguments for `sizes`".into())),
        },
        [cmd, rest @ ..] if cmd == "render" => parse_template_args(rest).map(Command::Render),
        [cmd, rest @ ..] if cmd == "preview" => parse_template_args(rest).map(Command::Preview),
        [cmd, ..] => Err(CliError::Usage(format!("unknown command `{cmd}`"))),
    }
}

fn parse_template_args(args: &[String]) -> Result<TemplateArgs, CliError> {
    let mut parsed = TemplateArgs::default();
    let mut template = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => parsed.out = Some(flag_value(&mut iter, "--out")?.into()),
            "--config" => parsed.config = Some(flag_value(&mut iter, "--config")?.into()),
            "--standalone" => parsed.standalone = true,
            "--preview-height" => {
                let value = flag_value(&mut iter, "--preview-height")?;
                let height = value
                    .parse::<f64>()
                    .ok()
                    .filter(|h| h.is_finite() && *h > 0.0)
                    .ok_or_else(|| CliError::InvalidValue {
                        flag: "--preview-height",
                        value: value.to_string(),
                    })?;
                parsed.preview_height = Some(height);
            }
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option `{flag}`")));
            }
            path if template.is_none() => template = Some(PathBuf::from(path)),
            extra => return Err(CliError::Usage(format!("unexpected argument `{extra}`"))),
        }
    }
    parsed.template = template.ok_or_else(|| CliError::Usage("missing template file".into()))?;
    Ok(parsed)
}

fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &'static str,
) -> Result<&'a str, CliError> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))
}

/// Execute a parsed command, writing primary output to `stdout` unless an
/// output file was requested.
pub fn run(command: Command, stdout: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Help => writeln!(stdout, "{USAGE}")?,
        Command::Sizes { json } => list_sizes(json, stdout)?,
        Command::Render(args) => {
            let record = load_template(&args)?;
            let document = record.to_document();
            let renderer = if args.standalone {
                HtmlRenderer::standalone()
            } else {
                HtmlRenderer::new()
            };
            let html = renderer.render_document(&document)?;
            emit(&args, &html, stdout)?;
        }
        Command::Preview(args) => {
            let config = load_config(&args)?;
            let height = args.preview_height.unwrap_or(config.preview_height);
            let record = load_template(&args)?;
            let document = record.to_document();
            let tree = PreviewRenderer::new(height)?.render_document(&document)?;
            let viewport = tree.viewport();
            let nodes: Vec<_> = tree
                .projection
                .nodes
                .iter()
                .map(|n| {
                    serde_json::json!({
                        "elementId": n.element_id,
                        "left": n.left,
                        "top": n.top,
                        "width": n.width,
                        "height": n.height,
                        "rotation": n.rotation,
                        "zIndex": n.z_index,
                        "style": n.style_attr(),
                    })
                })
                .collect();
            let summary = serde_json::json!({
                "scale": tree.scale,
                "viewport": { "width": viewport.width, "height": viewport.height },
                "canvas": { "width": tree.projection.width, "height": tree.projection.height },
                "nodes": nodes,
            });
            emit(&args, &serde_json::to_string_pretty(&summary)?, stdout)?;
        }
    }
    Ok(())
}

fn load_config(args: &TemplateArgs) -> Result<EditorConfig, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => {
            let config = EditorConfig::load(path)?;
            config.validate()?;
            log::info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(EditorConfig::default()),
    }
}

fn load_template(args: &TemplateArgs) -> Result<TemplateRecord, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(&args.template)
        .map_err(|e| format!("failed to read {}: {e}", args.template.display()))?;
    let record = TemplateRecord::from_json(&json)
        .map_err(|e| format!("failed to parse {}: {e}", args.template.display()))?;
    log::info!(
        "template {} ({}x{}, {} elements)",
        record.id,
        record.canvas_width,
        record.canvas_height,
        record.elements.len()
    );
    Ok(record)
}

fn emit(
    args: &TemplateArgs,
    output: &str,
    stdout: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match &args.out {
        Some(path) => {
            fs::write(path, output)?;
            log::info!("wrote {} bytes to {}", output.len(), path.display());
        }
        None => stdout.write_all(output.as_bytes())?,
    }
    Ok(())
}

fn list_sizes(json: bool, stdout: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(SizePreset::all())?)?;
        return Ok(());
    }
    for preset in SizePreset::all() {
        writeln!(
            stdout,
            "{:<14} {:>4}x{:<4} {}",
            preset.id, preset.width, preset.height, preset.label
        )?;
    }
    Ok(())
}

use std::env;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use markup_runs::{MarkupRenderer, RenderOptions, StyleValue, TagStyleTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
    Runs,
}

impl OutputFormat {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "runs" => Some(Self::Runs),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    input: String,
    format: OutputFormat,
    base_font_size: f32,
    tag_styles_path: Option<String>,
    use_defaults: bool,
    pretty: bool,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cli = parse_args(args)?;
    let markup = read_input(&cli.input)?;

    let mut tag_styles = if cli.use_defaults {
        TagStyleTable::html_defaults()
    } else {
        TagStyleTable::new()
    };
    if let Some(path) = &cli.tag_styles_path {
        let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
        let overrides: TagStyleTable =
            serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path, e))?;
        tag_styles.extend(overrides);
    }

    let options = RenderOptions {
        base_font_size: cli.base_font_size,
        ..RenderOptions::default()
    };
    let renderer = MarkupRenderer::new(options).with_tag_styles(tag_styles);
    let rendered = renderer.render(&markup).map_err(|e| e.to_string())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(rendered.fragments())
            } else {
                serde_json::to_string(rendered.fragments())
            }
            .map_err(|e| e.to_string())?;
            writeln!(out, "{}", json).map_err(|e| e.to_string())?;
        }
        OutputFormat::Text => {
            write!(out, "{}", rendered.plain_text()).map_err(|e| e.to_string())?;
        }
        OutputFormat::Runs => {
            for run in rendered.runs() {
                let style = run
                    .style
                    .iter()
                    .map(|(key, value)| match value {
                        StyleValue::Number(n) => format!("{}={}", key, n),
                        StyleValue::Text(t) => format!("{}={:?}", key, t),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{:?}\t{}", run.text, style).map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(())
}

fn read_input(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("stdin: {}", e))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        return Err("help requested".to_string());
    }

    let mut cfg = Args {
        input: "-".to_string(),
        format: OutputFormat::Json,
        base_font_size: RenderOptions::default().base_font_size,
        tag_styles_path: None,
        use_defaults: true,
        pretty: false,
    };

    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--format requires a value".to_string())?;
                cfg.format = OutputFormat::from_str(v)
                    .ok_or_else(|| format!("unknown --format value: {}", v))?;
                i += 2;
            }
            "--base-font-size" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--base-font-size requires a value".to_string())?;
                cfg.base_font_size = v
                    .parse::<f32>()
                    .ok()
                    .filter(|size| size.is_finite() && *size > 0.0)
                    .ok_or_else(|| format!("invalid --base-font-size: {}", v))?;
                i += 2;
            }
            "--tag-styles" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--tag-styles requires a value".to_string())?;
                cfg.tag_styles_path = Some(v.clone());
                i += 2;
            }
            "--no-defaults" => {
                cfg.use_defaults = false;
                i += 1;
            }
            "--pretty" => {
                cfg.pretty = true;
                i += 1;
            }
            other if other == "-" || !other.starts_with("--") => {
                cfg.input = other.to_string();
                i += 1;
            }
            other => return Err(format!("unknown option: {}", other)),
        }
    }
    Ok(cfg)
}

fn help_text() -> &'static str {
    r#"markup-runs - render a markup fragment into styled text runs

USAGE:
  cargo run --features cli --bin markup-runs -- [file|-] [options]

OPTIONS:
  --format <fmt>            json|text|runs (default: json)
  --pretty                  pretty-print JSON output
  --base-font-size <px>     ambient font size for the root (default: 16)
  --tag-styles <file>       JSON object of tag -> style overrides
  --no-defaults             start from an empty tag style table
  -h, --help                show this help
"#
}

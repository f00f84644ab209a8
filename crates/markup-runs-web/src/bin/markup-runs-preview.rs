use std::env;
use std::path::Path;
use std::process::ExitCode;

use markup_runs::{MarkupRenderer, RenderOptions};
use markup_runs_web::preview_page;

const DEFAULT_OUT_PATH: &str = "target/markup-preview/index.html";

#[derive(Clone, Debug)]
struct Args {
    input_path: String,
    out_path: String,
    title: Option<String>,
    base_font_size: f32,
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

    if cli.out_path.is_empty() {
        return Err("--out must not be empty".to_string());
    }
    if let Some(parent) = Path::new(&cli.out_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    let markup = std::fs::read_to_string(&cli.input_path)
        .map_err(|e| format!("{}: {}", cli.input_path, e))?;
    let options = RenderOptions {
        base_font_size: cli.base_font_size,
        ..RenderOptions::default()
    };
    let rendered = MarkupRenderer::new(options)
        .render(&markup)
        .map_err(|e| e.to_string())?;

    let title = cli.title.as_deref().unwrap_or(&cli.input_path);
    let html = preview_page(title, rendered.fragments()).map_err(|e| e.to_string())?;
    std::fs::write(&cli.out_path, html).map_err(|e| e.to_string())?;

    println!(
        "wrote markup preview to {} (fragments={}, runs={}, chars={})",
        cli.out_path,
        rendered.fragments().len(),
        rendered.runs().len(),
        rendered.plain_text().chars().count(),
    );
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return Err("help requested".to_string());
    }

    let mut cfg = Args {
        input_path: String::new(),
        out_path: DEFAULT_OUT_PATH.to_string(),
        title: None,
        base_font_size: RenderOptions::default().base_font_size,
    };

    let mut positional = Vec::new();
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--out requires a value".to_string())?;
                cfg.out_path = v.clone();
                i += 2;
            }
            "--title" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--title requires a value".to_string())?;
                cfg.title = Some(v.clone());
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
            other if !other.starts_with("--") => {
                positional.push(other.to_string());
                i += 1;
            }
            other => return Err(format!("unknown option: {}", other)),
        }
    }

    let mut positional = positional.into_iter();
    cfg.input_path = positional
        .next()
        .ok_or_else(|| "missing input file".to_string())?;
    if let Some(out) = positional.next() {
        cfg.out_path = out;
    }
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {}", extra));
    }
    Ok(cfg)
}

fn help_text() -> &'static str {
    r#"markup-runs-preview - render a markup file into a standalone HTML preview

USAGE:
  cargo run -p markup-runs-web --bin markup-runs-preview -- <input> [out.html] [options]

OPTIONS:
  --out <path>              output HTML path (default: target/markup-preview/index.html)
  --title <text>            page title (default: input path)
  --base-font-size <px>     ambient font size for the root (default: 16)
  -h, --help                show this help
"#
}

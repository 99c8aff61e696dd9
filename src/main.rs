use jdf_editor::config::Config;
use jdf_editor::data::html_exporter::HtmlExporter;
use jdf_editor::jdf_codec;
use std::process;

fn print_help() {
    println!("JDF Editor - headless inspector for JDF table files");
    println!();
    println!("Usage:");
    println!("  jdf-editor [OPTIONS] <FILE.jdf>");
    println!();
    println!("Options:");
    println!("  --export-html <OUT.html>  - Render the table as a static HTML page");
    println!("  --help                    - Show this help");
    println!("  --version                 - Show version");
    println!();
    println!("With no options the table summary (columns, types, first rows)");
    println!("is printed to stdout.");
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    jdf_editor::logging::init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }
    if args.iter().any(|a| a == "--version") {
        println!("jdf-editor {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut file: Option<&str> = None;
    let mut export_html: Option<&str> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--export-html" => {
                export_html = args.get(i + 1).map(|s| s.as_str());
                if export_html.is_none() {
                    anyhow::bail!("--export-html needs an output file name");
                }
                i += 2;
            }
            other if other.starts_with("--") => {
                anyhow::bail!("unknown option '{}' (see --help)", other);
            }
            other => {
                file = Some(other);
                i += 1;
            }
        }
    }

    let file = file.ok_or_else(|| anyhow::anyhow!("no input file given (see --help)"))?;
    let config = Config::load().unwrap_or_default();
    let table = jdf_codec::load(file)?;

    match export_html {
        Some(out) => {
            let message = HtmlExporter::export(&table, out)?;
            println!("{}", message);
        }
        None => {
            print!("{}", table.debug_dump(config.display.max_preview_rows));
        }
    }

    Ok(())
}

//! Folio CLI: paginate a JSON document source and print the layout as JSON.
//! The main interface is the library and its WASM bindings.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use folio_pager::{
    DocumentSnapshot, DocumentSource, LayoutResult, LineMeasurer, PageGeometry, PaginationConfig,
    Paginator,
};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "folio-pager", version, about = "Footnote-aware pagination")]
struct Cli {
    /// Document source JSON; reads stdin when omitted
    input: Option<PathBuf>,

    /// Page width in points
    #[arg(long, default_value_t = 612.0)]
    page_width: f32,

    /// Page height in points
    #[arg(long, default_value_t = 792.0)]
    page_height: f32,

    /// Margin applied on all four sides
    #[arg(long, default_value_t = 72.0)]
    margin: f32,

    /// Iteration cap for the footnote fixed point
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Smallest text container a page may shrink to
    #[arg(long)]
    min_text_height: Option<f32>,

    /// Height added above every footnote
    #[arg(long)]
    separator: Option<f32>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn config(&self) -> PaginationConfig {
        let defaults = PaginationConfig::default();
        PaginationConfig {
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            min_text_height: self.min_text_height.unwrap_or(defaults.min_text_height),
            footnote_separator: self.separator.unwrap_or(defaults.footnote_separator),
        }
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::with_margins(self.page_width, self.page_height, self.margin)
    }
}

fn read_source(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn paginate_json(cli: &Cli, json: &str) -> Result<LayoutResult> {
    let source: DocumentSource =
        serde_json::from_str(json).wrap_err("Failed to parse document source")?;
    let document = DocumentSnapshot::from(source);

    let measurer = LineMeasurer::default();
    let layout = Paginator::new(&measurer, cli.config())
        .paginate(&document, &cli.geometry())
        .wrap_err("Pagination failed")?;
    Ok(layout)
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let cli = Cli::parse();
    let json = read_source(cli.input.as_ref())?;
    let layout = paginate_json(&cli, &json)?;

    let output = if cli.compact {
        serde_json::to_string(&layout)
    } else {
        serde_json::to_string_pretty(&layout)
    }
    .wrap_err("Failed to encode layout")?;
    println!("{}", output);
    Ok(())
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aro_core::{PLACEHOLDER, RING_SIZE_CHART, display_diameter, resolve};
use chart_core::{Labels, Lang, RING_VIEWBOX};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "chart")]
#[command(author, version, about = "Brazilian ring size lookup and chart rendering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ring size closest to an inner diameter (mm)
    Resolve {
        /// Inner diameter in mm; `,` is accepted as decimal separator
        #[arg(allow_negative_numbers = true)]
        diameter: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draw the ring for a diameter
    Ring {
        #[arg(allow_negative_numbers = true)]
        diameter: String,
        #[arg(value_name = "OUTPUT.(svg|png)")]
        output: PathBuf,
        /// Pixels per viewBox unit for PNG output
        #[arg(long, default_value_t = 4.0)]
        scale: f32,
    },
    /// Draw the full reference chart
    Table {
        #[arg(value_name = "OUTPUT.(svg|png)")]
        output: PathBuf,
        #[arg(long = "row-height", default_value_t = chart_core::DEFAULT_ROW_PX)]
        row_height: f64,
        /// Label language (pt or en)
        #[arg(long, default_value = "pt")]
        lang: String,
        /// JSON object overriding individual labels
        #[arg(long, value_name = "LABELS_JSON")]
        labels: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Png,
}

fn output_format(path: &Path) -> Result<OutputFormat, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("svg") => Ok(OutputFormat::Svg),
        Some("png") => Ok(OutputFormat::Png),
        _ => Err(format!(
            "unsupported output {}: expected .svg or .png",
            path.display()
        )),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveOutput<'a> {
    input: &'a str,
    size: Option<u32>,
    is_valid: bool,
    diameter_mm: Option<f64>,
}

impl ResolveOutput<'_> {
    /// Size as printed in plain mode.
    fn display(&self) -> String {
        self.size
            .map_or_else(|| PLACEHOLDER.to_string(), |s| s.to_string())
    }
}

fn resolve_output(input: &str) -> ResolveOutput<'_> {
    let r = resolve(input, RING_SIZE_CHART);
    let diameter_mm = RING_SIZE_CHART
        .iter()
        .find(|e| Some(e.size) == r.size)
        .map(|e| e.diameter);
    ResolveOutput {
        input,
        size: r.size,
        is_valid: r.is_valid,
        diameter_mm,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Resolve { diameter, json } => {
            let out = resolve_output(&diameter);
            if json {
                println!("{}", serde_json::to_string(&out)?);
            } else {
                println!("{}", out.display());
            }
            if !out.is_valid {
                debug!(input = %diameter, "input did not resolve");
                std::process::exit(1);
            }
        }
        Command::Ring {
            diameter,
            output,
            scale,
        } => {
            let format = output_format(&output)?;
            let d = display_diameter(&diameter);
            let svg = chart_core::build_ring_svg(d);
            match format {
                OutputFormat::Svg => fs::write(&output, svg)?,
                OutputFormat::Png => {
                    let scale = if scale.is_finite() && scale > 0.0 {
                        scale
                    } else {
                        warn!(scale, "invalid scale; using 1");
                        1.0
                    };
                    let side = (RING_VIEWBOX as f32 * scale).ceil() as u32;
                    render_png(&svg, side, side, scale, &output)?;
                }
            }
            info!(diameter = d, output = %output.display(), "ring written");
        }
        Command::Table {
            output,
            row_height,
            lang,
            labels,
        } => {
            let format = output_format(&output)?;
            let mut l = Labels::for_lang(Lang::parse(&lang));
            if let Some(path) = labels {
                let txt = fs::read_to_string(&path)?;
                l = l.with_overrides(&txt)?;
            }
            let (svg, w_px, h_px) = chart_core::build_chart_svg(RING_SIZE_CHART, &l, row_height);
            match format {
                OutputFormat::Svg => fs::write(&output, svg)?,
                OutputFormat::Png => render_png(&svg, w_px, h_px, 1.0, &output)?,
            }
            info!(rows = RING_SIZE_CHART.len(), output = %output.display(), "chart written");
        }
    }
    Ok(())
}

// System fonts, plus FONT_TTF mapped to the generic sans-serif family.
fn load_fonts() -> usvg::fontdb::Database {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    if let Ok(path) = env::var("FONT_TTF") {
        match fs::read(&path) {
            Ok(bytes) => {
                let mut probe = usvg::fontdb::Database::new();
                probe.load_font_data(bytes.clone());
                let family = probe
                    .faces()
                    .next()
                    .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
                fontdb.load_font_data(bytes);
                match family {
                    Some(name) => fontdb.set_sans_serif_family(name),
                    None => warn!(path = %path, "FONT_TTF contains no usable face"),
                }
            }
            Err(e) => warn!(path = %path, error = %e, "failed to read FONT_TTF"),
        }
    }
    if fontdb.faces().next().is_none() {
        warn!("no fonts available; text will not be rendered");
    }
    fontdb
}

fn render_png(
    svg: &str,
    w_px: u32,
    h_px: u32,
    scale: f32,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::new(load_fonts());
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| format!("SVG parse error: {e:?}"))?;
    let mut pixmap = tiny_skia::Pixmap::new(w_px, h_px).ok_or("pixmap alloc failed")?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pm);
    let bytes = chart_core::encode_rgba_to_png_bytes(w_px, h_px, pixmap.data())?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_extension() {
        assert_eq!(output_format(Path::new("a.svg")), Ok(OutputFormat::Svg));
        assert_eq!(output_format(Path::new("dir/a.PNG")), Ok(OutputFormat::Png));
        assert!(output_format(Path::new("a.pdf")).is_err());
        assert!(output_format(Path::new("noext")).is_err());
    }

    #[test]
    fn resolve_output_reports_matched_diameter() {
        let out = resolve_output("18,7");
        assert_eq!(out.size, Some(19));
        assert_eq!(out.diameter_mm, Some(18.8));
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(
            json,
            r#"{"input":"18,7","size":19,"isValid":true,"diameterMm":18.8}"#
        );
    }

    #[test]
    fn negative_diameters_reach_the_resolver() {
        let cli = Cli::try_parse_from(["chart", "resolve", "-5"]).unwrap();
        match cli.command {
            Command::Resolve { diameter, json } => {
                assert_eq!(diameter, "-5");
                assert!(!json);
                let out = resolve_output(&diameter);
                assert!(!out.is_valid);
                assert_eq!(out.display(), PLACEHOLDER);
            }
            other => panic!("unexpected command {other:?}"),
        }
        let cli = Cli::try_parse_from(["chart", "ring", "-3", "out.svg"]).unwrap();
        assert!(matches!(cli.command, Command::Ring { ref diameter, .. } if diameter == "-3"));
    }

    #[test]
    fn plain_output_prints_size() {
        assert_eq!(resolve_output("16.5").display(), "12");
    }

    #[test]
    fn resolve_output_for_invalid_input() {
        let out = resolve_output("-5");
        assert!(!out.is_valid);
        assert_eq!(out.size, None);
        assert_eq!(out.diameter_mm, None);
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["chart", "table", "out.png", "--lang", "en"]).unwrap();
        match cli.command {
            Command::Table {
                output,
                row_height,
                lang,
                labels,
            } => {
                assert_eq!(output, PathBuf::from("out.png"));
                assert_eq!(row_height, chart_core::DEFAULT_ROW_PX);
                assert_eq!(lang, "en");
                assert!(labels.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

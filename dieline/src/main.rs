use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use dieline_core::{
    BoxLayoutRequest, Converters, RenderOptions, check_closure, generate, produce_artifact,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod pdf;
mod psd;
mod raster;

use pdf::PdfConverter;
use raster::{PngConverter, PsdConverter, RasterSettings};

#[derive(Parser, Debug)]
#[command(name = "dieline")]
#[command(about = "Generate a box dieline and write it as SVG, PNG, PSD or PDF")]
struct Args {
    /// Request JSON file, `-` for stdin
    input: Option<PathBuf>,

    /// Request in query-string form, e.g. `L=20&B=10&H=15&format=png`
    #[arg(long, short = 'q', conflicts_with = "input")]
    query: Option<String>,

    #[arg(long, short = 'l')]
    length: Option<f64>,

    #[arg(long, short = 'b')]
    breadth: Option<f64>,

    #[arg(long = "height", short = 'H')]
    height: Option<f64>,

    /// svg, png, psd, pdf
    #[arg(long, short = 'f')]
    format: Option<String>,

    /// rsc, front_back_stacked, six_panel_compact
    #[arg(long, short = 's')]
    style: Option<String>,

    /// Layout units per centimetre
    #[arg(long)]
    scale: Option<f64>,

    /// cardboard, plastic, metal
    #[arg(long)]
    material: Option<String>,

    /// Print dimensions and material below the drawing
    #[arg(long)]
    caption: bool,

    /// RenderOptions JSON file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output file, `-` for stdout. Defaults to `box_layout_<uuid>.<ext>`
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Extra font file for PNG/PSD/PDF text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Device pixels per layout unit for PNG/PSD
    #[arg(long, default_value_t = 1.0)]
    pixels_per_unit: f32,

    /// Verify the layout folds into a closed box before writing
    #[arg(long)]
    check: bool,
}

fn read_request(args: &Args) -> Result<BoxLayoutRequest, Box<dyn std::error::Error>> {
    let mut req = if let Some(q) = &args.query {
        BoxLayoutRequest::from_query(q)?
    } else if let Some(path) = &args.input {
        let txt = if path.as_os_str() == "-" {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            s
        } else {
            fs::read_to_string(path)?
        };
        BoxLayoutRequest::from_json(&txt)?
    } else {
        match (args.length, args.breadth, args.height) {
            (Some(l), Some(b), Some(h)) => BoxLayoutRequest::new(l, b, h),
            _ => return Err("need a request file, --query, or all of --length --breadth --height".into()),
        }
    };

    if let Some(l) = args.length {
        req.length = l;
    }
    if let Some(b) = args.breadth {
        req.breadth = b;
    }
    if let Some(h) = args.height {
        req.height = h;
    }
    if let Some(f) = &args.format {
        req.format = f.clone();
    }
    if let Some(s) = &args.style {
        req.style = s.clone();
    }
    if let Some(s) = args.scale {
        req.scale = s;
    }
    if let Some(m) = &args.material {
        req.material = m.parse()?;
    }
    req.caption |= args.caption;
    Ok(req)
}

fn load_options(path: Option<&Path>) -> Result<RenderOptions, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(RenderOptions::from_json(&fs::read_to_string(p)?)?),
        None => Ok(RenderOptions::default()),
    }
}

fn converters(args: &Args) -> Converters {
    let settings = RasterSettings {
        pixels_per_unit: args.pixels_per_unit,
        font: args.font.clone(),
    };
    Converters::new()
        .with(PngConverter {
            settings: settings.clone(),
        })
        .with(PsdConverter { settings })
        .with(PdfConverter {
            font: args.font.clone(),
        })
}

fn default_output(extension: &str) -> PathBuf {
    PathBuf::from(format!("box_layout_{}.{extension}", uuid::Uuid::new_v4()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let req = read_request(&args)?;
    let options = load_options(args.config.as_deref())?;
    let converters = converters(&args);

    if args.check {
        let valid = req.validate()?;
        let layout = generate(valid.dimensions, valid.style, valid.scale)?;
        if let Err(e) = check_closure(&layout) {
            error!(style = %valid.style, "layout does not close: {e}");
            return Err(e.into());
        }
        info!(style = %valid.style, panels = layout.panels.len(), "closure check passed");
    }

    let artifact = match produce_artifact(&req, &converters, &options) {
        Ok(a) => a,
        Err(e) => {
            error!(status = e.http_status(), "{e}");
            return Err(e.into());
        }
    };

    let output = args.output.clone().unwrap_or_else(|| default_output(artifact.extension()));
    if output.as_os_str() == "-" {
        io::stdout().write_all(&artifact.bytes)?;
    } else {
        fs::write(&output, &artifact.bytes)?;
        info!(
            path = %output.display(),
            content_type = artifact.content_type(),
            bytes = artifact.bytes.len(),
            "written"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dieline_core::Material;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("dieline").chain(argv.iter().copied()))
    }

    #[test]
    fn flags_build_a_request() {
        let a = args(&["-l", "20", "-b", "10", "-H", "15", "-f", "png", "--material", "Metal"]);
        let req = read_request(&a).unwrap();
        assert_eq!((req.length, req.breadth, req.height), (20.0, 10.0, 15.0));
        assert_eq!(req.format, "png");
        assert_eq!(req.material, Material::Metal);
    }

    #[test]
    fn flags_override_query() {
        let a = args(&["-q", "L=20&B=10&H=15&style=compact", "--style", "stacked", "--scale", "5"]);
        let req = read_request(&a).unwrap();
        assert_eq!(req.style, "stacked");
        assert_eq!(req.scale, 5.0);
    }

    #[test]
    fn missing_dimensions_is_an_error() {
        assert!(read_request(&args(&["-l", "20"])).is_err());
        let wood = args(&["-l", "20", "-b", "10", "-H", "15", "--material", "wood"]);
        assert!(read_request(&wood).is_err());
    }

    #[test]
    fn default_output_is_unique() {
        let a = default_output("svg");
        let b = default_output("svg");
        assert_ne!(a, b);
        let name = a.to_string_lossy();
        assert!(name.starts_with("box_layout_") && name.ends_with(".svg"));
    }

    #[test]
    fn registered_formats() {
        let c = converters(&args(&["-l", "1", "-b", "1", "-H", "1"]));
        let names: Vec<_> = c.formats().iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["pdf", "png", "psd", "svg"]);
    }

    #[test]
    fn png_request_end_to_end() {
        let req = BoxLayoutRequest::from_query("L=20&B=10&H=15&format=png").unwrap();
        let a = produce_artifact(&req, &converters(&args(&["-l", "1", "-b", "1", "-H", "1"])), &RenderOptions::default())
            .unwrap();
        assert_eq!(a.content_type(), "image/png");
        assert!(a.bytes.starts_with(b"\x89PNG"));
    }
}

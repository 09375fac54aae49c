//! Render a single icon-font glyph to a PNG file.
//!
//! ```sh
//! iconfont --font awesome.ttf --manifest awesome.json --icon fa-github \
//!     --size 64 --color '#336699' --scale 2 --output github@2x.png
//! iconfont --manifest awesome.json --list
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use iconfont_renderer::{Color, FontRegistry, GlyphStyle, IconCatalog, IconRenderer};

#[derive(Debug, Parser)]
#[command(name = "iconfont", about = "Render icon-font glyphs as trimmed, centered PNGs")]
struct Args {
    /// Icon manifest (JSON) mapping names to codepoints.
    #[arg(long)]
    manifest: PathBuf,

    /// TrueType/OpenType icon font. Without it a placeholder is drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Icon name or CSS code.
    #[arg(long, required_unless_present = "list")]
    icon: Option<String>,

    /// Canvas width (and height, unless --height is given).
    #[arg(long, default_value_t = 64)]
    size: u32,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    font_size: Option<f32>,

    #[arg(long, default_value = "#000000")]
    color: Color,

    #[arg(long, default_value = "transparent")]
    background: Color,

    /// Display scale factor (2 for @2x).
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    #[arg(short, long, required_unless_present = "list")]
    output: Option<PathBuf>,

    /// Print every icon in the manifest and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let catalog = IconCatalog::from_file(&args.manifest)?;

    if args.list {
        for (name, glyph) in catalog.iter() {
            println!("{}\tU+{:04X}", catalog.css_code(name), u32::from(glyph));
        }
        return Ok(());
    }

    let font = match &args.font {
        Some(path) => match FontRegistry::global().register_file("cli", path) {
            Ok(font) => Some(font),
            Err(err) => {
                eprintln!("warning: {err}; drawing placeholder");
                None
            }
        },
        None => None,
    };

    let mut style = GlyphStyle::new(args.size, args.height.unwrap_or(args.size))
        .with_color(args.color)
        .with_background(args.background)
        .with_scale(args.scale);
    if let Some(font_size) = args.font_size {
        style = style.with_font_size(font_size);
    }

    let (Some(icon), Some(output)) = (args.icon.as_deref(), args.output.as_ref()) else {
        return Err("--icon and --output are required".into());
    };

    let mut renderer = IconRenderer::new(catalog, font);
    let image = renderer.render(icon, &style)?;
    image.data.save(output)?;

    let size = image.dimensions();
    println!("wrote {} ({}x{})", output.display(), size.width, size.height);
    Ok(())
}

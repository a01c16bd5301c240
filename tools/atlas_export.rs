use std::{env, error::Error, path::PathBuf};

use glyphkit::{AtlasConfig, FontAtlas, ParsedFont};
use log::info;

struct Args {
    font: PathBuf,
    pixel_height: f32,
    output: PathBuf,
    chars: Vec<char>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args()?;

    let font = ParsedFont::load(&args.font)?;
    info!("{}: {} glyphs, {} units per em", args.font.display(), font.num_glyphs(), font.units_per_em());

    let atlas = FontAtlas::build_with(&font, &args.chars, &AtlasConfig::new(args.pixel_height))?;
    info!(
        "packed {} glyphs at {}px into {}x{}",
        atlas.glyph_count(),
        args.pixel_height,
        atlas.width(),
        atlas.height()
    );

    match args.output.extension().and_then(|e| e.to_str()) {
        #[cfg(feature = "png_export")]
        Some(ext) if ext.eq_ignore_ascii_case("png") => atlas.save_png(&args.output)?,
        _ => atlas.save_bmp(&args.output)?,
    }
    info!("wrote {}", args.output.display());
    Ok(())
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let usage = "usage: atlas_export <font.ttf> <pixel_height> <out.bmp|out.png> [chars]";
    let mut args = env::args().skip(1);
    let font = args.next().ok_or(usage)?;
    let pixel_height: f32 = args.next().ok_or(usage)?.parse()?;
    if !(pixel_height > 0.0) {
        return Err("pixel height must be positive".into());
    }
    let output = args.next().ok_or(usage)?;
    let chars = match args.next() {
        Some(s) => s.chars().collect(),
        None => (' '..='~').collect(),
    };
    Ok(Args {
        font: PathBuf::from(font),
        pixel_height,
        output: PathBuf::from(output),
        chars,
    })
}

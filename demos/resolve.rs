use std::path::PathBuf;

use ot_anchor::{AnchorTable, GlyphId, ScaledFace};

const HELP: &str = "\
USAGE:
    resolve [OPTIONS] <FONT-FILE> <ANCHOR>

OPTIONS:
    -h, --help                          Show help options
        --version                       Show version number
        --face-index INDEX              Set face index [default: 0]
        --ppem NUMBER                   Set pixels per EM
        --glyph ID                      Set glyph id [default: 0]

ARGS:
    <FONT-FILE>                         A font file
    <ANCHOR>                            Anchor table bytes in hex
                                        Example: '000100640032'
";

struct Args {
    help: bool,
    version: bool,
    face_index: u32,
    ppem: Option<u16>,
    glyph: u16,
    free: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    let args = Args {
        help: args.contains(["-h", "--help"]),
        version: args.contains("--version"),
        face_index: args.opt_value_from_str("--face-index")?.unwrap_or(0),
        ppem: args.opt_value_from_str("--ppem")?,
        glyph: args.opt_value_from_str("--glyph")?.unwrap_or(0),
        free: args.finish().into_iter().map(|s| s.to_string_lossy().into_owned()).collect(),
    };

    Ok(args)
}

fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16).ok_or_else(|| format!("'{}' is not a hex digit", c)))
        .collect::<Result<Vec<u32>, String>>()?;

    if digits.len() % 2 != 0 {
        return Err("odd number of hex digits".to_string());
    }

    Ok(digits.chunks_exact(2).map(|pair| (pair[0] * 16 + pair[1]) as u8).collect())
}

fn main() {
    let args = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.help || args.free.len() != 2 {
        print!("{}", HELP);
        return;
    }

    let font_path = PathBuf::from(&args.free[0]);
    let font_data = match std::fs::read(&font_path) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}.", font_path.display(), e);
            std::process::exit(1);
        }
    };

    let mut face = match ScaledFace::from_slice(&font_data, args.face_index) {
        Some(v) => v,
        None => {
            eprintln!("Error: '{}' is not a font.", font_path.display());
            std::process::exit(1);
        }
    };

    face.set_pixels_per_em(args.ppem.map(|ppem| (ppem, ppem)));

    let anchor_data = match parse_hex(&args.free[1]) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: invalid anchor: {}.", e);
            std::process::exit(1);
        }
    };

    let table = match AnchorTable::parse(&anchor_data) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };

    let point = table.resolve(GlyphId(args.glyph), &face);
    println!("{:?}", table);
    println!("{},{}", point.x, point.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() {
        assert_eq!(parse_hex("0001 0064 ffCE"), Ok(vec![0x00, 0x01, 0x00, 0x64, 0xFF, 0xCE]));
        assert_eq!(parse_hex(""), Ok(vec![]));
    }

    #[test]
    fn invalid_hex() {
        assert!(parse_hex("001").is_err());
        assert!(parse_hex("0g").is_err());
        assert!(parse_hex("aéb").is_err());
        assert!(parse_hex("éé").is_err());
    }
}

//! Color value parsing for style strings.
//!
//! Supports the color formats accepted inside a style attribute string:
//!
//! - Named colors: `red`, `green`, `blue`, etc. (8 base ANSI colors)
//! - Bright variants: `bright_red`, `bright_green`, etc.
//! - Extended palette names: `tan`, `grey30`, `light_sea_green`, ...
//! - 256-color palette: `color(0)` through `color(255)`
//! - RGB hex: `#ff6b35` or `#fff` (3 or 6 digit)
//! - `default`: the terminal's own foreground/background
//!
//! Every variant except `default` has a concrete RGB representation (the
//! standard xterm tables), which is what makes it eligible for HSL
//! transformation.

use console::Color;

/// Parsed color value from a style string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorDef {
    /// The terminal default color. Has no RGB representation.
    Default,
    /// One of the 8 base ANSI colors.
    Named(Color),
    /// 256-color palette index.
    Palette(u8),
    /// True color RGB.
    Rgb(u8, u8, u8),
}

/// xterm RGB values for the 16 base palette entries (indices 0-15).
const BASE16_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Channel values for the 6x6x6 color cube (indices 16-231).
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Extended palette names understood in style strings.
///
/// This is the subset of the conventional xterm/rich naming that the default
/// configuration uses, not the full 256-name table.
const EXTENDED_NAMES: [(&str, u8); 8] = [
    ("light_sea_green", 37),
    ("deep_sky_blue1", 39),
    ("spring_green1", 48),
    ("medium_spring_green", 49),
    ("tan", 180),
    ("orange1", 214),
    ("gold1", 220),
    ("grey30", 239),
];

impl ColorDef {
    /// Parses a color word from a style string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("default") {
            return Ok(ColorDef::Default);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        if let Some(inner) = s.strip_prefix("color(").and_then(|r| r.strip_suffix(')')) {
            let index: u16 = inner
                .trim()
                .parse()
                .map_err(|_| format!("invalid palette index '{}'", inner))?;
            if index > 255 {
                return Err(format!("palette index {} out of range (0-255)", index));
            }
            return Ok(ColorDef::Palette(index as u8));
        }

        Self::parse_named(s)
    }

    /// Parses a hex color code (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, String> {
        match hex.len() {
            // 3-digit hex: #rgb -> #rrggbb
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16)
                    .map_err(|_| format!("invalid hex color: #{}", hex))?
                    * 17;
                let g = u8::from_str_radix(&hex[1..2], 16)
                    .map_err(|_| format!("invalid hex color: #{}", hex))?
                    * 17;
                let b = u8::from_str_radix(&hex[2..3], 16)
                    .map_err(|_| format!("invalid hex color: #{}", hex))?
                    * 17;
                Ok(ColorDef::Rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16)
                    .map_err(|_| format!("invalid hex color: #{}", hex))?;
                let g = u8::from_str_radix(&hex[2..4], 16)
                    .map_err(|_| format!("invalid hex color: #{}", hex))?;
                let b = u8::from_str_radix(&hex[4..6], 16)
                    .map_err(|_| format!("invalid hex color: #{}", hex))?;
                Ok(ColorDef::Rgb(r, g, b))
            }
            _ => Err(format!(
                "invalid hex color: #{} (must be 3 or 6 digits)",
                hex
            )),
        }
    }

    /// Parses a named color (base, bright, or extended palette names).
    fn parse_named(name: &str) -> Result<Self, String> {
        let name_lower = name.to_lowercase();

        if let Some(base) = name_lower.strip_prefix("bright_") {
            return Self::parse_bright(base);
        }

        let color = match name_lower.as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            _ => {
                if let Some((_, index)) = EXTENDED_NAMES.iter().find(|(n, _)| *n == name_lower) {
                    return Ok(ColorDef::Palette(*index));
                }
                return Err(format!("unknown color name: {}", name));
            }
        };

        Ok(ColorDef::Named(color))
    }

    /// Parses a bright color variant (palette indices 8-15).
    fn parse_bright(base: &str) -> Result<Self, String> {
        let index = match base {
            "black" => 8,
            "red" => 9,
            "green" => 10,
            "yellow" => 11,
            "blue" => 12,
            "magenta" => 13,
            "cyan" => 14,
            "white" => 15,
            _ => return Err(format!("unknown bright color: bright_{}", base)),
        };

        Ok(ColorDef::Palette(index))
    }

    /// Returns the RGB representation, or `None` for the terminal default.
    ///
    /// Named and palette colors resolve through the standard xterm tables so
    /// they can participate in HSL transforms.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            ColorDef::Default => None,
            ColorDef::Named(c) => Some(BASE16_RGB[named_index(*c)]),
            ColorDef::Palette(n) => Some(palette_rgb(*n)),
            ColorDef::Rgb(r, g, b) => Some((*r, *g, *b)),
        }
    }

    /// Converts to a `console::Color`, or `None` for the terminal default.
    pub fn to_console_color(&self) -> Option<Color> {
        match self {
            ColorDef::Default => None,
            ColorDef::Named(c) => Some(*c),
            ColorDef::Palette(n) => Some(Color::Color256(*n)),
            ColorDef::Rgb(r, g, b) => Some(Color::Color256(rgb_to_ansi256((*r, *g, *b)))),
        }
    }
}

/// Palette position of a base ANSI color.
fn named_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        _ => 7,
    }
}

/// RGB value of a 256-color palette index (standard xterm layout).
fn palette_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => BASE16_RGB[index as usize],
        16..=231 => {
            let n = index - 16;
            let r = CUBE_LEVELS[(n / 36) as usize];
            let g = CUBE_LEVELS[((n / 6) % 6) as usize];
            let b = CUBE_LEVELS[(n % 6) as usize];
            (r, g, b)
        }
        232..=255 => {
            let v = 8 + 10 * (index - 232);
            (v, v, v)
        }
    }
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

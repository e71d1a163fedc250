//! HSL color transformation.
//!
//! Styles may derive their color from the surrounding context instead of
//! naming one: a transform takes the base style's color, moves it through
//! HSL space (brightness, saturation, hue shift), and hands back a concrete
//! RGB color. Colors without an RGB representation (the terminal default)
//! pass through unchanged; transforms degrade to identity rather than fail.
//!
//! Adjustments compose in a fixed order (brightness, then saturation, then
//! hue), each applied against the HSL of the input color as converted once
//! for the invocation.

use serde_json::Value;

use crate::color::ColorDef;
use crate::diagnostics::Diagnostics;

/// A parsed transform specification.
///
/// Each field is an independent adjustment; absent fields leave that channel
/// untouched. Multipliers scale lightness/saturation (clamped to [0, 1]),
/// the hue shift is in degrees and wraps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformSpec {
    pub adjust_brightness: Option<f64>,
    pub adjust_saturation: Option<f64>,
    pub shift_hue: Option<f64>,
}

impl TransformSpec {
    /// Parses a transform from a raw config value.
    ///
    /// Unknown keys and non-numeric values are reported as warnings and
    /// skipped; they never invalidate the other adjustments. Returns `None`
    /// when the value is not an object, or when it named adjustments but
    /// none of them survived. In both cases the owning style falls back to
    /// its literal color.
    pub fn from_value(value: &Value, style_name: &str, diag: &mut Diagnostics) -> Option<Self> {
        let map = match value {
            Value::Object(map) => map,
            _ => {
                diag.warn(
                    format!("transform-shape:{}", style_name),
                    format!("transform for style '{}' must be an object", style_name),
                );
                return None;
            }
        };

        let mut spec = TransformSpec::default();
        let mut named_any = false;
        for (key, raw) in map {
            let slot = match key.as_str() {
                "adjust_brightness" => &mut spec.adjust_brightness,
                "adjust_saturation" => &mut spec.adjust_saturation,
                "shift_hue" => &mut spec.shift_hue,
                _ => {
                    diag.warn(
                        format!("transform-key:{}:{}", style_name, key),
                        format!("transform for style '{}': unknown key '{}'", style_name, key),
                    );
                    continue;
                }
            };
            named_any = true;
            match coerce_number(raw) {
                Some(n) => *slot = Some(n),
                None => diag.warn(
                    format!("transform-value:{}:{}", style_name, key),
                    format!(
                        "transform for style '{}': '{}' is not numeric, skipping",
                        style_name, key
                    ),
                ),
            }
        }

        if named_any && spec == TransformSpec::default() {
            // Every named adjustment was invalid; drop the transform so the
            // style's literal color applies.
            return None;
        }
        Some(spec)
    }
}

/// Lenient numeric coercion: JSON numbers, or strings that parse as one.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Applies a transform to a color.
///
/// Identity for colors without an RGB representation. The result is always
/// a concrete [`ColorDef::Rgb`] otherwise.
pub fn transform(color: &ColorDef, spec: &TransformSpec) -> ColorDef {
    let Some(rgb) = color.rgb() else {
        return color.clone();
    };

    let base = rgb_to_hsl(rgb);
    let mut out = base;
    if let Some(m) = spec.adjust_brightness {
        out.l = (base.l * m).clamp(0.0, 1.0);
    }
    if let Some(m) = spec.adjust_saturation {
        out.s = (base.s * m).clamp(0.0, 1.0);
    }
    if let Some(deg) = spec.shift_hue {
        out.h = (base.h + deg / 360.0).rem_euclid(1.0);
    }

    let (r, g, b) = hsl_to_rgb(out);
    ColorDef::Rgb(r, g, b)
}

/// HSL triple, all channels normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

fn rgb_to_hsl((r, g, b): (u8, u8, u8)) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    Hsl { h, s, l }
}

fn hsl_to_rgb(hsl: Hsl) -> (u8, u8, u8) {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        let v = channel(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        channel(hue_component(p, q, h + 1.0 / 3.0)),
        channel(hue_component(p, q, h)),
        channel(hue_component(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_component(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Channel quantization with round-half-up.
fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

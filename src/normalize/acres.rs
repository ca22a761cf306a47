// normalize/acres.rs
use lazy_static::lazy_static;
use regex::Regex;

/// Square metres in one acre.
pub const ACRE_TO_M2: f64 = 4046.8564224;

const FRACTION_GLYPHS: [(char, f64); 5] = [
    ('½', 0.5),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
];

lazy_static! {
    static ref FILLER_RE: Regex =
        Regex::new(r"\b(about|approx(?:imately)?|over|just over|c\.)\b").unwrap();
    static ref MIXED_FRACTION_RE: Regex = Regex::new(r"([0-9]+)\s+([0-9]+)\s*/\s*([0-9]+)").unwrap();
    static ref ADDITIVE_RE: Regex = Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*(?:\+\s*(0?\.[0-9]+))?").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"(-?[0-9]+(?:\.[0-9]+)?)").unwrap();
}

/// Turns "about 2 ½ acres" or "1 3/4 acres" into numeric acres.
///
/// The rules run from most to least specific and the first one that matches
/// wins:
///
/// 1. empty input has no value
/// 2. filler words and the unit are removed
/// 3. fraction glyphs become an additive term (`"2 ½"` → `"2  +0.5"`)
/// 4. an ASCII mixed fraction (`"1 3/4"`)
/// 5. a number with an optional `+0.x` addend
/// 6. the first signed decimal anywhere
pub fn parse_acres(text: &str) -> Option<f64> {
    if text.trim().is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    let stripped = FILLER_RE.replace_all(&lowered, "");
    let mut s = stripped
        .replace("acres", "")
        .replace("acre", "")
        .trim()
        .to_string();

    for (glyph, dec) in FRACTION_GLYPHS {
        s = s.replace(glyph, &format!(" +{dec}"));
    }

    let mixed = MIXED_FRACTION_RE.captures(&s).and_then(|caps| {
        let whole: f64 = caps[1].parse().ok()?;
        let num: f64 = caps[2].parse().ok()?;
        let den: f64 = caps[3].parse().ok()?;
        let den = if den == 0.0 { 1.0 } else { den };
        Some(whole + num / den)
    });

    let additive = || {
        ADDITIVE_RE.captures(&s).and_then(|caps| {
            let base: f64 = caps[1].parse().ok()?;
            let frac = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            Some(base + frac)
        })
    };

    mixed.or_else(additive).or_else(|| {
        NUMBER_RE
            .captures(&s)
            .and_then(|caps| caps[1].parse::<f64>().ok())
    })
}

/// Acres, square metres and the square root of the area, kept together so
/// a missing acreage stays missing all the way down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeMeasures {
    pub acres: Option<f64>,
    pub square_metres: Option<f64>,
    /// √m², roughly the side length in metres of a square parcel.
    pub side_metres: Option<f64>,
}

impl SizeMeasures {
    pub fn from_acres(acres: Option<f64>) -> Self {
        let square_metres = acres.map(|a| a * ACRE_TO_M2);
        Self {
            acres,
            square_metres,
            side_metres: square_metres.map(f64::sqrt),
        }
    }

    pub fn from_size_text(text: &str) -> Self {
        Self::from_acres(parse_acres(text))
    }
}

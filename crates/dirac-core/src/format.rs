//! Rendering of values as Dirac notation text.
//!
//! | Style     | Bra      | Ket      | Imaginary unit |
//! |-----------|----------|----------|----------------|
//! | `ascii`   | `<01\|`  | `\|01>`  | `i`            |
//! | `unicode` | `〈01\|` | `\|01〉` | `ⅈ`            |
//! | `tex`     | `\langle01\|` | `\|01\rangle` | `\imath` |
//! | `html`    | `<span class="bra">&lt;01\|</span>` | `<span class="ket">\|01&gt;</span>` | `<span class=i>i</span>` |

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::Shape;
use crate::value::Value;

/// Glyphs and precision used when formatting a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSpec {
    /// Opening glyph of a bra.
    pub left: String,
    /// Closing glyph of a ket.
    pub right: String,
    /// Vertical bar shared by bras and kets.
    pub center: String,
    /// Opening glyph of a ket, when it differs from `center`.
    pub center_left: Option<String>,
    /// Closing glyph of a bra, when it differs from `center`.
    pub center_right: Option<String>,
    /// Decimal places for coefficients.
    pub decimals: usize,
    /// Glyph substituted for the imaginary unit.
    pub imaginary: String,
    /// Minimum width of basis labels, in bits.
    pub min_qubits: Option<u32>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self::ascii()
    }
}

impl FormatSpec {
    /// Plain ASCII: `<0|`, `|1>`, `i`.
    pub fn ascii() -> Self {
        Self {
            left: "<".into(),
            right: ">".into(),
            center: "|".into(),
            center_left: None,
            center_right: None,
            decimals: 4,
            imaginary: "i".into(),
            min_qubits: None,
        }
    }

    /// Unicode angle brackets and the double-struck imaginary unit.
    pub fn unicode() -> Self {
        Self {
            left: "〈".into(),
            right: "〉".into(),
            imaginary: "ⅈ".into(),
            ..Self::ascii()
        }
    }

    /// TeX math mode.
    pub fn tex() -> Self {
        Self {
            left: "\\langle".into(),
            right: "\\rangle".into(),
            imaginary: "\\imath".into(),
            ..Self::ascii()
        }
    }

    /// HTML spans that can be styled per bra and ket.
    pub fn html() -> Self {
        Self {
            left: "<span class=\"bra\">&lt;".into(),
            right: "&gt;</span>".into(),
            center_left: Some("<span class=\"ket\">|".into()),
            center_right: Some("|</span>".into()),
            imaginary: "<span class=i>i</span>".into(),
            ..Self::ascii()
        }
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_min_qubits(mut self, min_qubits: u32) -> Self {
        self.min_qubits = Some(min_qubits);
        self
    }

    #[must_use]
    pub fn with_center(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.center_left = Some(left.into());
        self.center_right = Some(right.into());
        self
    }

    pub fn center_left(&self) -> &str {
        self.center_left.as_deref().unwrap_or(&self.center)
    }

    pub fn center_right(&self) -> &str {
        self.center_right.as_deref().unwrap_or(&self.center)
    }

    /// Magnitudes at or below this are not rendered.
    pub fn epsilon(&self) -> f64 {
        0.5 * 10_f64.powi(-i32::try_from(self.decimals).unwrap_or(i32::MAX))
    }
}

/// A named output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Ascii,
    Unicode,
    Tex,
    Html,
}

impl Style {
    /// All styles, in the order they are listed to users.
    pub const ALL: [Style; 4] = [Style::Ascii, Style::Unicode, Style::Tex, Style::Html];

    /// The glyph set for this style.
    pub fn spec(self) -> FormatSpec {
        match self {
            Style::Ascii => FormatSpec::ascii(),
            Style::Unicode => FormatSpec::unicode(),
            Style::Tex => FormatSpec::tex(),
            Style::Html => FormatSpec::html(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Style::Ascii => "ascii",
            Style::Unicode => "unicode",
            Style::Tex => "tex",
            Style::Html => "html",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a style name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style '{0}' (expected ascii, unicode, tex or html)")]
pub struct UnknownStyle(pub String);

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Render `value` in Dirac notation.
///
/// A scalar is rendered as a plain complex number. Any other value becomes a
/// sum of labelled basis terms in row-major order; coefficients whose
/// magnitude does not exceed [`FormatSpec::epsilon`], or which round to zero
/// at the given precision, are dropped, and an all-zero value renders as
/// `"0"`.
pub fn format(value: &Value, spec: &FormatSpec) -> String {
    if let Some(c) = value.as_scalar() {
        return format_complex(c, spec.decimals, &spec.imaginary);
    }

    let shape = value.shape();
    let width = value.qubits().max(spec.min_qubits.unwrap_or(0)) as usize;
    let eps = spec.epsilon();
    let ket_label = |i: usize| format!("{}{i:0width$b}{}", spec.center_left(), spec.right);
    let bra_label = |j: usize| format!("{}{j:0width$b}{}", spec.left, spec.center_right());

    let mut out = String::new();
    for ((i, j), v) in value.matrix().indexed_iter() {
        if v.norm() <= eps {
            continue;
        }
        // both parts may still round to zero
        let coefficient = match format_complex(*v, spec.decimals, &spec.imaginary).as_str() {
            "0" => continue,
            "1" => String::new(),
            "-1" => "-".to_string(),
            s if s.contains(" + ") || s.contains(" - ") => format!("({s})"),
            s => s.to_string(),
        };
        match coefficient.strip_prefix('-') {
            Some(rest) if !out.is_empty() => {
                out.push_str(" - ");
                out.push_str(rest);
            }
            _ if !out.is_empty() => {
                out.push_str(" + ");
                out.push_str(&coefficient);
            }
            _ => out.push_str(&coefficient),
        }
        match shape {
            Shape::Ket => out.push_str(&ket_label(i)),
            Shape::Bra => out.push_str(&bra_label(j)),
            _ => {
                out.push_str(&ket_label(i));
                out.push_str(&bra_label(j));
            }
        }
    }

    if out.is_empty() {
        "0".to_string()
    } else {
        out
    }
}

/// Render a real number with at most `decimals` places, without trailing
/// zeros. Negative zero renders as `0`.
pub fn format_real(x: f64, decimals: usize) -> String {
    let mut s = format!("{x:.decimals$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Render a complex number as `a`, `bi`, `a + bi` or `a - bi`, with a unit
/// imaginary coefficient written as the bare glyph.
pub fn format_complex(c: Complex64, decimals: usize, imaginary: &str) -> String {
    let re = format_real(c.re, decimals);
    let im = format_real(c.im.abs(), decimals);
    if im == "0" {
        return re;
    }
    let imag = if im == "1" {
        imaginary.to_string()
    } else {
        format!("{im}{imaginary}")
    };
    let negative = c.im < 0.0;
    match (re.as_str(), negative) {
        ("0", false) => imag,
        ("0", true) => format!("-{imag}"),
        (_, false) => format!("{re} + {imag}"),
        (_, true) => format!("{re} - {imag}"),
    }
}

//! Culture-invariant number formatting
//!
//! Renders a [`Number`] either with its default textual form or with a
//! format specifier:
//! - standard specifiers: a letter plus optional precision (`F2`, `N0`, `P1`,
//!   `E3`, `D4`, `G5`, `R`)
//! - custom patterns built from `0`, `#`, `.`, `,`, `%` and literal text
//!   (`0.00`, `#,##0`, `000`, `0.#%`)
//!
//! Rounding is half away from zero, applied to the exact binary value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::core::error::FormatError;
use crate::core::number::Number;

/// Static regex for standard specifiers
/// Format: letter followed by optional digits, e.g. F2, n, E10
static STANDARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z])(\d*)$").expect("Invalid STANDARD_RE regex"));

/// Fraction digits needed to print any f64 exactly
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Largest precision a standard specifier accepts
const MAX_PRECISION: usize = 99;

/// Exponent threshold above which default rendering switches to scientific
const SINGLE_SIG_DIGITS: i32 = 7;
const DOUBLE_SIG_DIGITS: i32 = 15;

/// Standard specifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardKind {
    Fixed,
    Number,
    Percent,
    Exponent,
    Decimal,
    General,
    RoundTrip,
}

/// Parsed custom pattern
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomPattern {
    prefix: String,
    suffix: String,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: bool,
    percent: u32,
}

/// A parsed format specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    Default,
    Standard {
        kind: StandardKind,
        precision: Option<usize>,
        upper: bool,
    },
    Custom(CustomPattern),
}

impl FromStr for FormatSpec {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(FormatSpec::Default);
        }

        if let Some(caps) = STANDARD_RE.captures(s) {
            let letter = caps[1].chars().next().unwrap_or_default();
            let digits = &caps[2];

            let precision = if digits.is_empty() {
                None
            } else {
                match digits.parse::<usize>() {
                    Ok(p) if digits.len() <= 2 && p <= MAX_PRECISION => Some(p),
                    _ => return Err(FormatError::InvalidPrecision(s.to_string())),
                }
            };

            let kind = match letter.to_ascii_uppercase() {
                'F' => StandardKind::Fixed,
                'N' => StandardKind::Number,
                'P' => StandardKind::Percent,
                'E' => StandardKind::Exponent,
                'D' => StandardKind::Decimal,
                'G' => StandardKind::General,
                'R' => StandardKind::RoundTrip,
                _ => return Err(FormatError::Unsupported(s.to_string())),
            };

            return Ok(FormatSpec::Standard {
                kind,
                precision,
                upper: letter.is_ascii_uppercase(),
            });
        }

        CustomPattern::parse(s).map(FormatSpec::Custom)
    }
}

impl FormatSpec {
    /// Render a number with this specifier
    pub fn render(&self, n: Number) -> Result<String, FormatError> {
        match self {
            FormatSpec::Default => Ok(default_string(n)),
            FormatSpec::Standard {
                kind,
                precision,
                upper,
            } => render_standard(*kind, *precision, *upper, n),
            FormatSpec::Custom(pattern) => Ok(match non_finite(n) {
                Some(s) => s,
                None => pattern.render(n.to_f64()),
            }),
        }
    }
}

fn render_standard(
    kind: StandardKind,
    precision: Option<usize>,
    upper: bool,
    n: Number,
) -> Result<String, FormatError> {
    if kind != StandardKind::Decimal {
        if let Some(s) = non_finite(n) {
            return Ok(s);
        }
    }

    let v = n.to_f64();
    let marker = if upper { 'E' } else { 'e' };
    Ok(match kind {
        StandardKind::Fixed => fixed(v, precision.unwrap_or(2)),
        StandardKind::Number => grouped(v, 0, precision.unwrap_or(2)),
        StandardKind::Percent => format!("{} %", grouped(v, 2, precision.unwrap_or(2))),
        StandardKind::Exponent => exponent(v, precision.unwrap_or(6), marker),
        StandardKind::Decimal => match n {
            Number::Int(i) => decimal(i, precision.unwrap_or(0)),
            _ => return Err(FormatError::IntegerOnly(spec_text(kind, precision, upper))),
        },
        StandardKind::General => match precision {
            None | Some(0) => default_string(n),
            Some(p) => general(v, p, marker),
        },
        StandardKind::RoundTrip => default_string(n),
    })
}

fn spec_text(kind: StandardKind, precision: Option<usize>, upper: bool) -> String {
    let letter = match kind {
        StandardKind::Fixed => 'F',
        StandardKind::Number => 'N',
        StandardKind::Percent => 'P',
        StandardKind::Exponent => 'E',
        StandardKind::Decimal => 'D',
        StandardKind::General => 'G',
        StandardKind::RoundTrip => 'R',
    };
    let letter = if upper {
        letter
    } else {
        letter.to_ascii_lowercase()
    };
    match precision {
        Some(p) => format!("{}{}", letter, p),
        None => letter.to_string(),
    }
}

/// Render `value` with `spec`; an empty spec selects the default rendering
pub fn format_number(value: impl Into<Number>, spec: &str) -> Result<String, FormatError> {
    spec.parse::<FormatSpec>()?.render(value.into())
}

/// Default culture-invariant rendering
pub fn default_string(n: Number) -> String {
    if let Some(s) = non_finite(n) {
        return s;
    }
    match n {
        Number::Int(v) => v.to_string(),
        Number::Single(v) => shortest(&format!("{:e}", v), format!("{}", v), SINGLE_SIG_DIGITS),
        Number::Double(v) => shortest(&format!("{:e}", v), format!("{}", v), DOUBLE_SIG_DIGITS),
    }
}

fn non_finite(n: Number) -> Option<String> {
    if n.is_finite() {
        return None;
    }
    let v = n.to_f64();
    if v.is_nan() {
        Some("NaN".to_string())
    } else if v == f64::INFINITY {
        Some("Infinity".to_string())
    } else {
        Some("-Infinity".to_string())
    }
}

/// Pick plain or scientific form of a shortest round-trip rendering
///
/// Plain form is kept while the exponent stays below the number of
/// significant digits, or below `sig_digits` for shorter values.
fn shortest(sci: &str, plain: String, sig_digits: i32) -> String {
    let (mantissa, exp) = split_exponent(sci);
    let digit_count = mantissa.bytes().filter(u8::is_ascii_digit).count() as i32;
    if exp > -5 && exp < digit_count.max(sig_digits) {
        plain
    } else {
        format!("{}{}", mantissa, exponent_suffix('E', exp, 2))
    }
}

fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.split_once(['e', 'E']) {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

fn exponent_suffix(marker: char, exp: i32, min_digits: usize) -> String {
    format!(
        "{}{}{:0width$}",
        marker,
        if exp < 0 { '-' } else { '+' },
        exp.unsigned_abs(),
        width = min_digits
    )
}

fn decimal(v: i32, min_digits: usize) -> String {
    let sign = if v < 0 { "-" } else { "" };
    format!("{}{:0width$}", sign, v.unsigned_abs(), width = min_digits)
}

/// Exact decimal expansion of |v| as (integer digits, fraction digits)
fn exact_abs(v: f64) -> (String, String) {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, v.abs());
    match exact.split_once('.') {
        Some((int, frac)) => (int.to_string(), frac.to_string()),
        None => (exact, String::new()),
    }
}

/// Exact expansion of |v| × 10^shift, the decimal point moved in the digit
/// string so large values never overflow
fn scaled_abs(v: f64, shift: usize) -> (String, String) {
    let (mut int, mut frac) = exact_abs(v);
    if frac.len() < shift {
        frac.push_str(&"0".repeat(shift - frac.len()));
    }
    int.push_str(&frac[..shift]);
    frac.drain(..shift);

    let significant = int.trim_start_matches('0');
    let int = if significant.is_empty() {
        "0".to_string()
    } else {
        significant.to_string()
    };
    (int, frac)
}

/// Exact decimal expansion of |v|, rounded half away from zero to `decimals`
fn round_abs(v: f64, decimals: usize) -> String {
    round_scaled_abs(v, 0, decimals)
}

/// |v| × 10^shift rounded half away from zero to `decimals`
fn round_scaled_abs(v: f64, shift: usize, decimals: usize) -> String {
    let (int, mut frac) = scaled_abs(v, shift);
    let round_up = frac.as_bytes().get(decimals).is_some_and(|d| *d >= b'5');
    if frac.len() < decimals {
        frac.push_str(&"0".repeat(decimals - frac.len()));
    }
    frac.truncate(decimals);

    let kept = if decimals == 0 {
        int
    } else {
        format!("{}.{}", int, frac)
    };
    if round_up {
        increment(&kept)
    } else {
        kept
    }
}

/// Add one unit in the last place of a digit string (may contain one '.')
fn increment(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

fn is_zero_digits(s: &str) -> bool {
    s.bytes().all(|b| b == b'0' || b == b'.' || b == b',')
}

fn with_sign(negative: bool, body: String) -> String {
    if negative && !is_zero_digits(&body) {
        format!("-{}", body)
    } else {
        body
    }
}

fn fixed(v: f64, decimals: usize) -> String {
    with_sign(v < 0.0, round_abs(v, decimals))
}

fn grouped(v: f64, shift: usize, decimals: usize) -> String {
    let body = round_scaled_abs(v, shift, decimals);
    let body = match body.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(&body),
    };
    with_sign(v < 0.0, body)
}

fn group_thousands(int: &str) -> String {
    let mut out = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Significant digits of |v| (no leading or trailing zeros) and the decimal
/// exponent of the first one
fn significant_digits(v: f64) -> (String, i32) {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, v.abs());
    let (int, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let all: String = int.chars().chain(frac.chars()).collect();

    match all.find(|c: char| c != '0') {
        Some(first) => {
            let exp = int.len() as i32 - 1 - first as i32;
            let digits = all[first..].trim_end_matches('0').to_string();
            (digits, exp)
        }
        None => ("0".to_string(), 0),
    }
}

/// Round a significant digit string to `count` digits, half away from zero
fn round_significant(digits: &str, exp: i32, count: usize) -> (String, i32) {
    if digits.len() <= count {
        return (format!("{:0<count$}", digits), exp);
    }
    let kept = &digits[..count];
    if digits.as_bytes()[count] >= b'5' {
        let bumped = increment(kept);
        if bumped.len() > count {
            return (bumped[..count].to_string(), exp + 1);
        }
        (bumped, exp)
    } else {
        (kept.to_string(), exp)
    }
}

fn exponent(v: f64, decimals: usize, marker: char) -> String {
    let (digits, exp) = significant_digits(v);
    let (digits, exp) = round_significant(&digits, exp, decimals + 1);
    let mantissa = if decimals == 0 {
        digits
    } else {
        format!("{}.{}", &digits[..1], &digits[1..])
    };
    let exp = if is_zero_digits(&mantissa) { 0 } else { exp };
    with_sign(v < 0.0, format!("{}{}", mantissa, exponent_suffix(marker, exp, 3)))
}

fn general(v: f64, precision: usize, marker: char) -> String {
    let (digits, exp) = significant_digits(v);
    let (digits, exp) = round_significant(&digits, exp, precision);
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        return "0".to_string();
    }

    let body = if exp < -4 || exp >= precision as i32 {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits.to_string()
        };
        format!("{}{}", mantissa, exponent_suffix(marker, exp, 2))
    } else if exp < 0 {
        format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits)
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{:0<int_len$}", digits)
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    };
    with_sign(v < 0.0, body)
}

impl CustomPattern {
    /// Parse a custom pattern such as `#,##0.00`
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let mut pattern = CustomPattern::default();
        let mut seen_number = false;
        let mut in_fraction = false;
        let mut int_count = 0usize;
        let mut frac_count = 0usize;
        let mut first_int_zero: Option<usize> = None;
        let mut pending_comma = false;
        let mut suffix_started = false;
        let unsupported = || FormatError::Unsupported(spec.to_string());

        let mut chars = spec.chars();
        while let Some(c) = chars.next() {
            // the number block must be contiguous
            if suffix_started && matches!(c, '0' | '#' | '.') {
                return Err(unsupported());
            }

            let literal = match c {
                '0' | '#' => {
                    seen_number = true;
                    if in_fraction {
                        frac_count += 1;
                        if c == '0' {
                            pattern.min_frac = frac_count;
                        }
                    } else {
                        if c == '0' && first_int_zero.is_none() {
                            first_int_zero = Some(int_count);
                        }
                        int_count += 1;
                        if pending_comma {
                            pattern.grouping = true;
                            pending_comma = false;
                        }
                    }
                    continue;
                }
                '.' => {
                    seen_number = true;
                    in_fraction = true;
                    continue;
                }
                ',' => {
                    if !in_fraction && int_count > 0 {
                        pending_comma = true;
                    }
                    continue;
                }
                '%' => {
                    pattern.percent += 1;
                    "%".to_string()
                }
                // scientific notation and sections are not implemented
                ';' => return Err(unsupported()),
                'E' | 'e' if matches!(chars.clone().next(), Some('+' | '-' | '0')) => {
                    return Err(unsupported())
                }
                '\'' | '"' => chars.by_ref().take_while(|&q| q != c).collect(),
                '\\' => chars.next().map(String::from).unwrap_or_default(),
                other => other.to_string(),
            };

            if seen_number {
                suffix_started |= !literal.is_empty();
                pattern.suffix.push_str(&literal);
            } else {
                pattern.prefix.push_str(&literal);
            }
        }

        if int_count + frac_count == 0 {
            return Err(FormatError::NoPlaceholder(spec.to_string()));
        }

        pattern.min_int = first_int_zero.map_or(0, |i| int_count - i);
        pattern.max_frac = frac_count;
        Ok(pattern)
    }

    fn render(&self, v: f64) -> String {
        let rounded = round_scaled_abs(v, 2 * self.percent as usize, self.max_frac);
        let (int, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

        let mut frac = frac.to_string();
        while frac.len() > self.min_frac && frac.ends_with('0') {
            frac.pop();
        }

        let int = if int == "0" && self.min_int == 0 {
            String::new()
        } else if int.len() < self.min_int {
            format!("{:0>width$}", int, width = self.min_int)
        } else {
            int.to_string()
        };
        let int = if self.grouping {
            group_thousands(&int)
        } else {
            int
        };

        let mut number = int;
        if !frac.is_empty() {
            number.push('.');
            number.push_str(&frac);
        }

        let sign = if v < 0.0 && !is_zero_digits(&number) {
            "-"
        } else {
            ""
        };
        format!("{}{}{}{}", sign, self.prefix, number, self.suffix)
    }
}

//! Translation of Dirac notation text into evaluator expressions.
//!
//! [`to_expression`] rewrites every bra and ket token into a matrix literal
//! and hands everything else through untouched, so the surrounding
//! arithmetic (`+`, juxtaposition, function calls, `i`) is left to
//! [`dirac_expr`]. The rewrite runs in stages:
//!
//! 1. Unicode brackets and bars are folded to `<`, `>` and `|`.
//! 2. Closed brackets `<a|b>` are split into `<a| |b>`.
//! 3. The longest label fixes the qubit count for the whole input.
//! 4. Bras become `(conj(transpose(([..]))))`.
//! 5. Kets become column literals `([0; 1; 0; 0])`.
//! 6. TeX calls `\name{args}` become `(name(args))`.

use dirac_expr::{MAX_ELEMENTS, evaluate};
use tracing::{debug, trace};

use crate::error::{DiracError, DiracResult};
use crate::value::Value;

/// Longest basis label accepted, in bits.
pub const MAX_QUBITS: u32 = 16;

const BRA_OPEN: char = '<';
const KET_CLOSE: char = '>';
const BAR: char = '|';

/// Parse Dirac notation into a [`Value`].
pub fn parse(text: &str) -> DiracResult<Value> {
    let expression = to_expression(text)?;
    let evaluated = evaluate(&expression)?;
    Ok(Value::from(evaluated))
}

/// Rewrite Dirac notation into a plain evaluator expression.
pub fn to_expression(text: &str) -> DiracResult<String> {
    let s = stage("glyphs", text, normalize_glyphs(text));
    let s = stage("split", &s, split_brackets(&s));

    let qubits = count_qubits(&s)?;
    debug!("Notation uses {} qubit(s)", qubits);
    check_expansion(&s, qubits)?;

    let s = stage(
        "bras",
        &s,
        replace_tokens(&s, BRA_OPEN, BAR, |label| {
            Ok(format!("(conj(transpose({})))", ket_literal(label, qubits)?))
        })?,
    );
    let s = stage(
        "kets",
        &s,
        replace_tokens(&s, BAR, KET_CLOSE, |label| ket_literal(label, qubits))?,
    );
    Ok(stage("tex", &s, rewrite_tex_calls(&s)))
}

fn stage(name: &str, input: &str, output: String) -> String {
    trace!("{}: {:?} becomes {:?}", name, input, output);
    output
}

/// Fold bracket and bar look-alikes to ASCII, and `ⅈ` to `i`.
pub fn normalize_glyphs(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{27E9}' | '\u{3009}' | '\u{232A}' => '>',
            '\u{27E8}' | '\u{3008}' | '\u{2329}' => '<',
            '\u{2223}' | '\u{2502}' => '|',
            '\u{2148}' => 'i',
            other => other,
        })
        .collect()
}

fn is_delimiter(c: char) -> bool {
    matches!(c, BRA_OPEN | KET_CLOSE | BAR)
}

/// End of the run of non-delimiter characters starting at `from`.
fn label_end(s: &str, from: usize) -> usize {
    s[from..]
        .find(is_delimiter)
        .map_or(s.len(), |offset| from + offset)
}

/// Leftmost non-overlapping `open label close` tokens, where the label is a
/// non-empty run of non-delimiters. Yields `(start, end, label)` with `end`
/// one past `close`.
fn find_tokens(s: &str, open: char, close: char) -> Vec<(usize, usize, &str)> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while let Some(offset) = s[pos..].find(open) {
        let start = pos + offset;
        let label_start = start + open.len_utf8();
        let label_stop = label_end(s, label_start);
        if label_stop > label_start && s[label_stop..].starts_with(close) {
            let end = label_stop + close.len_utf8();
            tokens.push((start, end, &s[label_start..label_stop]));
            pos = end;
        } else {
            pos = label_start;
        }
    }
    tokens
}

fn replace_tokens(
    s: &str,
    open: char,
    close: char,
    mut replacement: impl FnMut(&str) -> DiracResult<String>,
) -> DiracResult<String> {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    for (start, end, label) in find_tokens(s, open, close) {
        out.push_str(&s[copied..start]);
        out.push_str(&replacement(label)?);
        copied = end;
    }
    out.push_str(&s[copied..]);
    Ok(out)
}

/// Split every closed bracket `<a|b>` into a bra and a ket, `<a| |b>`.
/// Either label may be empty here.
pub fn split_brackets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    let mut pos = 0;
    while let Some(offset) = s[pos..].find(BRA_OPEN) {
        let start = pos + offset;
        let bar = label_end(s, start + 1);
        if s[bar..].starts_with(BAR) {
            let close = label_end(s, bar + 1);
            if s[close..].starts_with(KET_CLOSE) {
                out.push_str(&s[copied..=bar]);
                out.push(' ');
                out.push_str(&s[bar..=close]);
                copied = close + 1;
                pos = close + 1;
                continue;
            }
        }
        pos = start + 1;
    }
    out.push_str(&s[copied..]);
    out
}

/// Binary digits of a label; anything else is ignored.
fn label_bits(label: &str) -> DiracResult<String> {
    let bits: String = label.chars().filter(|c| matches!(c, '0' | '1')).collect();
    if bits.is_empty() {
        return Err(DiracError::Parse(format!(
            "basis label '{label}' has no binary digits"
        )));
    }
    if bits.len() > MAX_QUBITS as usize {
        return Err(DiracError::Parse(format!(
            "basis label '{label}' exceeds {MAX_QUBITS} qubits"
        )));
    }
    Ok(bits)
}

/// Longest label among all bras and kets, and at least 1.
fn count_qubits(s: &str) -> DiracResult<u32> {
    find_tokens(s, BRA_OPEN, BAR)
        .into_iter()
        .chain(find_tokens(s, BAR, KET_CLOSE))
        .try_fold(1, |qubits, (_, _, label)| {
            let width = u32::try_from(label_bits(label)?.len()).unwrap_or(MAX_QUBITS);
            Ok(qubits.max(width))
        })
}

/// Reject input whose bras and kets together expand to more literal entries
/// than the evaluator accepts in one matrix.
fn check_expansion(s: &str, qubits: u32) -> DiracResult<()> {
    let tokens = find_tokens(s, BRA_OPEN, BAR).len() + find_tokens(s, BAR, KET_CLOSE).len();
    let entries = tokens.saturating_mul(1_usize << qubits);
    if entries > MAX_ELEMENTS {
        return Err(DiracError::Parse(format!(
            "{tokens} basis vector(s) over {qubits} qubits expand to {entries} entries, \
             exceeding the limit of {MAX_ELEMENTS}"
        )));
    }
    Ok(())
}

/// Column literal for the basis ket named by `label`, sized for at least
/// `qubits` qubits.
pub fn ket_literal(label: &str, qubits: u32) -> DiracResult<String> {
    let bits = label_bits(label)?;
    let index = usize::from_str_radix(&bits, 2)
        .map_err(|e| DiracError::Parse(format!("basis label '{label}': {e}")))?;
    let width = (bits.len() as u32).max(qubits);
    let dim = 1_usize << width;

    let mut literal = String::with_capacity(2 * dim + 4);
    literal.push_str("([");
    for row in 0..dim {
        if row > 0 {
            literal.push(';');
        }
        literal.push(if row == index { '1' } else { '0' });
    }
    literal.push_str("])");
    Ok(literal)
}

/// Rewrite `\name{args}` as `(name(args))`, where `name` is lowercase ASCII
/// and `args` contains no `}`.
pub fn rewrite_tex_calls(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    let mut pos = 0;
    while let Some(offset) = s[pos..].find('\\') {
        let start = pos + offset;
        let name_start = start + 1;
        let name_end = s[name_start..]
            .find(|c: char| !c.is_ascii_lowercase())
            .map_or(s.len(), |o| name_start + o);
        if s[name_end..].starts_with('{') {
            if let Some(close) = s[name_end + 1..].find('}') {
                let args_end = name_end + 1 + close;
                out.push_str(&s[copied..start]);
                out.push('(');
                out.push_str(&s[name_start..name_end]);
                out.push('(');
                out.push_str(&s[name_end + 1..args_end]);
                out.push_str("))");
                copied = args_end + 1;
                pos = args_end + 1;
                continue;
            }
            // no closing brace anywhere further on
            break;
        }
        pos = name_start;
    }
    out.push_str(&s[copied..]);
    out
}

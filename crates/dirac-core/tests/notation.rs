//! End-to-end tests for parsing, algebra and formatting of Dirac notation.

use dirac_core::{DiracError, FormatSpec, Shape, Value, evaluate_notation};
use ndarray::{Array2, array};
use num_complex::Complex64;

const EPS: f64 = 1e-9;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn ascii(text: &str) -> String {
    Value::parse(text).unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[test]
fn scalar_rendering() {
    assert_eq!(Value::new().to_string(), "1");
    assert_eq!(Value::scalar(c(3.25, 0.0)).to_string(), "3.25");
    assert_eq!(Value::scalar(c(1.0, 1.0)).to_string(), "1 + i");
}

#[test]
fn imaginary_scalars() {
    assert_eq!(ascii("-i"), "-i");
    assert_eq!(ascii("1-i"), "1 - i");
    assert_eq!(ascii("2i"), "2i");
}

#[test]
fn identifiers_containing_i_are_untouched() {
    assert_eq!(ascii("sin(pi/2)"), "1");
    assert_eq!(ascii("asin(1) - pi/2"), "0");
    assert_eq!(ascii("sinh(0) + i"), "i");
}

#[test]
fn scalar_norms() {
    let n = Value::parse("1 - i").unwrap().abs().unwrap();
    assert!((n - 2.0_f64.sqrt()).abs() < EPS);
}

// ---------------------------------------------------------------------------
// Bras and kets
// ---------------------------------------------------------------------------

#[test]
fn inner_products_of_raw_arrays() {
    let mut v = Value::new();
    v.bra(array![[c(0.0, 0.0), c(1.0, 0.0)]])
        .unwrap()
        .ket(array![[c(0.0, 0.0)], [c(1.0, 0.0)]])
        .unwrap();
    assert_eq!(v.to_string(), "1");

    let mut v = Value::new();
    v.bra(array![[c(1.0, 0.0), c(0.0, 0.0)]])
        .unwrap()
        .ket(array![[c(0.0, 0.0)], [c(1.0, 0.0)]])
        .unwrap();
    assert_eq!(v.to_string(), "0");
}

#[test]
fn ket_labels_are_padded_to_qubit_count() {
    let mut v = Value::new();
    v.ket(array![[c(0.0, 0.0)], [c(0.0, 0.0)], [c(1.0, 0.0)]])
        .unwrap();
    assert_eq!(v.to_string(), "|10>");

    let mut v = Value::new();
    v.ket(array![[c(1.0, 0.0)], [c(1.0, 0.0)]]).unwrap();
    assert_eq!(v.to_string(), "|0> + |1>");
}

#[test]
fn dagger_of_ket() {
    let mut v = Value::new();
    v.ket(array![[c(1.0, 0.0)], [c(0.0, 1.0)]]).unwrap().dagger();
    assert_eq!(v.to_string(), "<0| - i<1|");
}

#[test]
fn parse_superposition() {
    assert_eq!(ascii("|0>+i|1>"), "|0> + i|1>");
    assert_eq!(
        ascii("sin(pi/4) |0> + cos(pi/4) |1>"),
        "0.7071|0> + 0.7071|1>"
    );
}

#[test]
fn closed_bracket_is_inner_product() {
    assert_eq!(ascii("<1|1>"), "1");
    assert_eq!(ascii("<0|1>"), "0");
    assert_eq!(ascii("<01|01>"), "1");
}

#[test]
fn qubit_count_widens_to_longest_label() {
    assert_eq!(ascii("<10| + <1|"), "<01| + <10|");
    assert_eq!(ascii("|100> + |1>"), "|001> + |100>");
}

#[test]
fn ket_norm() {
    let n = Value::parse("|0> + i|1>").unwrap().abs().unwrap();
    assert!((n - 2.0_f64.sqrt()).abs() < EPS);
}

#[test]
fn unicode_input() {
    assert_eq!(ascii("⟨0∣0⟩"), "1");
    assert_eq!(ascii("〈1∣ + 〈0│"), "<0| + <1|");
    assert_eq!(ascii("|1〉 - |0⟩"), "-|0> + |1>");
}

#[test]
fn tex_function_calls() {
    assert_eq!(ascii("\\sqrt{2}|0>"), "1.4142|0>");
    assert_eq!(ascii("1/\\sqrt{2}(|0> + |1>)"), "0.7071|0> + 0.7071|1>");
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[test]
fn projector_onto_basis_ket() {
    let mut v = Value::new();
    v.project(array![[c(0.0, 0.0)], [c(1.0, 0.0)]]).unwrap();
    assert_eq!(v.to_string(), "|1><1|");
}

#[test]
fn outer_product_of_sums() {
    assert_eq!(
        ascii("(|0>+|1>)(<0|+<1|)"),
        "|0><0| + |0><1| + |1><0| + |1><1|"
    );
}

#[test]
fn operator_sum_extends_labels() {
    assert_eq!(
        ascii("|0><0| + |100><1|"),
        "|000><000| + |100><001|"
    );
}

#[test]
fn operator_arithmetic_across_sizes() {
    let small = Value::parse("|1><1|").unwrap();
    let large = Value::parse("|10><10|").unwrap();

    let mut sum = small.clone();
    sum.plus(&large).unwrap();
    assert_eq!(sum.to_string(), "|01><01| + |10><10|");

    let mut difference = small;
    difference.minus(&large).unwrap();
    assert_eq!(difference.to_string(), "|01><01| - |10><10|");
}

#[test]
fn unicode_output() {
    let v = Value::parse("ⅈ|1〉〈1|").unwrap();
    assert_eq!(v.to_unicode(), "ⅈ|1〉〈1|");
    assert_eq!(v.to_string(), "i|1><1|");
    assert_eq!(v.to_tex(), "\\imath|1\\rangle\\langle1|");
}

#[test]
fn html_output() {
    let v = Value::parse("|1>").unwrap();
    assert_eq!(v.to_html(), "<span class=\"ket\">|1&gt;</span>");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn malformed_text_is_a_parse_error() {
    assert!(matches!(Value::parse("|0> +"), Err(DiracError::Parse(_))));
    assert!(matches!(Value::parse("|ab>"), Err(DiracError::Parse(_))));
    assert!(matches!(
        Value::parse(&format!("|{}>", "0".repeat(17))),
        Err(DiracError::Parse(_))
    ));
    assert!(matches!(Value::parse("foo(1)"), Err(DiracError::Parse(_))));
}

#[test]
fn pathological_input_is_an_error() {
    // 16-qubit outer product would be 2^32 entries
    assert!(matches!(
        Value::parse(&format!("|{}><0|", "1".repeat(16))),
        Err(DiracError::Parse(msg)) if msg.contains("exceeds the limit")
    ));
    // the 16-qubit ket itself is fine
    assert_eq!(
        Value::parse(&format!("|{}>", "1".repeat(16))).unwrap().qubits(),
        16
    );

    let nested = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    assert!(matches!(
        Value::parse(&nested),
        Err(DiracError::Parse(msg)) if msg.contains("nested too deeply")
    ));

    let id = Value::parse("([1,0;0,1])^2000000000").unwrap();
    assert_eq!(id.dims(), (2, 2));
    assert_eq!(id.get(), Value::parse("[1,0;0,1]").unwrap().get());
}

#[test]
fn mixed_shapes_do_not_add() {
    assert!(matches!(
        Value::parse("|0> + <0|"),
        Err(DiracError::Parse(_))
    ));
    let mut ket = Value::parse("|0>").unwrap();
    let bra = Value::parse("<0|").unwrap();
    assert!(matches!(
        ket.plus(&bra),
        Err(DiracError::ShapeMismatch { .. })
    ));
    assert_eq!(ket.shape(), Shape::Ket);
}

#[test]
fn operator_has_no_norm() {
    let mut v = Value::parse("|0><1|").unwrap();
    assert!(matches!(
        v.normalize(),
        Err(DiracError::Unimplemented { .. })
    ));
}

// ---------------------------------------------------------------------------
// Presentation entry point
// ---------------------------------------------------------------------------

#[test]
fn evaluate_notation_normalizes_vectors() {
    assert_eq!(
        evaluate_notation("|0> + |1>", true).unwrap(),
        "0.7071|0> + 0.7071|1>"
    );
    assert_eq!(evaluate_notation("|0> + |1>", false).unwrap(), "|0> + |1>");
    assert_eq!(evaluate_notation("|0><1|", true).unwrap(), "|0><1|");
}

#[test]
fn custom_precision() {
    let v = Value::parse("|0> + |1>")
        .unwrap()
        .normalize()
        .unwrap()
        .format(&FormatSpec::ascii().with_decimals(2));
    assert_eq!(v, "0.71|0> + 0.71|1>");
}

#[test]
fn ket_from_array_matches_literal() {
    let mut v = Value::new();
    v.ket_from_array(&[c(0.0, 0.0), c(1.0, 0.0)]).unwrap();
    let expected: Array2<Complex64> = array![[c(0.0, 0.0)], [c(1.0, 0.0)]];
    assert_eq!(v.matrix(), &expected);
    assert_eq!(v, Value::parse("|1>").unwrap());
}

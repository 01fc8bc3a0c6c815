use smith_trace::errors::SmithError;
use smith_trace::matrix::Matrix;
use smith_trace::{decompose, replay};

#[test]
fn happy_flow() -> Result<(), SmithError> {
    let original: Matrix = serde_json::from_str("[[2, 4, 4], [-6, 6, 12], [10, -4, -16]]")?;

    let mut reduced = original.clone();
    let trace = decompose(&mut reduced)?;

    dbg!(trace.operation_count());

    assert!(reduced.is_smith_normal_form());
    assert_eq!(replay(&original, trace.operations())?, reduced);
    assert_eq!(
        reduced.determinant()?.magnitude(),
        original.determinant()?.magnitude()
    );

    Ok(())
}

#[test]
fn trace_survives_json() -> Result<(), SmithError> {
    let original = Matrix::try_from(vec![vec![6, 4], vec![9, 7]])?;
    let mut reduced = original.clone();
    let trace = decompose(&mut reduced)?;

    let text = serde_json::to_string(&trace)?;
    let back: smith_trace::Trace = serde_json::from_str(&text)?;

    assert_eq!(back, trace);
    assert_eq!(replay(&original, back.operations())?, reduced);

    Ok(())
}

#[test]
fn invalid_input_is_rejected_before_any_work() {
    let ragged: Result<Matrix, _> = serde_json::from_str("[[1, 2], [3]]");
    assert!(ragged.is_err());

    let empty: Result<Matrix, _> = serde_json::from_str("[]");
    assert!(empty.is_err());

    let not_integer: Result<Matrix, _> = serde_json::from_str(r#"[["seven"]]"#);
    assert!(not_integer.is_err());
}

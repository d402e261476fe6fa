use super::*;
use crate::penalty::PenaltyMethod;
use crate::scalar::Expr;
use crate::search_space::Binarization;
use std::sync::atomic::{AtomicUsize, Ordering};

fn bit(x: &[u8], i: usize) -> f64 {
    f64::from(x[i])
}

fn g(x: &[u8]) -> f64 {
    let (a, b) = (bit(x, 0), bit(x, 1));
    1.0 + 2.0 * a + 3.0 * b + 4.0 * a * b
}

fn quadratic(x: &[u8]) -> f64 {
    -3.0 + 2.5 * bit(x, 0) - bit(x, 2) + 7.0 * bit(x, 0) * bit(x, 3) - 0.5 * bit(x, 1) * bit(x, 4)
        + 1.25 * bit(x, 3) * bit(x, 4)
}

fn sequential() -> SamplingCompiler {
    SamplingCompiler::new().with_parallel(false)
}

fn all_vectors(n: usize) -> impl Iterator<Item = Vec<u8>> {
    (0..1u32 << n).map(move |k| (0..n).map(|i| u8::from(k & (1 << i) != 0)).collect())
}

#[test]
fn test_single_variable_identity() {
    let f = |x: &[u8]| bit(x, 0);
    let compiler = sequential();
    assert_eq!(compiler.coefficients(&f, 1).into_vec(), vec![0.0, 1.0]);

    let q = compiler.compile_numeric(&f, 1).expect("finite");
    assert_eq!(q.matrix().as_slice(), &[1.0]);
    assert_eq!(*q.offset(), 0.0);
}

#[test]
fn test_two_variable_scenario() {
    let compiler = sequential();
    let coefficients = compiler.coefficients(&g, 2);
    assert_eq!(coefficients.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(coefficients.constant(), &1.0);
    assert_eq!(coefficients.get(&SubsetIndex::Pair(0, 1)), Some(&4.0));
    assert_eq!(coefficients.get(&SubsetIndex::Pair(1, 2)), None);

    let q = compiler.compile_numeric(&g, 2).expect("finite");
    assert_eq!(q.matrix().as_slice(), &[2.0, 4.0, 0.0, 3.0]);
    assert_eq!(*q.offset(), 1.0);
}

#[test]
fn test_training_outputs_of_scenario() {
    let outputs: Vec<f64> = crate::sampling::training_samples(2).map(|(_, x)| g(&x)).collect();
    assert_eq!(outputs, vec![1.0, 3.0, 4.0, 10.0]);
}

#[test]
fn test_zero_variables() {
    let q = sequential().compile_numeric(&|_: &[u8]| 42.0, 0).expect("finite");
    assert_eq!(q.size(), 0);
    assert_eq!(*q.offset(), 42.0);
    assert_eq!(q.energy(&[]).expect("empty vector"), 42.0);
}

#[test]
fn test_quadratic_exact_on_every_vector() {
    let q = sequential().compile_numeric(&quadratic, 5).expect("finite");
    for x in all_vectors(5) {
        let energy = q.energy(&x).expect("length ok");
        assert!((energy - quadratic(&x)).abs() < 1e-12, "mismatch on {x:?}");
    }
    // lower triangle stays empty
    for i in 0..5 {
        for j in 0..i {
            assert_eq!(q.matrix()[(i, j)], 0.0);
        }
    }
}

#[test]
fn test_recompiling_energy_is_idempotent() {
    let compiler = sequential();
    let q = compiler.compile_numeric(&quadratic, 5).expect("finite");
    let energy = |x: &[u8]| q.energy_unchecked(x);
    let again = compiler.compile_numeric(&energy, 5).expect("finite");
    assert_eq!(again, q);
}

#[test]
fn test_parallel_matches_sequential() {
    let seq = sequential().coefficients(&quadratic, 5);
    let par = SamplingCompiler::new().with_workers(4).coefficients(&quadratic, 5);
    assert_eq!(seq, par);
}

#[test]
fn test_evaluation_report() {
    let counter = AtomicUsize::new(0);
    let f = |x: &[u8]| {
        counter.fetch_add(1, Ordering::Relaxed);
        quadratic(x)
    };
    let infallible = |x: &[u8]| Ok::<f64, Infallible>(f(x));

    let extraction = sequential().try_extract(&infallible, 5).expect("infallible");
    assert_eq!(extraction.report.mode, EvaluationMode::Sequential);
    assert!(!extraction.report.fell_back);
    assert_eq!(extraction.report.evaluations, 16);
    assert_eq!(counter.load(Ordering::Relaxed), 16);

    let extraction = SamplingCompiler::new()
        .with_workers(2)
        .try_extract(&infallible, 5)
        .expect("infallible");
    assert_eq!(extraction.report.evaluations, 16);
    assert_eq!(counter.load(Ordering::Relaxed), 32);
    if cfg!(feature = "parallel") {
        assert_eq!(extraction.report.mode, EvaluationMode::Parallel { workers: 2 });
    }
}

#[test]
fn test_single_worker_runs_sequentially() {
    let infallible = |x: &[u8]| Ok::<f64, Infallible>(g(x));
    let extraction = SamplingCompiler::new().with_workers(1).try_extract(&infallible, 2).expect("infallible");
    assert_eq!(extraction.report.mode, EvaluationMode::Sequential);
    assert!(!extraction.report.fell_back);
}

#[test]
fn test_fallible_error_is_returned_unchanged() {
    #[derive(Debug, PartialEq)]
    struct OracleDown(usize);

    let f = |x: &[u8]| {
        if x[2] == 1 {
            Err(OracleDown(2))
        } else {
            Ok(bit(x, 0))
        }
    };
    for compiler in [sequential(), SamplingCompiler::new().with_workers(3)] {
        let err = compiler.try_coefficients(&f, 4).expect_err("fails on bit 2");
        assert_eq!(err, OracleDown(2));
    }
}

#[test]
fn test_try_compile_converts_error() {
    let f = |_: &[u8]| -> std::result::Result<f64, QubifyError> {
        Err(QubifyError::evaluation(std::io::Error::other("solver offline")))
    };
    let err = sequential().try_compile(&f, 3).expect_err("fails");
    assert!(matches!(err, QubifyError::Evaluation(_)));
    assert!(err.to_string().contains("solver offline"));
}

#[test]
fn test_non_finite_output_is_coercion_error() {
    let f = |x: &[u8]| if x[1] == 1 && x[2] == 1 { f64::NAN } else { 1.0 };
    let err = sequential().compile(&f, 3).expect_err("NaN coefficient");
    match err {
        // only the (1, 2) sample sets both bits; it is the last entry for n = 3
        QubifyError::Coercion { position, .. } => assert_eq!(position, 6),
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[test]
fn test_integer_outputs() {
    let f = |x: &[u8]| 5_i64 - 2 * i64::from(x[0]) + 3 * i64::from(x[0]) * i64::from(x[1]);
    let q = sequential().compile(&f, 2).expect("numeric").into_numeric("test").expect("numeric");
    assert_eq!(q.matrix().as_slice(), &[-2.0, 3.0, 0.0, 0.0]);
    assert_eq!(*q.offset(), 5.0);
}

#[test]
fn test_symbolic_outputs() {
    let f = |x: &[u8]| Expr::symbol("w") * bit(x, 0) + 2.0 * bit(x, 0) * bit(x, 1);
    let compiled = sequential().compile(&f, 2).expect("symbolic");
    assert!(compiled.is_symbolic());
    let err = compiled.clone().into_numeric("energy").expect_err("symbolic");
    assert!(matches!(err, QubifyError::SymbolicUnsupported { .. }));

    let q = compiled.into_symbolic();
    assert_eq!(q.matrix()[(0, 0)], Expr::symbol("w"));
    assert_eq!(q.matrix()[(0, 1)], Expr::constant(2.0));
    assert_eq!(q.matrix()[(1, 1)], Expr::default());
    assert!(q.offset().is_constant());
}

#[test]
fn test_numeric_expr_outputs_stay_numeric() {
    let f = |x: &[u8]| Expr::constant(3.0) * bit(x, 1) + 1.0;
    let compiled = sequential().compile(&f, 2).expect("numeric");
    let q = compiled.as_numeric().expect("no placeholders survive");
    assert_eq!(q.matrix().as_slice(), &[0.0, 0.0, 0.0, 3.0]);
    assert_eq!(*q.offset(), 1.0);
}

#[test]
fn test_compile_in_search_space() {
    let space = SearchSpace::from_variables([("a", Binarization::Uint, 3), ("b", Binarization::Uint, 3)])
        .expect("valid space");
    let linear = |v: &[u64]| 2.0 * v[0] as f64 + 3.0 * v[1] as f64;

    let compiled = sequential().compile_in(&space, &linear).expect("compiles");
    let q = compiled.as_numeric().expect("numeric");
    assert_eq!(q.size(), 6);

    let values = std::collections::BTreeMap::from([("a".to_string(), 3), ("b".to_string(), 6)]);
    let x = space.encode(&values).expect("fits");
    assert_eq!(q.energy(&x).expect("length ok"), 24.0);
}

#[test]
fn test_compile_constrained() {
    // choose exactly one of two items
    let cost = |x: &[u8]| -bit(x, 0) - 2.0 * bit(x, 1);
    let constraint = |x: &[u8]| (bit(x, 0) + bit(x, 1) - 1.0).powi(2);

    let penalized = sequential()
        .with_penalty(PenaltyMethod::Sum)
        .compile_constrained(&cost, &constraint, 2)
        .expect("compiles");
    assert_eq!(penalized.weight, 3.0);
    assert_eq!(*penalized.qubo.offset(), 1.0);

    let best = all_vectors(2)
        .min_by(|a, b| {
            let ea = penalized.qubo.energy_unchecked(a);
            let eb = penalized.qubo.energy_unchecked(b);
            ea.total_cmp(&eb)
        })
        .expect("non-empty");
    assert_eq!(best, vec![0, 1]);

    let explicit = sequential()
        .with_penalty(0.0)
        .compile_constrained(&cost, &constraint, 2)
        .expect("compiles");
    assert_eq!(explicit.weight, 0.0);
    assert_eq!(explicit.qubo.matrix().as_slice(), &[-1.0, 0.0, 0.0, -2.0]);
}

#[test]
fn test_from_values_length() {
    let err = Coefficients::from_values(3, vec![0.0; 4]).expect_err("needs 7 entries");
    assert!(matches!(err, QubifyError::DimensionMismatch { .. }));

    let table = Coefficients::from_values(3, (0..7).map(f64::from).collect()).expect("valid");
    assert_eq!(table.len(), 7);
    assert_eq!(table[4], 4.0);
    let q = table.to_qubo();
    assert_eq!(q.matrix()[(0, 1)], 4.0);
    assert_eq!(q.matrix()[(1, 2)], 6.0);
    assert_eq!(q.matrix()[(2, 2)], 3.0);
}

#[test]
fn test_from_config_rejects_zero_workers() {
    let config = CompilerConfig {
        workers: Some(0),
        ..CompilerConfig::default()
    };
    let err = SamplingCompiler::from_config(config).expect_err("invalid");
    assert!(err.is_configuration());
}

#[test]
fn test_verifier_inherits_config() {
    let compiler = sequential().with_seed(11);
    assert_eq!(compiler.verifier(), FidelityVerifier::default().with_seed(11));
}

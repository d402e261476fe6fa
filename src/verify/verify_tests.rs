use super::*;
use crate::compiler::SamplingCompiler;
use crate::scalar::Expr;

fn bit(x: &[u8], i: usize) -> f64 {
    f64::from(x[i])
}

fn quadratic(x: &[u8]) -> f64 {
    2.0 - bit(x, 0) + 4.0 * bit(x, 1) * bit(x, 3) - 1.5 * bit(x, 2) * bit(x, 4) + 0.25 * bit(x, 5)
}

fn cubic(x: &[u8]) -> f64 {
    1.0 + 3.0 * bit(x, 1) + bit(x, 0) * bit(x, 1) * bit(x, 2)
}

fn compiler() -> SamplingCompiler {
    SamplingCompiler::new().with_parallel(false)
}

#[test]
fn test_quadratic_passes() {
    let q = compiler().compile_numeric(&quadratic, 6).expect("finite");
    let verifier = FidelityVerifier::default().with_test_samples(30).with_seed(5);
    let report = verifier.report(&quadratic, &q);
    assert!(report.passed());
    assert_eq!(report.samples_checked, 30);
    assert!(!report.clamped);
    assert!(report.max_residual <= 1e-8);
}

#[test]
fn test_cubic_fails_with_defaults() {
    let q = compiler().compile_numeric(&cubic, 3).expect("finite");
    let report = FidelityVerifier::default().report(&cubic, &q);

    assert!(!report.passed());
    // only [1, 1, 1] exists with weight >= 3
    assert!(report.clamped);
    assert_eq!(report.requested, 3);
    assert_eq!(report.samples_checked, 1);
    assert_eq!(report.mismatches[0].sample, vec![1, 1, 1]);
    assert_eq!(report.mismatches[0].expected, 5.0);
    assert_eq!(report.mismatches[0].actual, 4.0);
    assert!((report.mismatches[0].residual() - 1.0).abs() < 1e-12);
}

#[test]
fn test_cubic_detected_in_larger_space() {
    let q = compiler().compile_numeric(&cubic, 8).expect("finite");
    // every weight-3 vector containing bits 0..3 exposes the cubic term
    let verifier = FidelityVerifier::default()
        .with_test_samples(crate::sampling::max_test_samples(8))
        .with_seed(1);
    assert!(!verifier.verify(&cubic, &q));
}

#[test]
fn test_nothing_to_check_is_a_pass() {
    let f = |x: &[u8]| bit(x, 0) * bit(x, 1);
    let q = compiler().compile_numeric(&f, 2).expect("finite");
    let report = FidelityVerifier::default().with_test_samples(4).report(&f, &q);
    assert!(report.passed());
    assert_eq!(report.samples_checked, 0);
    assert!(report.clamped);
    assert_eq!(report.max_residual, 0.0);
}

#[test]
fn test_tolerance_absorbs_small_noise() {
    let q = compiler().compile_numeric(&quadratic, 6).expect("finite");
    let noisy = |x: &[u8]| quadratic(x) + 1e-6;
    let strict = FidelityVerifier::default().with_seed(2).with_test_samples(10);
    let loose = strict.clone().with_tolerance(1e-4);
    assert!(!strict.verify(&noisy, &q));
    assert!(loose.verify(&noisy, &q));
}

#[test]
fn test_nan_output_fails() {
    let q = compiler().compile_numeric(&quadratic, 6).expect("finite");
    let nan_on_heavy = |x: &[u8]| {
        if x.iter().filter(|&&b| b == 1).count() >= 3 {
            f64::NAN
        } else {
            quadratic(x)
        }
    };
    let report = FidelityVerifier::default().with_test_samples(3).with_seed(9).report(&nan_on_heavy, &q);
    assert!(!report.passed());
    assert_eq!(report.mismatches.len(), 3);
    assert!(report.max_residual.is_nan());
}

#[test]
fn test_try_report_propagates_error() {
    let q = compiler().compile_numeric(&quadratic, 6).expect("finite");
    let failing = |_: &[u8]| Err::<f64, &str>("oracle unavailable");
    let err = FidelityVerifier::default().try_report(&failing, &q).expect_err("fails");
    assert_eq!(err, "oracle unavailable");
}

#[test]
fn test_verify_compiled_rejects_symbolic() {
    let f = |x: &[u8]| Expr::symbol("w") * bit(x, 0);
    let compiled = compiler().compile(&f, 3).expect("symbolic is fine");
    assert!(compiled.is_symbolic());
    let err = FidelityVerifier::default()
        .verify_compiled(&|x: &[u8]| bit(x, 0), &compiled)
        .expect_err("symbolic");
    assert!(err.to_string().contains("verification"));
}

#[test]
fn test_from_config() {
    let config = CompilerConfig::default().with_test_samples(7).with_tolerance(0.5).with_seed(3);
    let verifier = FidelityVerifier::from_config(&config);
    assert_eq!(
        verifier,
        FidelityVerifier::default().with_test_samples(7).with_tolerance(0.5).with_seed(3)
    );
}

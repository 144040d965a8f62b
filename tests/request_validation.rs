use vid2pdf::error::PipelineError;
use vid2pdf::extract::filter_expr;
use vid2pdf::request::{Method, parse_parameter};

#[test]
fn interval_accepts_positive_values() {
    assert_eq!(parse_parameter(Method::FixedInterval, "0.5").unwrap(), 0.5);
    assert_eq!(parse_parameter(Method::FixedInterval, "2").unwrap(), 2.0);
    assert_eq!(parse_parameter(Method::FixedInterval, " 10 ").unwrap(), 10.0);
}

#[test]
fn interval_rejects_nonpositive_and_junk() {
    for raw in ["0", "-1", "abc", "", "NaN", "inf"] {
        let err = parse_parameter(Method::FixedInterval, raw).unwrap_err();
        assert!(
            matches!(err, PipelineError::InvalidInput(_)),
            "expected InvalidInput for {raw:?}"
        );
        assert!(err.to_string().contains("interval must be positive"));
    }
}

#[test]
fn blank_threshold_defaults_to_0_3() {
    assert_eq!(parse_parameter(Method::SceneChange, "").unwrap(), 0.3);
    assert_eq!(parse_parameter(Method::SceneChange, "   ").unwrap(), 0.3);
}

#[test]
fn threshold_bounds_are_inclusive() {
    assert_eq!(parse_parameter(Method::SceneChange, "0").unwrap(), 0.0);
    assert_eq!(parse_parameter(Method::SceneChange, "1").unwrap(), 1.0);
    assert_eq!(parse_parameter(Method::SceneChange, "0.45").unwrap(), 0.45);
}

#[test]
fn threshold_rejects_out_of_range() {
    for raw in ["-1", "1.0001", "nope", "NaN"] {
        let err = parse_parameter(Method::SceneChange, raw).unwrap_err();
        assert!(err.to_string().contains("threshold must be in [0,1]"));
    }
}

#[test]
fn fixed_interval_filter_samples_at_one_over_t() {
    assert_eq!(filter_expr(Method::FixedInterval, 0.5), "fps=1/0.5");
    assert_eq!(filter_expr(Method::FixedInterval, 2.0), "fps=1/2");
}

#[test]
fn scene_filter_gates_on_threshold() {
    assert_eq!(filter_expr(Method::SceneChange, 0.3), "select='gt(scene,0.3)'");
}

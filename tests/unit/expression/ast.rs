use super::*;

fn env(progress: f64, zoom: Option<f64>) -> Env {
    Env {
        progress,
        input_width: 3840.0,
        input_height: 2160.0,
        zoom,
    }
}

#[test]
fn linear_ramp_evaluates_at_endpoints() {
    let e = Expr::constant(1.0) + (Expr::constant(1.1) - Expr::constant(1.0)) * Expr::progress();
    assert_eq!(e.eval(&env(0.0, None)).unwrap(), 1.0);
    assert!((e.eval(&env(1.0, None)).unwrap() - 1.1).abs() < 1e-12);
}

#[test]
fn centered_offset_uses_current_zoom() {
    let iw = Expr::var(Var::InputWidth);
    let e = (iw.clone() - iw / Expr::var(Var::Zoom)) / Expr::constant(2.0);
    assert_eq!(e.eval(&env(0.3, Some(1.0))).unwrap(), 0.0);
    let v = e.eval(&env(0.3, Some(1.1))).unwrap();
    assert!((v - (3840.0 - 3840.0 / 1.1) / 2.0).abs() < 1e-9);
}

#[test]
fn unbound_zoom_is_an_error() {
    let e = Expr::var(Var::Zoom);
    assert!(matches!(
        e.eval(&env(0.0, None)),
        Err(StoryreelError::Validation(_))
    ));
}

#[test]
fn division_by_zero_is_an_error() {
    let e = Expr::constant(1.0) / Expr::progress();
    assert!(e.eval(&env(0.0, None)).is_err());
    assert_eq!(e.eval(&env(0.5, None)).unwrap(), 2.0);
}

#[test]
fn references_walks_the_tree() {
    let e = Expr::constant(2.0) * (Expr::var(Var::InputHeight) - Expr::var(Var::Zoom));
    assert!(e.references(Var::Zoom));
    assert!(e.references(Var::InputHeight));
    assert!(!e.references(Var::Progress));
}

mod common;

use common::{Fixture, CONSOLE_WRITE_LINE, MATH_ABS};
use pretty_assertions::assert_eq;
use purecheck::diagnostics::{check_enforced, IMPURE_FUNCTION};
use purecheck::model::build::{call, lit, param, ret, string};
use purecheck::model::{FunctionId, FunctionSymbol, Location, Program};
use purecheck::purity::{
    AnalysisLimits, AnalysisSession, Cancelled, CancellationToken, KnownSignatures, Markers,
};
use purecheck::Verdict;

/// Ten helpers that each call the shared `leaf`, plus one noisy helper
fn fan_in() -> (Program, Vec<FunctionId>, FunctionId) {
    let mut fx = Fixture::new();
    let abs = fx.external(MATH_ABS);
    let write = fx.external(CONSOLE_WRITE_LINE);
    let leaf = fx.declare("Lib.Leaf");
    let x = fx.param(leaf, "x");
    fx.body(leaf, vec![ret(call(abs, vec![param(x)]))]);

    let mut callers: Vec<FunctionId> = (0..10)
        .map(|i| fx.function(&format!("Lib.Caller{}", i), vec![ret(call(leaf, vec![lit(i)]))]))
        .collect();
    callers.push(fx.function(
        "Lib.Noisy",
        vec![call(leaf, vec![lit(0)]), call(write, vec![string("!")]).at(3, 5)],
    ));
    (fx.build(), callers, leaf)
}

#[test]
fn shared_callee_is_analyzed_once() {
    let (program, callers, leaf) = fan_in();
    let session = AnalysisSession::new().with_limits(AnalysisLimits {
        parallel: false,
        ..AnalysisLimits::default()
    });

    for &caller in &callers {
        session.resolve(&program, caller).unwrap();
    }

    let stats = session.stats();
    // Leaf plus every caller
    assert_eq!(stats.structural_analyses, callers.len() + 1);
    assert_eq!(stats.cache_hits, callers.len() - 1);
    assert!(session.cache().contains(leaf));
}

#[test]
fn repeated_resolution_hits_the_cache() {
    let (program, callers, _) = fan_in();
    let session = AnalysisSession::new();

    let first = session.resolve(&program, callers[0]);
    let before = session.stats();
    let second = session.resolve(&program, callers[0]);
    let after = session.stats();

    assert_eq!(first, second);
    assert_eq!(after.structural_analyses, before.structural_analyses);
    assert_eq!(after.cache_hits, before.cache_hits + 1);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let (program, callers, _) = fan_in();
    let sequential = AnalysisSession::new().with_limits(AnalysisLimits {
        parallel: false,
        ..AnalysisLimits::default()
    });
    let parallel = AnalysisSession::new();

    let expected = sequential.analyze_all(&program, &callers);
    let actual = parallel.analyze_all(&program, &callers);

    assert_eq!(actual, expected);
    let noisy = callers[callers.len() - 1];
    assert_eq!(
        actual.last(),
        Some(&(noisy, Ok(Verdict::impure_at(Location::new(3, 5)))))
    );
}

#[test]
fn cancelled_session_caches_nothing() {
    let (program, callers, _) = fan_in();
    let token = CancellationToken::new();
    let session = AnalysisSession::new().with_cancellation(token.clone());
    token.cancel();

    assert_eq!(session.resolve(&program, callers[0]), Err(Cancelled));
    let results = session.analyze_all(&program, &callers);
    assert!(results.iter().all(|(_, result)| result == &Err(Cancelled)));
    assert_eq!(session.cache().len(), 0);
}

#[test]
fn custom_signatures_replace_defaults() {
    let mut fx = Fixture::new();
    let telemetry = fx.external("Acme.Telemetry.Track");
    let format = fx.external("Acme.Text.Format");
    let track = fx.function("App.Track", vec![call(telemetry, Vec::new()).at(2, 5)]);
    let render = fx.function("App.Render", vec![ret(call(format, Vec::new()))]);
    let program = fx.build();

    let mut signatures = KnownSignatures::empty();
    signatures.extend_pure(["Acme.Text.Format"]);
    signatures.extend_impure_namespaces(["Acme.Telemetry."]);
    let session = AnalysisSession::new().with_signatures(signatures);

    assert_eq!(
        session.resolve(&program, track),
        Ok(Verdict::impure_at(Location::new(2, 5)))
    );
    assert_eq!(session.resolve(&program, render), Ok(Verdict::PURE));
    assert_eq!(session.stats().signature_hits, 2);
}

#[test]
fn enforced_functions_follow_configured_marker() {
    let mut fx = Fixture::new();
    let write = fx.external(CONSOLE_WRITE_LINE);
    let clean = fx.symbol(FunctionSymbol::new("Clean", "App.Clean").with_marker("Pure"));
    fx.body(clean, vec![ret(lit(1))]);
    let dirty = fx.symbol(
        FunctionSymbol::new("Dirty", "App.Dirty")
            .with_marker("Pure")
            .at(Location::new(10, 5)),
    );
    fx.body(dirty, vec![call(write, vec![string("x")]).at(11, 9)]);
    let unmarked = fx.symbol(FunctionSymbol::new("Loud", "App.Loud").with_marker("EnforcePure"));
    fx.body(unmarked, vec![call(write, vec![string("y")])]);
    let program = fx.build();

    let session = AnalysisSession::new().with_markers(Markers {
        enforce_pure: "Pure".to_string(),
        ..Markers::default()
    });
    let diagnostics = check_enforced(&session, &program).unwrap();

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, IMPURE_FUNCTION);
    assert_eq!(diagnostic.function, "App.Dirty");
    assert_eq!(diagnostic.location, Some(Location::new(11, 9)));
}

mod common;

use common::{verdict_of, Fixture, CONSOLE_WRITE_LINE};
use pretty_assertions::assert_eq;
use purecheck::model::build::{add, binary, call, conditional, lit, param, ret, string};
use purecheck::model::{BinaryOperator, FunctionId, Location, Program};
use purecheck::purity::{AnalysisLimits, AnalysisSession};
use purecheck::Verdict;

fn fibonacci() -> (Program, FunctionId) {
    let mut fx = Fixture::new();
    let fib = fx.declare("Math.Fib");
    let n = fx.param(fib, "n");
    fx.body(
        fib,
        vec![
            conditional(
                binary(BinaryOperator::LessThan, param(n), lit(2)),
                ret(param(n)),
                None,
            ),
            ret(add(
                call(fib, vec![binary(BinaryOperator::Subtract, param(n), lit(1))]),
                call(fib, vec![binary(BinaryOperator::Subtract, param(n), lit(2))]),
            )),
        ],
    );
    (fx.build(), fib)
}

/// `first` calls `second`, which calls back into `first`
fn mutual_pair(second_is_noisy: bool) -> (Program, FunctionId, FunctionId) {
    let mut fx = Fixture::new();
    let write = fx.external(CONSOLE_WRITE_LINE);
    let first = fx.declare("Parity.IsEven");
    let second = fx.declare("Parity.IsOdd");
    let a = fx.param(first, "n");
    let b = fx.param(second, "n");
    fx.body(first, vec![ret(call(second, vec![param(a)])).at(2, 5)]);

    let mut body = Vec::new();
    if second_is_noisy {
        body.push(call(write, vec![string("odd?")]).at(6, 5));
    }
    body.push(ret(call(first, vec![param(b)])).at(7, 5));
    fx.body(second, body);

    (fx.build(), first, second)
}

#[test]
fn self_recursive_pure_function_is_pure() {
    let (program, fib) = fibonacci();
    assert_eq!(verdict_of(&program, fib), Verdict::PURE);
}

#[test]
fn recursion_is_detected_once_per_cycle_entry() {
    let (program, fib) = fibonacci();
    let session = AnalysisSession::new();

    assert_eq!(session.resolve(&program, fib), Ok(Verdict::PURE));
    let stats = session.stats();
    assert_eq!(stats.structural_analyses, 1);
    assert_eq!(stats.cycles_detected, 2);
    assert!(session.cache().contains(fib));
}

#[test]
fn mutual_recursion_of_pure_functions_is_pure() {
    let (program, first, second) = mutual_pair(false);
    assert_eq!(verdict_of(&program, first), Verdict::PURE);
    assert_eq!(verdict_of(&program, second), Verdict::PURE);
}

#[test]
fn impure_member_makes_whole_cycle_impure() {
    let (program, first, second) = mutual_pair(true);

    // Reported at the call into the impure member
    assert_eq!(verdict_of(&program, first), Verdict::impure_at(Location::new(2, 5)));
    assert_eq!(verdict_of(&program, second), Verdict::impure_at(Location::new(6, 5)));
}

#[test]
fn provisional_verdict_inside_open_cycle_is_not_cached() {
    let (program, first, second) = mutual_pair(false);
    let session = AnalysisSession::new();

    assert_eq!(session.resolve(&program, first), Ok(Verdict::PURE));
    assert!(session.cache().contains(first));
    assert!(!session.cache().contains(second));

    // Resolving the inner member directly yields the same answer
    assert_eq!(session.resolve(&program, second), Ok(Verdict::PURE));
    assert!(session.cache().contains(second));
}

#[test]
fn impure_verdicts_inside_cycles_are_cached() {
    let (program, first, second) = mutual_pair(true);
    let session = AnalysisSession::new();

    assert!(session.resolve(&program, first).unwrap().is_impure());
    assert!(session.cache().contains(first));
    assert!(session.cache().contains(second));
}

fn call_chain(length: usize) -> (Program, Vec<FunctionId>) {
    let mut fx = Fixture::new();
    let ids: Vec<FunctionId> = (0..length)
        .map(|i| fx.declare(&format!("Chain.Step{}", i)))
        .collect();
    for pair in ids.windows(2) {
        fx.body(pair[0], vec![ret(call(pair[1], Vec::new())).at(1, 1)]);
    }
    if let Some(&last) = ids.last() {
        fx.body(last, vec![ret(lit(0))]);
    }
    (fx.build(), ids)
}

#[test]
fn call_chain_within_depth_limit_is_pure() {
    let (program, ids) = call_chain(32);
    assert_eq!(verdict_of(&program, ids[0]), Verdict::PURE);
}

#[test]
fn exceeding_depth_limit_is_impure() {
    let (program, ids) = call_chain(8);
    let session = AnalysisSession::new().with_limits(AnalysisLimits {
        max_call_depth: 3,
        parallel: false,
    });

    let verdict = session.resolve(&program, ids[0]).unwrap();
    assert_eq!(verdict, Verdict::impure_at(Location::new(1, 1)));

    // The tail of the chain is still pure on its own
    assert_eq!(session.resolve(&program, ids[6]), Ok(Verdict::PURE));
}

#[test]
fn depth_limited_verdicts_do_not_depend_on_entry_order() {
    let (program, ids) = call_chain(3);
    let limits = AnalysisLimits {
        max_call_depth: 2,
        parallel: false,
    };

    let session = AnalysisSession::new().with_limits(limits);
    assert!(session.resolve(&program, ids[0]).unwrap().is_impure());
    // Nothing on the truncated path is cached
    assert!(!session.cache().contains(ids[0]));
    assert!(!session.cache().contains(ids[1]));

    let after_entry = session.resolve(&program, ids[1]);
    let alone = AnalysisSession::new()
        .with_limits(limits)
        .resolve(&program, ids[1]);
    assert_eq!(after_entry, Ok(Verdict::PURE));
    assert_eq!(after_entry, alone);
}

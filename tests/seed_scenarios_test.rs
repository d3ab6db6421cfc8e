//! The reference scenarios every build of the analyzer must agree on

mod common;

use common::{field_of_type, verdict_of, Fixture, CONSOLE_WRITE_LINE, MATH_ABS};
use pretty_assertions::assert_eq;
use purecheck::model::build::{
    add, assign, call, declare, field, func_ref, invoke, lit, local, lock, param, ret, string, this,
};
use purecheck::model::{FieldSymbol, FunctionSymbol, Location, TypeMutability};
use purecheck::Verdict;

#[test]
fn sum_of_value_parameters_is_pure() {
    let mut fx = Fixture::new();
    let sum = fx.declare("Calc.Add");
    let x = fx.param(sum, "x");
    let y = fx.param(sum, "y");
    fx.body(sum, vec![ret(add(param(x), param(y))).at(3, 9)]);
    let program = fx.build();

    assert_eq!(verdict_of(&program, sum), Verdict::PURE);
}

#[test]
fn console_output_is_impure_at_the_call() {
    let mut fx = Fixture::new();
    let write = fx.external(CONSOLE_WRITE_LINE);
    let log = fx.function("App.Log", vec![call(write, vec![string("hi")]).at(5, 9)]);
    let program = fx.build();

    assert_eq!(verdict_of(&program, log), Verdict::impure_at(Location::new(5, 9)));
}

#[test]
fn lock_without_marker_is_impure_at_the_lock() {
    let mut fx = Fixture::new();
    let guarded = fx.function("App.Guarded", vec![lock(this(), ret(lit(1))).at(7, 9)]);
    let program = fx.build();

    assert_eq!(
        verdict_of(&program, guarded),
        Verdict::impure_at(Location::new(7, 9))
    );
}

#[test]
fn lock_with_synchronization_marker_checks_body() {
    let mut fx = Fixture::new();
    let guarded = fx.symbol(FunctionSymbol::new("Guarded", "App.Guarded").with_marker("AllowSynchronization"));
    fx.body(guarded, vec![lock(this(), ret(lit(1))).at(7, 9)]);
    let program = fx.build();

    assert_eq!(verdict_of(&program, guarded), Verdict::PURE);
}

#[test]
fn static_mutable_field_assignment_is_impure_at_the_assignment() {
    let mut fx = Fixture::new();
    let counter_type = fx.ty("App.Counter", TypeMutability::Mutable);
    let count = fx.field(FieldSymbol {
        is_static: true,
        ..field_of_type(counter_type, "count")
    });
    let bump = fx.function("App.Bump", vec![assign(field(count), lit(1)).at(9, 13)]);
    let program = fx.build();

    assert_eq!(verdict_of(&program, bump), Verdict::impure_at(Location::new(9, 13)));
}

#[test]
fn sole_call_to_pure_function_is_pure() {
    let mut fx = Fixture::new();
    let abs = fx.external(MATH_ABS);
    let helper = fx.declare("App.Helper");
    let h = fx.param(helper, "h");
    fx.body(helper, vec![ret(call(abs, vec![param(h)]))]);

    let caller = fx.declare("App.Caller");
    let c = fx.param(caller, "c");
    fx.body(caller, vec![ret(call(helper, vec![param(c)]))]);
    let program = fx.build();

    assert_eq!(verdict_of(&program, caller), Verdict::PURE);
}

#[test]
fn delegate_bound_to_impure_function_is_impure() {
    let mut fx = Fixture::new();
    let write = fx.external(CONSOLE_WRITE_LINE);
    let run = fx.declare("App.Run");
    let action = fx.local(run, "action");
    fx.body(
        run,
        vec![
            declare(action, func_ref(write)).at(2, 9),
            invoke(local(action), vec![string("hi")]).at(3, 9),
        ],
    );
    let program = fx.build();

    assert_eq!(verdict_of(&program, run), Verdict::impure_at(Location::new(3, 9)));
}

#[test]
fn delegate_bound_to_pure_function_is_pure() {
    let mut fx = Fixture::new();
    let abs = fx.external(MATH_ABS);
    let run = fx.declare("App.Run");
    let f = fx.local(run, "f");
    fx.body(
        run,
        vec![
            declare(f, func_ref(abs)),
            ret(invoke(local(f), vec![lit(-3)])),
        ],
    );
    let program = fx.build();

    assert_eq!(verdict_of(&program, run), Verdict::PURE);
}

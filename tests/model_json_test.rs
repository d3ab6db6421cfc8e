mod common;

use common::LEDGER_MODEL;
use indoc::indoc;
use pretty_assertions::assert_eq;
use purecheck::diagnostics::{check_enforced, enforced_functions};
use purecheck::model::{Location, OperationKind, SemanticModel};
use purecheck::{AnalysisSession, Error, Program};
use std::path::PathBuf;

#[test]
fn ledger_model_loads_and_validates() {
    let program = Program::from_json(LEDGER_MODEL).unwrap();
    program.validate().unwrap();

    let total = program.find_function("Ledger.Total").unwrap();
    assert_eq!(program.find_function("Audit"), program.find_function("Ledger.Audit"));
    let body = program.body(total).unwrap();
    assert_eq!(body[0].kind(), OperationKind::Return);
    assert_eq!(program.function(total).unwrap().parameters.len(), 2);
}

#[test]
fn enforced_functions_in_ledger_are_reported() {
    let program = Program::from_json(LEDGER_MODEL).unwrap();
    let session = AnalysisSession::new();

    let marked: Vec<String> = enforced_functions(&session, &program)
        .into_iter()
        .map(|id| program.function(id).unwrap().qualified_name.clone())
        .collect();
    assert_eq!(
        marked,
        ["Ledger.Total", "Ledger.Audit", "Ledger.Sync", "Ledger.SyncAllowed"]
    );

    let diagnostics = check_enforced(&session, &program).unwrap();
    let found: Vec<(&str, Option<Location>)> = diagnostics
        .iter()
        .map(|d| (d.function.as_str(), d.location))
        .collect();
    assert_eq!(
        found,
        [
            ("Ledger.Audit", Some(Location::new(12, 9))),
            ("Ledger.Sync", Some(Location::new(20, 9))),
        ]
    );
    assert_eq!(diagnostics[0].file, Some(PathBuf::from("Ledger.cs")));
    assert_eq!(diagnostics[0].message, "'Ledger.Audit' is not pure");
}

#[test]
fn dangling_reference_fails_validation() {
    let json = indoc! {r#"
        {
          "functions": [
            {
              "name": "Broken",
              "qualified_name": "Demo.Broken",
              "body": [{"kind": "invocation", "target": 7}]
            }
          ]
        }
    "#};
    let program = Program::from_json(json).unwrap();

    match program.validate() {
        Err(Error::InvalidModel(message)) => assert!(message.contains("unknown function"), "{}", message),
        other => panic!("expected an invalid-model error, got {:?}", other),
    }
}

#[test]
fn unknown_operation_kind_is_rejected() {
    let json = indoc! {r#"
        {
          "functions": [
            {
              "name": "Odd",
              "qualified_name": "Demo.Odd",
              "body": [{"kind": "teleport"}]
            }
          ]
        }
    "#};
    assert!(Program::from_json(json).is_err());
}

#[test]
fn unclassified_operation_round_trips_as_unknown() {
    let json = indoc! {r#"
        {
          "functions": [
            {
              "name": "Query",
              "qualified_name": "Demo.Query",
              "markers": ["EnforcePure"],
              "body": [
                {"kind": "unknown", "description": "query expression", "location": {"line": 2, "column": 3}}
              ]
            }
          ]
        }
    "#};
    let program = Program::from_json(json).unwrap();
    let diagnostics = check_enforced(&AnalysisSession::new(), &program).unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].location, Some(Location::new(2, 3)));
}

#[test]
fn missing_model_file_is_a_file_system_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Program::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::FileSystem { .. }), "{:?}", err);
}

use std::fs;

use lacewing::frontend::{
	error::{ErrorKind, ExpectedFormer},
	module::{Error, Module},
};

use crate::common::{elaboration_error, programs};

#[test]
fn run_fail_tests() {
	for path in programs("tests/fail/programs") {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(path).expect(&path_str);
		match Module::new().execute(&source) {
			Err(Error::Elaboration(error)) => assert!(!error.is_internal(), "{path_str}: {error:?}"),
			other => panic!("{path_str}: expected an elaboration error, got {other:?}"),
		}
	}
}

#[test]
fn malformed_source_is_a_parse_error() {
	assert!(matches!(Module::new().execute("let = \"a\""), Err(Error::Parse(_))));
}

#[test]
fn failed_statement_leaves_module_unchanged() {
	let mut module = Module::new();
	module.execute("let a = \"x\"").unwrap();
	assert!(module.execute("let b: Type = \"y\"").is_err());
	assert!(module.lookup_value("a").is_some());
	assert!(module.lookup_value("b").is_none());
	assert_eq!(module.execute("compute a").unwrap(), ["\"x\": String"]);
}

#[test]
fn class_application_rejects_extra_arguments() {
	let source = "let Point = class { x: String }\nlet P = Point(\"a\", \"b\")";
	let error = elaboration_error(source);
	assert!(matches!(error.kind, ErrorKind::ExtraArgument { .. }));
	assert_eq!(error.range.map(|(start, end)| &source[start..end]), Some("\"b\""));
}

#[test]
fn new_requires_every_unfulfilled_property() {
	let error = elaboration_error("let Point = class { x: String, y: String }\nlet p = new Point(\"a\")");
	assert!(matches!(error.kind, ErrorKind::MissingProperty(_)));
	let error = elaboration_error("let p = new String(\"a\")");
	assert!(matches!(error.kind, ErrorKind::ExpectedFormer { expected: ExpectedFormer::Clazz, .. }));
}

#[test]
fn sequence_checks_are_enforced() {
	let error = elaboration_error("compute { let a = \"x\" check a: Type return a }");
	assert!(matches!(error.kind, ErrorKind::TypeMismatch { .. }));
	let error = elaboration_error("let f = (x: String): Type => x");
	assert!(matches!(error.kind, ErrorKind::TypeMismatch { .. }));
}

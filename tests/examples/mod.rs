use std::fs;

use lacewing::frontend::module::Module;

use crate::common::{outputs, programs};

/// Ensures all example programs are accepted by the elaborator.
#[test]
fn run_examples() {
	for path in programs("tests/examples/programs") {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(path).expect(&path_str);
		let mut module = Module::new();
		let result = module.execute(&source);
		assert!(result.is_ok(), "{path_str}: {result:?}");
	}
}

#[test]
fn identity_instantiates_implicit_argument() {
	let source = fs::read_to_string("tests/examples/programs/identity.lw").unwrap();
	assert_eq!(outputs(&source), [
		"\"lacewing\": String",
		"\"lacewing\": String",
		"\"a\": String"
	]);
}

#[test]
fn classes_project_properties() {
	let source = fs::read_to_string("tests/examples/programs/classes.lw").unwrap();
	assert_eq!(outputs(&source), [
		"\"0\": String",
		"\"point\": String",
		"\"0\": String",
		"\"1\": String",
		"\"0\": String"
	]);
}

#[test]
fn solve_reports_every_pattern_variable() {
	let source = fs::read_to_string("tests/examples/programs/solve.lw").unwrap();
	assert_eq!(outputs(&source), [
		"m = \"a\"",
		"f = (x: String) => x",
		"A = String\na = \"hello\""
	]);
}

#[test]
fn classes_are_applied_and_constructed() {
	let source = fs::read_to_string("tests/examples/programs/construction.lw").unwrap();
	assert_eq!(outputs(&source), [
		"class { x: String = \"0\", y: String }: Type",
		"\"0\": String",
		"\"3\": String",
		"\"0\": String",
		"\"5\": String"
	]);
}

use std::rc::Rc;

use lacewing::{
	frontend::{
		conversion::conversion,
		error::ErrorKind,
		evaluate::Evaluate as _,
		module::{Error, Module},
		unevaluate::readback,
	},
	ir::{semantics::Value, syntax::alpha_equivalent},
	report::format_elaboration_error,
};

use crate::common::{elaboration_error, evaluate_type, name, outputs};

#[test]
fn beta_reduces_applications() {
	assert_eq!(outputs("compute ((x: String) => x)(\"a\")"), ["\"a\": String"]);
	assert_eq!(outputs("compute car(the(exists (String) String, cons(\"l\", \"r\")))"), ["\"l\": String"]);
}

#[test]
fn reads_back_functions_with_their_domains() {
	assert_eq!(outputs("let f: String -> String = (x) => x\ncompute f"), ["(x: String) => x: String -> String"]);
	assert_eq!(
		outputs("let k: (A: Type, a: A) -> Type = (A, a) => A\ncompute k"),
		["(A: Type) => (a: A) => A: (A: Type) -> A -> Type"]
	);
}

#[test]
fn reads_back_dependent_classes() {
	assert_eq!(outputs("compute class { A: Type, a: A }"), ["class { A: Type, a: A }: Type"]);
}

#[test]
fn class_application_substitutes_into_later_properties() {
	assert_eq!(outputs("compute class { A: Type, a: A }(String)"), [
		"class { A: Type = String, a: String }: Type"
	]);
	assert_eq!(outputs("let Pair = class { A: Type, a: A }(String)\ncompute new Pair(\"x\").a"), ["\"x\": String"]);
}

#[test]
fn sequences_evaluate_their_definitions() {
	assert_eq!(outputs("compute { let A = String let a: A = \"x\" return a }"), ["\"x\": String"]);
	assert_eq!(outputs("let f = (x: String): String => x\ncompute f"), ["(x: String) => x: String -> String"]);
}

#[test]
fn unknown_property_names_the_class() {
	let source = "let o: class { x: String } = { x: \"a\" }\ncompute o.y";
	let mut module = Module::new();
	let Err(Error::Elaboration(error)) = module.execute(source) else { panic!("{source}") };
	let report = format_elaboration_error(source, &module.interner, &error);
	assert!(report.contains("`class { x: String }` has no property `y`"), "{report}");
}

#[test]
fn readback_is_stable_under_evaluation() {
	let mut module = Module::new();
	module.execute("let Point = class { x: String, y: String = \"a\" }").unwrap();
	let ty = evaluate_type(&mut module, "(p: Point) -> Equal(String, p.x, p.y)");
	let core = readback(&module.solution, &module.context, &ty);
	let value = core.evaluate_in(&module.solution.environment(&module.context));
	let again = readback(&module.solution, &module.context, &value);
	assert!(alpha_equivalent(&core, &again));
	assert_eq!(module.print(&core), "(p: class { x: String, y: String = \"a\" }) -> Equal(String, p.x, \"a\")");
}

#[test]
fn conversion_is_reflexive_and_symmetric() {
	let mut module = Module::new();
	module.execute("let a = \"a\"\nlet f: String -> String = (x) => x").unwrap();
	let string = evaluate_type(&mut module, "String");
	let a = module.lookup_value("a").unwrap();
	conversion(&module.solution, &module.context, &string, &a, &a).unwrap();

	let function_type = evaluate_type(&mut module, "String -> String");
	let f = module.lookup_value("f").unwrap();
	let g = module.lookup_value("f").unwrap();
	conversion(&module.solution, &module.context, &function_type, &f, &g).unwrap();

	let (x, y) = (name(&mut module, "x"), name(&mut module, "y"));
	let context = module.context.bind(x, x, string.clone()).bind(y, y, string.clone());
	let x_value: Rc<Value> = Value::variable(string.clone(), x).into();
	let y_value: Rc<Value> = Value::variable(string.clone(), y).into();
	conversion(&module.solution, &context, &string, &x_value, &x_value).unwrap();
	for (left, right) in [(&x_value, &y_value), (&y_value, &x_value)] {
		assert!(matches!(
			conversion(&module.solution, &context, &string, left, right).unwrap_err().kind,
			ErrorKind::VariableMismatch { .. }
		));
	}

	module.execute("let b = \"b\"").unwrap();
	let b = module.lookup_value("b").unwrap();
	assert!(matches!(
		conversion(&module.solution, &module.context, &string, &a, &b).unwrap_err().kind,
		ErrorKind::LiteralMismatch { .. }
	));
	assert!(matches!(
		conversion(&module.solution, &module.context, &string, &b, &a).unwrap_err().kind,
		ErrorKind::LiteralMismatch { .. }
	));
}

#[test]
fn conversion_compares_neutral_spines() {
	outputs("let k: (f: String -> String, x: String) -> Equal(String, f(x), f(x)) = (f, x) => same(f(x))");
	outputs(
		"let Pair = exists (String) String\nlet h: (p: Pair) -> Equal(String, car(p), car(p)) = (p) => same(car(p))",
	);

	let error = elaboration_error(
		"let k: (f: String -> String, x: String, y: String) -> Equal(String, f(x), f(y)) = (f, x, y) => same(f(x))",
	);
	assert!(matches!(error.kind, ErrorKind::VariableMismatch { .. }));
	let error = elaboration_error(
		"let Pair = exists (String) String\nlet h: (p: Pair) -> Equal(String, car(p), cdr(p)) = (p) => same(car(p))",
	);
	assert!(matches!(error.kind, ErrorKind::ConversionNotImplemented { .. }));
}

#[test]
fn errors_point_at_the_innermost_expression() {
	let source = "compute x";
	let mut module = Module::new();
	let Err(Error::Elaboration(error)) = module.execute(source) else { panic!("{source}") };
	assert_eq!(error.range, Some((8, 9)));
	let report = format_elaboration_error(source, &module.interner, &error);
	assert!(report.contains("`x` is not in scope"));
	assert!(report.contains("compute x"));
	assert!(report.lines().last().is_some_and(|line| line.ends_with("        ^")));
}

#[test]
fn tabs_are_rendered_as_three_spaces() {
	let source = "compute\tx";
	let mut module = Module::new();
	let Err(Error::Elaboration(error)) = module.execute(source) else { panic!("{source}") };
	let report = format_elaboration_error(source, &module.interner, &error);
	assert!(report.contains("| compute   x"));
	assert!(report.lines().last().is_some_and(|line| line.ends_with(&format!("| {}^", " ".repeat(10)))));
}

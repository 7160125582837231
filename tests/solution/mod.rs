use lacewing::{
	frontend::{
		error::{ErrorKind, Frame},
		module::Module,
		solution::{PatternVar, Solution},
	},
	ir::syntax::Core,
};

use crate::common::{elaboration_error, evaluate_type, name, outputs};

#[test]
fn solves_miller_patterns() {
	assert_eq!(
		outputs("solve (f: String -> String) { (x: String) => f(x) = (x: String) => x : String -> String }"),
		["f = (x: String) => x"]
	);
	let source = "solve (k: (a: String, b: String) -> String) {
		(a: String, b: String) => k(a, b) = (a: String, b: String) => b : (a: String, b: String) -> String
	}";
	assert_eq!(outputs(source), ["k = (a: String) => (b: String) => b"]);
}

#[test]
fn solves_through_implicit_applications() {
	assert_eq!(
		outputs("let id: (implicit A: Type, a: A) -> A = (implicit A, a) => a\nsolve (s: String) { s = id(\"x\") : String }"),
		["s = \"x\""]
	);
}

#[test]
fn solutions_may_mention_earlier_pattern_variables() {
	assert_eq!(outputs("solve (A: Type, a: A) { a = \"hello\" : A }"), ["A = String\na = \"hello\""]);
}

#[test]
fn rejects_non_pattern_spines() {
	let error = elaboration_error("solve (m: String -> String) { m(\"a\") = \"a\" : String }");
	assert!(matches!(error.kind, ErrorKind::NonPatternSpine(_)));
	assert!(matches!(error.trace.as_slice(), [.., Frame::Equation(0)]));
}

#[test]
fn rejects_solutions_that_escape_their_scope() {
	let error = elaboration_error("solve (m: String) { (x: String) => m = (x: String) => x : String -> String }");
	assert!(matches!(error.kind, ErrorKind::ScopeEscape { .. }));
}

#[test]
fn rejects_solutions_mentioning_variables_outside_the_spine() {
	let error = elaboration_error(
		"solve (m: String -> String) {
			(x: String, y: String) => m(x) = (x: String, y: String) => y : (x: String, y: String) -> String
		}",
	);
	assert!(matches!(error.kind, ErrorKind::ScopeEscape { .. }));
}

#[test]
fn rejects_cyclic_solutions() {
	let error = elaboration_error(
		"solve (m: String -> String) { (x: String) => m(x) = (x: String) => m(m(x)) : String -> String }",
	);
	assert!(matches!(error.kind, ErrorKind::OccursCheck(_)));
}

#[test]
fn reports_unsolved_pattern_variables() {
	let error = elaboration_error("solve (m: String, n: String) { m = \"a\" }");
	assert!(matches!(error.kind, ErrorKind::UnresolvedPatternVariable(_)));
}

#[test]
fn solving_leaves_cloned_solutions_untouched() {
	let mut module = Module::new();
	module.execute("let a = \"a\"").unwrap();
	let a = module.lookup_value("a").unwrap();
	let string = evaluate_type(&mut module, "String");
	let m = name(&mut module, "m");
	let pattern_var = module.solution.create_pattern_var(m, string.clone(), module.context.names());
	let before: Solution = module.solution.clone();
	module.solution.solve(&module.context, &string, &pattern_var, &a).unwrap();
	assert!(matches!(before.lookup(m), Some(PatternVar::Unsolved { .. })));
	assert!(matches!(module.solution.lookup(m), Some(PatternVar::Solved { .. })));
	assert!(module.solution.unsolved_names(&Core::Var(m)).is_empty());
	assert_eq!(before.unsolved_names(&Core::Var(m)), [m]);
}

use lacewing::{
	frontend::{
		error::{ErrorKind, Frame},
		inclusion::{inclusion, is_ordered},
		module::{Error, Module},
		solution::PatternVar,
	},
	ir::semantics::Value,
};

use crate::common::{elaboration_error, evaluate_type, name};

#[test]
fn inclusion_is_reflexive() {
	let mut module = Module::new();
	for source in [
		"String",
		"Type",
		"(x: String) -> String",
		"(implicit A: Type, a: A) -> A",
		"exists (A: Type) A",
		"Equal(String, \"a\", \"a\")",
		"class { x: String, y: String = \"a\" }",
		"class { A: Type, a: A, b: String }",
	] {
		let ty = evaluate_type(&mut module, source);
		inclusion(&mut module.solution, &module.context, &ty, &ty).expect(source);
	}
}

#[test]
fn functions_are_contravariant_in_their_domain() {
	let mut module = Module::new();
	let narrow = evaluate_type(&mut module, "(o: class { x: String }) -> String");
	let wide = evaluate_type(&mut module, "(o: class { x: String, y: String }) -> String");
	inclusion(&mut module.solution, &module.context, &narrow, &wide).unwrap();

	let error = inclusion(&mut module.solution, &module.context, &wide, &narrow).unwrap_err();
	let y = name(&mut module, "y");
	assert!(matches!(&error.kind, ErrorKind::MissingProperties(names) if names == &[y]));
}

#[test]
fn pairs_are_covariant() {
	let mut module = Module::new();
	let sub = evaluate_type(&mut module, "exists (class { x: String, y: String }) String");
	let ty = evaluate_type(&mut module, "exists (class { x: String }) String");
	inclusion(&mut module.solution, &module.context, &sub, &ty).unwrap();
	assert!(inclusion(&mut module.solution, &module.context, &ty, &sub).is_err());
}

#[test]
fn order_is_judged_by_shared_properties() {
	let mut module = Module::new();
	let clazz = |module: &mut Module, source: &str| match evaluate_type(module, source).as_ref() {
		Value::Clazz(clazz) => clazz.clone(),
		_ => panic!("{source} is not a class"),
	};
	let xyz = clazz(&mut module, "class { x: String, y: String, z: String }");
	let xz = clazz(&mut module, "class { x: String, z: String }");
	let zx = clazz(&mut module, "class { z: String, x: String }");
	let w = clazz(&mut module, "class { w: String }");
	assert!(is_ordered(&xyz, &xz));
	assert!(!is_ordered(&xyz, &zx));
	assert!(is_ordered(&xyz, &w));
}

#[test]
fn fulfilled_property_witnesses_unfulfilled_one() {
	let mut module = Module::new();
	let sub = evaluate_type(&mut module, "class { y: String = \"b\", x: String = \"a\" }");
	let ty = evaluate_type(&mut module, "class { x: String, y: String }");
	inclusion(&mut module.solution, &module.context, &sub, &ty).unwrap();

	let x = name(&mut module, "x");
	match module.solution.lookup(x) {
		Some(PatternVar::Solved { value, .. }) =>
			assert!(matches!(value.as_ref(), Value::Quote(literal) if &**literal == "a")),
		other => panic!("expected x to be solved, got {other:?}"),
	}
}

#[test]
fn fulfilled_property_witnesses_unfulfilled_one_in_the_same_order() {
	let mut module = Module::new();
	let sub = evaluate_type(&mut module, "class { y: String = \"b\" }");
	let ty = evaluate_type(&mut module, "class { y: String }");
	inclusion(&mut module.solution, &module.context, &sub, &ty).unwrap();

	let y = name(&mut module, "y");
	match module.solution.lookup(y) {
		Some(PatternVar::Solved { value, .. }) =>
			assert!(matches!(value.as_ref(), Value::Quote(literal) if &**literal == "b")),
		other => panic!("expected y to be solved, got {other:?}"),
	}
}

#[test]
fn fulfilled_property_cannot_be_unfixed() {
	let mut module = Module::new();
	let source = "let o: class { x: String } = { x: \"a\" }\ncheck o : class { x: String = \"a\" }";
	let Err(Error::Elaboration(error)) = module.execute(source) else { panic!("{source}") };
	let ErrorKind::UnfixedProperty(property) = error.kind else { panic!("{error:?}") };
	assert_eq!(property, name(&mut module, "x"));
	assert!(matches!(error.trace.first(), Some(Frame::Inclusion { .. })));
}

#[test]
fn trace_lists_innermost_frame_first() {
	let error = elaboration_error("let o: class { x: String } = { x: \"a\" }\ncheck o : class { x: Type }");
	assert!(matches!(error.kind, ErrorKind::TypeMismatch { .. }));
	assert!(matches!(error.trace.as_slice(), [
		Frame::Inclusion { .. },
		Frame::Property(_),
		Frame::Inclusion { .. }
	]));
}

#[test]
fn unordered_inclusion_names_missing_property() {
	let error = elaboration_error(
		"let o: class { y: String, x: String } = { y: \"a\", x: \"b\" }\ncheck o : class { x: String, y: String, z: String }",
	);
	assert!(matches!(error.kind, ErrorKind::MissingProperty(_)));
}

use std::{
	ffi::OsStr,
	fs,
	path::{Path, PathBuf},
	rc::Rc,
};

use lacewing::{
	common::Name,
	frontend::{
		elaborate::check_type,
		error::ElaborationError,
		evaluate::Evaluate as _,
		module::{Error, Module},
		parse::parse_expression,
	},
	ir::semantics::Value,
	report::report_error,
};

pub const EXTENSION: &str = "lw";

pub fn programs(directory: impl AsRef<Path>) -> Vec<PathBuf> {
	let mut paths: Vec<_> = fs::read_dir(directory)
		.unwrap()
		.flatten()
		.map(|x| x.path())
		.filter(|x| x.extension() == Some(OsStr::new(EXTENSION)))
		.collect();
	paths.sort();
	paths
}

/// Runs `source` in a fresh module, reporting and panicking on failure.
pub fn outputs(source: &str) -> Vec<String> {
	let mut module = Module::new();
	match module.execute(source) {
		Ok(outputs) => outputs,
		Err(error) => {
			report_error(source, &module.interner, &error);
			panic!("{source}");
		}
	}
}

/// Runs `source` in a fresh module, expecting an elaboration error.
pub fn elaboration_error(source: &str) -> ElaborationError {
	match Module::new().execute(source) {
		Err(Error::Elaboration(error)) => error,
		other => panic!("expected an elaboration error from {source}, got {other:?}"),
	}
}

/// Elaborates and evaluates a type in the scope of `module`.
pub fn evaluate_type(module: &mut Module, source: &str) -> Rc<Value> {
	let expr = parse_expression(source, &mut module.interner).expect(source);
	let core = check_type(&mut module.solution, &module.context, &expr).expect(source);
	core.evaluate_in(&module.solution.environment(&module.context))
}

pub fn name(module: &mut Module, label: &str) -> Name { Name::new(module.interner.get_or_intern(label)) }

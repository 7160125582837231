use std::rc::Rc;

use lasso::Rodeo;
use peg::{error::ParseError, str::LineCol};

use crate::{
	common::Name,
	frontend::{
		context::Context,
		elaborate::{check, check_type, infer},
		equation::solve_equation,
		error::{ElaborationError, ErrorKind, Frame},
		evaluate::Evaluate as _,
		parse::parse_stmts,
		solution::Solution,
		unevaluate::{readback, readback_type},
		unparse::pretty_print,
	},
	ir::{presyntax::Stmt, semantics::Value, syntax::Core},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("parse error at {}: expected {}", .0.location, .0.expected)]
	Parse(ParseError<LineCol>),
	#[error(transparent)]
	Elaboration(#[from] ElaborationError),
}

/// A top-level scope: the definitions made so far and the pattern variables solved along the way.
pub struct Module {
	pub interner: Rodeo,
	pub context: Context,
	pub solution: Solution,
}

impl Default for Module {
	fn default() -> Self { Self::new() }
}

impl Module {
	pub fn new() -> Self { Self { interner: Rodeo::new(), context: Context::empty(), solution: Solution::new() } }

	pub fn parse(&mut self, source: &str) -> Result<Vec<Stmt>, Error> {
		parse_stmts(source, &mut self.interner).map_err(Error::Parse)
	}

	/// Parses and runs every statement of `source`, returning their outputs.
	pub fn execute(&mut self, source: &str) -> Result<Vec<String>, Error> {
		let stmts = self.parse(source)?;
		Ok(self.execute_stmts(&stmts)?)
	}

	pub fn execute_stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<String>, ElaborationError> {
		let mut outputs = Vec::new();
		for stmt in stmts {
			outputs.extend(self.execute_stmt(stmt)?);
		}
		Ok(outputs)
	}

	/// Runs one statement. A failing statement leaves the module unchanged.
	pub fn execute_stmt(&mut self, stmt: &Stmt) -> Result<Option<String>, ElaborationError> {
		let mut solution = self.solution.clone();
		let context = &self.context;
		let output = match stmt {
			Stmt::Let { name, ty, expr } => {
				let (core, ty) = match ty {
					Some(ty) => {
						let ty = check_type(&mut solution, context, ty)?.evaluate_in(&solution.environment(context));
						(check(&mut solution, context, expr, &ty)?, ty)
					}
					None => {
						let inferred = infer(&mut solution, context, expr)?;
						(inferred.core, inferred.ty)
					}
				};
				let environment = solution.environment(context);
				let value = core.evaluate_in(&environment);
				let ty_core = readback_type(&solution, context, &ty);
				ensure_resolved(&solution, &ty_core)?;
				ensure_resolved(&solution, &readback(&solution, context, &value))?;
				let ty = ty_core.evaluate_in(&environment);
				let local = solution.fresh_name(context, *name);
				log::debug!("defined {}", name.resolve(&self.interner));
				self.context = context.define(*name, local, ty, value);
				None
			}
			Stmt::Check { expr, ty } => {
				let ty = check_type(&mut solution, context, ty)?.evaluate_in(&solution.environment(context));
				let core = check(&mut solution, context, expr, &ty)?;
				let value = core.evaluate_in(&solution.environment(context));
				ensure_resolved(&solution, &readback(&solution, context, &value))?;
				None
			}
			Stmt::Compute(expr) => {
				let inferred = infer(&mut solution, context, expr)?;
				let value = inferred.core.evaluate_in(&solution.environment(context));
				let value = readback(&solution, context, &value);
				let ty = readback_type(&solution, context, &inferred.ty);
				ensure_resolved(&solution, &value)?;
				ensure_resolved(&solution, &ty)?;
				Some(format!("{}: {}", self.print(&value), self.print(&ty)))
			}
			Stmt::Solve { bindings, equations } => {
				let mut solve_context = context.clone();
				let mut pattern_vars = Vec::with_capacity(bindings.len());
				for (label, ty) in bindings {
					let ty = check_type(&mut solution, &solve_context, ty)?
						.evaluate_in(&solution.environment(&solve_context));
					let name = solution.fresh_name(&solve_context, *label);
					let pattern_var = solution.create_pattern_var(name, ty.clone(), solve_context.names());
					solve_context = solve_context.bind(*label, name, ty);
					pattern_vars.push((*label, pattern_var));
				}
				for (index, equation) in equations.iter().enumerate() {
					solution = solve_equation(&solution, &solve_context, equation)
						.map_err(|error| error.within(Frame::Equation(index)))?;
				}
				let lines: Result<Vec<_>, ElaborationError> = pattern_vars
					.iter()
					.map(|(label, pattern_var)| {
						let core = readback(&solution, context, pattern_var);
						ensure_resolved(&solution, &core)?;
						Ok(format!("{} = {}", label.resolve(&self.interner), self.print(&core)))
					})
					.collect();
				Some(lines?.join("\n"))
			}
		};
		self.solution = solution;
		Ok(output)
	}

	pub fn print(&self, core: &Core) -> String { pretty_print(core, &self.interner) }

	/// Looks up the value of a top-level definition.
	pub fn lookup_value(&self, label: &str) -> Option<Rc<Value>> {
		let label = Name::new(self.interner.get(label)?);
		self.context.lookup(label).and_then(|entry| entry.value.clone())
	}
}

fn ensure_resolved(solution: &Solution, core: &Core) -> Result<(), ElaborationError> {
	match solution.unsolved_names(core).first() {
		Some(name) => Err(ErrorKind::UnresolvedPatternVariable(*name).into()),
		None => Ok(()),
	}
}

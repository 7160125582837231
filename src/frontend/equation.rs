use crate::{
	frontend::{
		context::Context,
		conversion::conversion_type,
		elaborate::{check, check_type, infer},
		error::ElaborationError,
		evaluate::Evaluate as _,
		solution::Solution,
	},
	ir::presyntax::Equation,
};

/// Elaborates both sides of an equation and unifies them, returning the extended solution.
/// The given solution is left untouched.
pub fn solve_equation(
	solution: &Solution,
	context: &Context,
	equation: &Equation,
) -> Result<Solution, ElaborationError> {
	let mut solution = solution.clone();
	match equation {
		Equation::Typed { ty, left, right } => {
			let ty = check_type(&mut solution, context, ty)?.evaluate_in(&solution.environment(context));
			let left = check(&mut solution, context, left, &ty)?;
			let right = check(&mut solution, context, right, &ty)?;
			let environment = solution.environment(context);
			let (left, right) = (left.evaluate_in(&environment), right.evaluate_in(&environment));
			solution.solve(context, &ty, &left, &right)?;
		}
		Equation::Untyped { left, right } => {
			let left = infer(&mut solution, context, left)?;
			let right = infer(&mut solution, context, right)?;
			conversion_type(&solution, context, &left.ty, &right.ty)?;
			let environment = solution.environment(context);
			let (left_value, right_value) = (left.core.evaluate_in(&environment), right.core.evaluate_in(&environment));
			solution.solve(context, &left.ty, &left_value, &right_value)?;
		}
	}
	Ok(solution)
}

use std::rc::Rc;

use crate::{
	common::freshen,
	frontend::{
		context::Context,
		error::{ElaborationError, ErrorKind},
		evaluate::lookup_property_type,
		solution::Solution,
		unevaluate::readback_type,
	},
	ir::{
		semantics::{Closure, Neutral, Value},
		syntax::alpha_equivalent,
	},
};

/// Decides whether two values of type `ty` are judgementally equal.
pub fn conversion(
	solution: &Solution,
	context: &Context,
	ty: &Rc<Value>,
	left: &Rc<Value>,
	right: &Rc<Value>,
) -> Result<(), ElaborationError> {
	let ty = solution.advance(ty);
	let left = solution.advance(left);
	let right = solution.advance(right);

	use Value as V;
	match (ty.as_ref(), left.as_ref(), right.as_ref()) {
		(V::Type, _, _) => conversion_type(solution, context, &left, &right),
		(_, V::Sole, V::Sole) => Ok(()),
		(_, V::Quote(l), V::Quote(r)) =>
			if l == r {
				Ok(())
			} else {
				Err(ErrorKind::LiteralMismatch { left: l.clone(), right: r.clone() }.into())
			},
		(_, V::TypedNeutral { neutral: l, .. }, V::TypedNeutral { neutral: r, .. }) =>
			conversion_neutral(solution, context, l, r),
		(V::Sigma { car_type, cdr_type }, V::Cons(lcar, lcdr), V::Cons(rcar, rcdr)) => {
			conversion(solution, context, car_type, lcar, rcar)?;
			conversion(solution, context, &cdr_type.apply(lcar.clone()), lcdr, rcdr)
		}
		(V::Pi { arg_type, ret_type }, V::Fn { ret: l, .. }, V::Fn { ret: r, .. })
		| (V::PiImplicit { arg_type, ret_type }, V::FnImplicit { ret: l, .. }, V::FnImplicit { ret: r, .. }) => {
			let (context, variable) = witness(solution, context, ret_type, arg_type);
			let ret_type = ret_type.apply(variable.clone());
			conversion(solution, &context, &ret_type, &l.apply(variable.clone()), &r.apply(variable))
		}
		(V::Equal { ty, .. }, V::Same(l), V::Same(r)) => conversion(solution, context, ty, l, r),
		(V::Clazz(clazz), V::Objekt(l), V::Objekt(r)) if l.len() == r.len() => {
			for (name, l_property) in l {
				let Some((_, r_property)) = r.iter().find(|(r_name, _)| r_name == name) else {
					return Err(ErrorKind::MissingProperty(*name).into());
				};
				let Some(property_type) = lookup_property_type(clazz, &left, *name) else {
					return Err(ErrorKind::PropertyNotFound(*name).into());
				};
				conversion(solution, context, &property_type, l_property, r_property)?;
			}
			Ok(())
		}
		_ => Err(ErrorKind::ConversionNotImplemented {
			ty: ty.kind_name(),
			left: left.kind_name(),
			right: right.kind_name(),
		}
		.into()),
	}
}

// Neutrals are equal when their heads are the same variable and their spines agree pointwise.
fn conversion_neutral(
	solution: &Solution,
	context: &Context,
	left: &Neutral,
	right: &Neutral,
) -> Result<(), ElaborationError> {
	use Neutral as N;
	match (left, right) {
		(N::Var(l), N::Var(r)) =>
			if l == r {
				Ok(())
			} else {
				Err(ErrorKind::VariableMismatch { left: *l, right: *r }.into())
			},
		(N::Ap { target: lt, arg: la }, N::Ap { target: rt, arg: ra })
		| (N::ApImplicit { target: lt, arg: la }, N::ApImplicit { target: rt, arg: ra }) => {
			conversion_neutral(solution, context, lt, rt)?;
			conversion(solution, context, &la.ty, &la.value, &ra.value)
		}
		(N::Car(l), N::Car(r)) | (N::Cdr(l), N::Cdr(r)) => conversion_neutral(solution, context, l, r),
		(N::Dot { target: l, name: ln }, N::Dot { target: r, name: rn }) if ln == rn =>
			conversion_neutral(solution, context, l, r),
		_ => Err(ErrorKind::ConversionNotImplemented {
			ty: "TypedNeutral",
			left: left.kind_name(),
			right: right.kind_name(),
		}
		.into()),
	}
}

/// Decides whether two types are equal, by comparing their normal forms.
pub fn conversion_type(
	solution: &Solution,
	context: &Context,
	left: &Rc<Value>,
	right: &Rc<Value>,
) -> Result<(), ElaborationError> {
	let left = readback_type(solution, context, left);
	let right = readback_type(solution, context, right);
	if alpha_equivalent(&left, &right) {
		Ok(())
	} else {
		Err(ErrorKind::TypeMismatch { left, right }.into())
	}
}

fn witness(solution: &Solution, context: &Context, closure: &Closure, ty: &Rc<Value>) -> (Context, Rc<Value>) {
	let name = freshen(&solution.used_names(context), closure.name);
	(context.bind(name, name, ty.clone()), Value::variable(ty.clone(), name).into())
}

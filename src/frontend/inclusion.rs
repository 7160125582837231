use std::{collections::HashMap, rc::Rc};

use crate::{
	common::{freshen_names, Name},
	frontend::{
		context::Context,
		conversion::conversion,
		error::{ElaborationError, ErrorKind, Frame, InternalError},
		evaluate::clazz_property_names,
		solution::Solution,
		unevaluate::readback_type,
	},
	ir::{
		semantics::{Clazz, Closure, Value},
		syntax::alpha_equivalent,
	},
};

/// Decides whether every value of `subtype` is a value of `ty`, solving pattern variables as needed.
pub fn inclusion(
	solution: &mut Solution,
	context: &Context,
	subtype: &Rc<Value>,
	ty: &Rc<Value>,
) -> Result<(), ElaborationError> {
	let subtype = solution.advance(subtype);
	let ty = solution.advance(ty);
	log::trace!("inclusion: {} <: {}", subtype.kind_name(), ty.kind_name());
	include(solution, context, &subtype, &ty).map_err(|error| {
		error.within(Frame::Inclusion {
			subtype: readback_type(solution, context, &subtype),
			ty: readback_type(solution, context, &ty),
		})
	})
}

fn include(
	solution: &mut Solution,
	context: &Context,
	subtype: &Rc<Value>,
	ty: &Rc<Value>,
) -> Result<(), ElaborationError> {
	use Value as V;
	if solution.is_pattern_headed(subtype) || solution.is_pattern_headed(ty) {
		return solution.solve(context, &V::Type.into(), subtype, ty);
	}
	match (subtype.as_ref(), ty.as_ref()) {
		(V::Pi { arg_type: sa, ret_type: sr }, V::Pi { arg_type: ta, ret_type: tr })
		| (V::PiImplicit { arg_type: sa, ret_type: sr }, V::PiImplicit { arg_type: ta, ret_type: tr }) => {
			inclusion(solution, context, ta, sa)?;
			let (context, variable) = witness(solution, context, sr, sa);
			inclusion(solution, &context, &sr.apply(variable.clone()), &tr.apply(variable))
		}
		(V::Sigma { car_type: sa, cdr_type: sr }, V::Sigma { car_type: ta, cdr_type: tr }) => {
			inclusion(solution, context, sa, ta)?;
			let (context, variable) = witness(solution, context, sr, sa);
			inclusion(solution, &context, &sr.apply(variable.clone()), &tr.apply(variable))
		}
		(V::Clazz(subclazz), V::Clazz(clazz)) =>
			if is_ordered(subclazz, clazz) {
				include_clazz_ordered(solution, context, subclazz, clazz)
			} else {
				include_clazz(solution, context, subclazz, clazz)
			},
		(V::Equal { ty: st, from: sf, to: so }, V::Equal { ty: tt, from: tf, to: to }) => {
			inclusion(solution, context, st, tt)?;
			conversion(solution, context, tt, sf, tf)?;
			conversion(solution, context, tt, so, to)
		}
		_ => include_by_equality(solution, context, subtype, ty),
	}
}

// Types that are not related structurally must be equal; pattern variables inside them are solved.
fn include_by_equality(
	solution: &mut Solution,
	context: &Context,
	subtype: &Rc<Value>,
	ty: &Rc<Value>,
) -> Result<(), ElaborationError> {
	let left = readback_type(solution, context, subtype);
	let right = readback_type(solution, context, ty);
	if alpha_equivalent(&left, &right) {
		return Ok(());
	}
	if solution.unsolved_names(&left).is_empty() && solution.unsolved_names(&right).is_empty() {
		return Err(ErrorKind::TypeMismatch { left, right }.into());
	}
	solution.solve(context, &Value::Type.into(), subtype, ty)
}

fn witness(solution: &mut Solution, context: &Context, closure: &Closure, ty: &Rc<Value>) -> (Context, Rc<Value>) {
	let name = solution.fresh_name(context, closure.name);
	(context.bind(name, name, ty.clone()), Value::variable(ty.clone(), name).into())
}

/// Whether the properties of `clazz` occur in `subclazz` in the same relative order.
/// Properties missing from `subclazz` do not count against the order.
pub fn is_ordered(subclazz: &Rc<Clazz>, clazz: &Rc<Clazz>) -> bool {
	let subclazz_names = clazz_property_names(subclazz);
	let positions: Vec<usize> = clazz_property_names(clazz)
		.iter()
		.filter_map(|name| subclazz_names.iter().position(|sub_name| sub_name == name))
		.collect();
	positions.windows(2).all(|pair| pair[0] < pair[1])
}

#[derive(Debug)]
struct ExpelledProperty {
	ty: Rc<Value>,
	value: Option<Rc<Value>>,
}

/// Order-independent class inclusion.
pub fn include_clazz(
	solution: &mut Solution,
	context: &Context,
	subclazz: &Rc<Clazz>,
	clazz: &Rc<Clazz>,
) -> Result<(), ElaborationError> {
	let mut names = clazz_property_names(subclazz);
	names.extend(clazz_property_names(clazz));
	let fresh_names = freshen_names(&solution.used_names(context), names);
	solution.reserve(fresh_names.values().copied());

	let sub_properties = clazz_expel(&fresh_names, subclazz)?;
	let properties = clazz_expel(&fresh_names, clazz)?;

	// Unfulfilled subclass properties are abstract in what follows.
	let mut context = context.clone();
	for (name, property) in &sub_properties {
		if property.value.is_none() {
			let fresh_name = fresh_name(&fresh_names, *name)?;
			context = context.bind(fresh_name, fresh_name, property.ty.clone());
		}
	}

	for (name, property) in &properties {
		let Some((_, sub_property)) = sub_properties.iter().find(|(sub_name, _)| sub_name == name) else {
			return Err(ErrorKind::MissingProperty(*name).into());
		};
		include_property(solution, &context, &fresh_names, *name, sub_property, property)
			.map_err(|error| error.within(Frame::Property(*name)))?;
	}
	Ok(())
}

fn include_property(
	solution: &mut Solution,
	context: &Context,
	fresh_names: &HashMap<Name, Name>,
	name: Name,
	sub_property: &ExpelledProperty,
	property: &ExpelledProperty,
) -> Result<(), ElaborationError> {
	inclusion(solution, context, &sub_property.ty, &property.ty)?;
	match (&sub_property.value, &property.value) {
		(Some(sub_value), Some(value)) => solution.solve(context, &property.ty, value, sub_value),
		(Some(sub_value), None) => {
			// The class's witness for this property is the subclass's value.
			let pattern_var =
				solution.create_pattern_var(fresh_name(fresh_names, name)?, sub_property.ty.clone(), context.names());
			solution.solve(context, &sub_property.ty, &pattern_var, sub_value)
		}
		(None, Some(_)) => Err(ErrorKind::UnfixedProperty(name).into()),
		(None, None) => Ok(()),
	}
}

fn fresh_name(fresh_names: &HashMap<Name, Name>, name: Name) -> Result<Name, InternalError> {
	fresh_names.get(&name).copied().ok_or_else(|| InternalError(format!("no fresh name for property {name:?}")))
}

/// Flattens a class into its properties, witnessing each unfulfilled property with its fresh name.
fn clazz_expel(
	fresh_names: &HashMap<Name, Name>,
	clazz: &Rc<Clazz>,
) -> Result<Vec<(Name, ExpelledProperty)>, InternalError> {
	let mut properties = Vec::new();
	let mut clazz = clazz.clone();
	loop {
		clazz = match clazz.as_ref() {
			Clazz::Null => return Ok(properties),
			Clazz::Cons { name, property_type, rest } => {
				let witness = Value::variable(property_type.clone(), fresh_name(fresh_names, *name)?);
				properties.push((*name, ExpelledProperty { ty: property_type.clone(), value: None }));
				rest.apply_clazz(witness.into())
			}
			Clazz::Fulfilled { name, property_type, property, rest } => {
				properties
					.push((*name, ExpelledProperty { ty: property_type.clone(), value: Some(property.clone()) }));
				rest.clone()
			}
		};
	}
}

/// Order-preserving class inclusion: walks both chains once, in step.
pub fn include_clazz_ordered(
	solution: &mut Solution,
	context: &Context,
	subclazz: &Rc<Clazz>,
	clazz: &Rc<Clazz>,
) -> Result<(), ElaborationError> {
	let sub_names = clazz_property_names(subclazz);
	let missing: Vec<Name> =
		clazz_property_names(clazz).into_iter().filter(|name| !sub_names.contains(name)).collect();
	if !missing.is_empty() {
		return Err(ErrorKind::MissingProperties(missing).into());
	}

	let mut context = context.clone();
	let mut subclazz = subclazz.clone();
	let mut clazz = clazz.clone();
	loop {
		clazz = match clazz.as_ref() {
			Clazz::Null => return Ok(()),
			Clazz::Cons { name, property_type, rest } => {
				let name = *name;
				let (next_context, sub_property) = next_subclazz(solution, &context, name, &subclazz)?;
				context = next_context;
				inclusion(solution, &context, sub_property.ty(), property_type)
					.map_err(|error| error.within(Frame::Property(name)))?;
				let (value, sub_rest) = match sub_property {
					SubProperty::Cons { property_type, rest } => {
						let (next_context, variable) = witness(solution, &context, &rest, &property_type);
						context = next_context;
						(variable.clone(), rest.apply_clazz(variable))
					}
					SubProperty::Fulfilled { property_type: sub_type, property, rest } => {
						// The class's witness for this property is the subclass's value.
						let fresh = solution.fresh_name(&context, name);
						let pattern_var = solution.create_pattern_var(fresh, sub_type.clone(), context.names());
						solution
							.solve(&context, &sub_type, &pattern_var, &property)
							.map_err(|error| error.within(Frame::Property(name)))?;
						(property, rest)
					}
				};
				subclazz = sub_rest;
				rest.apply_clazz(value)
			}
			Clazz::Fulfilled { name, property_type, property, rest } => {
				let name = *name;
				let (next_context, sub_property) = next_subclazz(solution, &context, name, &subclazz)?;
				context = next_context;
				match sub_property {
					SubProperty::Cons { .. } => return Err(ErrorKind::UnfixedProperty(name).into()),
					SubProperty::Fulfilled { property_type: sub_type, property: sub_value, rest: sub_rest } => {
						inclusion(solution, &context, &sub_type, property_type)
							.and_then(|()| solution.solve(&context, &sub_type, property, &sub_value))
							.map_err(|error| error.within(Frame::Property(name)))?;
						subclazz = sub_rest;
					}
				}
				rest.clone()
			}
		};
	}
}

enum SubProperty {
	Cons { property_type: Rc<Value>, rest: Closure },
	Fulfilled { property_type: Rc<Value>, property: Rc<Value>, rest: Rc<Clazz> },
}

impl SubProperty {
	fn ty(&self) -> &Rc<Value> {
		match self {
			Self::Cons { property_type, .. } | Self::Fulfilled { property_type, .. } => property_type,
		}
	}
}

// Advances the subclass to the property `name`, witnessing the unfulfilled properties it skips.
fn next_subclazz(
	solution: &mut Solution,
	context: &Context,
	name: Name,
	subclazz: &Rc<Clazz>,
) -> Result<(Context, SubProperty), ElaborationError> {
	let mut context = context.clone();
	let mut subclazz = subclazz.clone();
	loop {
		subclazz = match subclazz.as_ref() {
			Clazz::Null => return Err(ErrorKind::PropertyNotFound(name).into()),
			Clazz::Cons { name: sub_name, property_type, rest } if *sub_name == name =>
				return Ok((context, SubProperty::Cons { property_type: property_type.clone(), rest: rest.clone() })),
			Clazz::Fulfilled { name: sub_name, property_type, property, rest } if *sub_name == name =>
				return Ok((
					context,
					SubProperty::Fulfilled {
						property_type: property_type.clone(),
						property: property.clone(),
						rest: rest.clone(),
					},
				)),
			Clazz::Cons { property_type, rest, .. } => {
				let (next_context, variable) = witness(solution, &context, rest, property_type);
				context = next_context;
				rest.apply_clazz(variable)
			}
			Clazz::Fulfilled { rest, .. } => rest.clone(),
		};
	}
}

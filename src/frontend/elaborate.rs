use std::rc::Rc;

use crate::{
	common::Name,
	frontend::{
		context::Context,
		conversion::conversion,
		error::{ElaborationError, ErrorKind, ExpectedFormer, Frame},
		evaluate::{do_car, lookup_property_type, Evaluate as _},
		inclusion::inclusion,
		solution::Solution,
		unevaluate::{readback, readback_clazz, readback_type},
	},
	ir::{
		presyntax::{ClazzBinding, Expression, Preterm},
		semantics::{Clazz, Closure, Value},
		syntax::Core,
	},
};

/// A core term together with its synthesized type.
#[derive(Clone, Debug)]
pub struct Inferred {
	pub core: Core,
	pub ty: Rc<Value>,
}

impl Inferred {
	pub fn new(core: Core, ty: Rc<Value>) -> Self { Self { core, ty } }
}

/// Elaborates an expression and synthesizes its type.
pub fn infer(solution: &mut Solution, context: &Context, expr: &Expression) -> Result<Inferred, ElaborationError> {
	log::trace!("infer {:?}", expr.range);
	infer_preterm(solution, context, expr).map_err(|error| error.at(expr.range))
}

/// Elaborates an expression against a type.
pub fn check(
	solution: &mut Solution,
	context: &Context,
	expr: &Expression,
	ty: &Rc<Value>,
) -> Result<Core, ElaborationError> {
	log::trace!("check {:?} against {}", expr.range, ty.kind_name());
	check_preterm(solution, context, expr, ty).map_err(|error| error.at(expr.range))
}

pub fn check_type(solution: &mut Solution, context: &Context, expr: &Expression) -> Result<Core, ElaborationError> {
	check(solution, context, expr, &Value::Type.into())
}

fn evaluate_core(solution: &Solution, context: &Context, core: &Core) -> Rc<Value> {
	core.evaluate_in(&solution.environment(context))
}

fn bind_fresh(solution: &Solution, context: &Context, label: Name, ty: Rc<Value>) -> (Context, Name) {
	let name = solution.fresh_name(context, label);
	(context.bind(label, name, ty), name)
}

fn expected_former(
	solution: &Solution,
	context: &Context,
	expected: ExpectedFormer,
	ty: &Rc<Value>,
) -> ElaborationError {
	ErrorKind::ExpectedFormer { expected, found: readback_type(solution, context, ty) }.into()
}

fn check_distinct<'a>(names: impl IntoIterator<Item = &'a Name>) -> Result<(), ElaborationError> {
	let mut seen = Vec::new();
	for name in names {
		if seen.contains(name) {
			return Err(ErrorKind::DuplicateProperty(*name).into());
		}
		seen.push(*name);
	}
	Ok(())
}

fn infer_preterm(solution: &mut Solution, context: &Context, expr: &Expression) -> Result<Inferred, ElaborationError> {
	use Preterm as P;
	match &expr.preterm {
		P::Var(label) => match context.lookup(*label) {
			Some(entry) => Ok(Inferred::new(Core::Var(entry.name), entry.ty.clone())),
			None => Err(ErrorKind::NotInScope(*label).into()),
		},

		P::Type => Ok(Inferred::new(Core::Type, Value::Type.into())),

		P::Pi { name, arg_type, ret_type } => {
			let (name, arg_type, ret_type) = infer_binder_type(solution, context, *name, arg_type, ret_type)?;
			let core = Core::Pi { name, arg_type: arg_type.into(), ret_type: ret_type.into() };
			Ok(Inferred::new(core, Value::Type.into()))
		}
		P::PiImplicit { name, arg_type, ret_type } => {
			let (name, arg_type, ret_type) = infer_binder_type(solution, context, *name, arg_type, ret_type)?;
			Ok(Inferred::new(
				Core::PiImplicit { name, arg_type: arg_type.into(), ret_type: ret_type.into() },
				Value::Type.into(),
			))
		}
		P::Fn { name, arg_type: Some(arg_type), ret } => infer_fn(solution, context, *name, arg_type, ret, false),
		P::FnImplicit { name, arg_type: Some(arg_type), ret } => infer_fn(solution, context, *name, arg_type, ret, true),
		P::Fn { arg_type: None, .. } | P::FnImplicit { arg_type: None, .. } =>
			Err(ErrorKind::CannotInferFunction.into()),
		P::Ap { target, arg } => {
			let target = infer(solution, context, target)?;
			let target = insert_implicit_aps(solution, context, target);
			let ty = solution.advance(&target.ty);
			match ty.as_ref() {
				Value::Pi { arg_type, ret_type } => {
					let arg = check(solution, context, arg, arg_type)?;
					let arg_value = evaluate_core(solution, context, &arg);
					let core = Core::Ap { target: target.core.into(), arg: arg.into() };
					Ok(Inferred::new(core, ret_type.apply(arg_value)))
				}
				// Applying a class fulfils its next unfulfilled property.
				Value::Type => {
					let target_value = evaluate_core(solution, context, &target.core);
					let target_value = solution.advance(&target_value);
					let Value::Clazz(clazz) = target_value.as_ref() else {
						return Err(expected_former(solution, context, ExpectedFormer::Pi, &ty));
					};
					let clazz = check_clazz_arg(solution, context, clazz, arg)?;
					Ok(Inferred::new(readback_clazz(solution, context, &clazz), Value::Type.into()))
				}
				_ => Err(expected_former(solution, context, ExpectedFormer::Pi, &ty)),
			}
		}
		P::ApImplicit { target, arg } => {
			let target = infer(solution, context, target)?;
			let ty = solution.advance(&target.ty);
			let Value::PiImplicit { arg_type, ret_type } = ty.as_ref() else {
				return Err(expected_former(solution, context, ExpectedFormer::PiImplicit, &ty));
			};
			let arg = check(solution, context, arg, arg_type)?;
			let arg_value = evaluate_core(solution, context, &arg);
			Ok(Inferred::new(
				Core::ApImplicit { target: target.core.into(), arg: arg.into() },
				ret_type.apply(arg_value),
			))
		}

		P::Sigma { name, car_type, cdr_type } => {
			let (name, car_type, cdr_type) = infer_binder_type(solution, context, *name, car_type, cdr_type)?;
			let core = Core::Sigma { name, car_type: car_type.into(), cdr_type: cdr_type.into() };
			Ok(Inferred::new(core, Value::Type.into()))
		}
		P::Cons { .. } => Err(ErrorKind::CannotInferCons.into()),
		P::Car(target) => {
			let target = infer(solution, context, target)?;
			let ty = solution.advance(&target.ty);
			let Value::Sigma { car_type, .. } = ty.as_ref() else {
				return Err(expected_former(solution, context, ExpectedFormer::Sigma, &ty));
			};
			Ok(Inferred::new(Core::Car(target.core.into()), car_type.clone()))
		}
		P::Cdr(target) => {
			let target = infer(solution, context, target)?;
			let ty = solution.advance(&target.ty);
			let Value::Sigma { cdr_type, .. } = ty.as_ref() else {
				return Err(expected_former(solution, context, ExpectedFormer::Sigma, &ty));
			};
			let car = do_car(evaluate_core(solution, context, &target.core));
			Ok(Inferred::new(Core::Cdr(target.core.into()), cdr_type.apply(car)))
		}

		P::String => Ok(Inferred::new(Core::String, Value::Type.into())),
		P::Quote(literal) => Ok(Inferred::new(Core::Quote(literal.clone()), Value::String.into())),
		P::Trivial => Ok(Inferred::new(Core::Trivial, Value::Type.into())),
		P::Sole => Ok(Inferred::new(Core::Sole, Value::Trivial.into())),

		P::Equal { ty, from, to } => {
			let ty = check_type(solution, context, ty)?;
			let ty_value = evaluate_core(solution, context, &ty);
			let from = check(solution, context, from, &ty_value)?;
			let to = check(solution, context, to, &ty_value)?;
			Ok(Inferred::new(Core::Equal { ty: ty.into(), from: from.into(), to: to.into() }, Value::Type.into()))
		}
		P::Same(value) => {
			let inferred = infer(solution, context, value)?;
			let value = evaluate_core(solution, context, &inferred.core);
			Ok(Inferred::new(
				Core::Same(inferred.core.into()),
				Value::Equal { ty: inferred.ty, from: value.clone(), to: value }.into(),
			))
		}

		P::Clazz(bindings) => Ok(Inferred::new(check_clazz(solution, context, bindings)?, Value::Type.into())),
		P::Objekt(properties) => {
			check_distinct(properties.iter().map(|(name, _)| name))?;
			let mut cores = Vec::with_capacity(properties.len());
			let mut fulfilled = Vec::with_capacity(properties.len());
			for (name, property) in properties {
				let inferred =
					infer(solution, context, property).map_err(|error| error.within(Frame::Property(*name)))?;
				fulfilled.push((*name, inferred.ty, evaluate_core(solution, context, &inferred.core)));
				cores.push((*name, inferred.core));
			}
			let clazz = fulfilled.into_iter().rev().fold(Rc::new(Clazz::Null), |rest, (name, property_type, property)| {
				Clazz::Fulfilled { name, property_type, property, rest }.into()
			});
			Ok(Inferred::new(Core::Objekt(cores), Value::Clazz(clazz).into()))
		}
		P::Dot { target, name } => {
			let target = infer(solution, context, target)?;
			let ty = solution.advance(&target.ty);
			let Value::Clazz(clazz) = ty.as_ref() else {
				return Err(expected_former(solution, context, ExpectedFormer::Clazz, &ty));
			};
			let target_value = evaluate_core(solution, context, &target.core);
			match lookup_property_type(clazz, &target_value, *name) {
				Some(property_type) =>
					Ok(Inferred::new(Core::Dot { target: target.core.into(), name: *name }, property_type)),
				None => {
					let clazz = readback_clazz(solution, context, clazz);
					Err(ErrorKind::UnknownProperty { name: *name, clazz }.into())
				}
			}
		}

		P::New { clazz, properties } => {
			let (ty, clazz) = infer_new_target(solution, context, clazz)?;
			Ok(Inferred::new(check_properties(solution, context, properties, &clazz)?, ty))
		}
		P::NewAp { clazz, args } => {
			let (ty, clazz) = infer_new_target(solution, context, clazz)?;
			Ok(Inferred::new(check_new_args(solution, context, args, &clazz)?, ty))
		}

		P::The { ty, value } => {
			let ty = check_type(solution, context, ty)?;
			let ty = evaluate_core(solution, context, &ty);
			let value = check(solution, context, value, &ty)?;
			Ok(Inferred::new(value, ty))
		}

		P::Let { name, ty, argument, tail } => {
			let (tail_context, binding) = elaborate_let(solution, context, *name, ty.as_deref(), argument)?;
			let tail = infer(solution, &tail_context, tail)?;
			Ok(Inferred::new(binding.into_core(tail.core), tail.ty))
		}
	}
}

struct LetBinding {
	name: Name,
	ty: Core,
	argument: Core,
}

impl LetBinding {
	fn into_core(self, tail: Core) -> Core {
		Core::Let { name: self.name, ty: self.ty.into(), argument: self.argument.into(), tail: tail.into() }
	}
}

// Elaborates the argument of a local definition and defines it in an extension of `context`.
fn elaborate_let(
	solution: &mut Solution,
	context: &Context,
	label: Name,
	ty: Option<&Expression>,
	argument: &Expression,
) -> Result<(Context, LetBinding), ElaborationError> {
	let (ty, ty_value, argument) = match ty {
		Some(ty) => {
			let ty = check_type(solution, context, ty)?;
			let ty_value = evaluate_core(solution, context, &ty);
			let argument = check(solution, context, argument, &ty_value)?;
			(ty, ty_value, argument)
		}
		None => {
			let inferred = infer(solution, context, argument)?;
			(readback_type(solution, context, &inferred.ty), inferred.ty, inferred.core)
		}
	};
	let value = evaluate_core(solution, context, &argument);
	let name = solution.fresh_name(context, label);
	Ok((context.define(label, name, ty_value, value), LetBinding { name, ty, argument }))
}

// Elaborates the parts of a binding type former: the bound type, then the body under a fresh name.
fn infer_binder_type(
	solution: &mut Solution,
	context: &Context,
	label: Name,
	arg_type: &Expression,
	body: &Expression,
) -> Result<(Name, Core, Core), ElaborationError> {
	let arg_type = check_type(solution, context, arg_type)?;
	let arg_value = evaluate_core(solution, context, &arg_type);
	let (body_context, name) = bind_fresh(solution, context, label, arg_value);
	let body = check_type(solution, &body_context, body)?;
	Ok((name, arg_type, body))
}

fn infer_fn(
	solution: &mut Solution,
	context: &Context,
	label: Name,
	arg_type: &Expression,
	ret: &Expression,
	is_implicit: bool,
) -> Result<Inferred, ElaborationError> {
	let arg_type = check_type(solution, context, arg_type)?;
	let arg_value = evaluate_core(solution, context, &arg_type);
	let (body_context, name) = bind_fresh(solution, context, label, arg_value);
	let ret = infer(solution, &body_context, ret)?;
	let ret_type = readback_type(solution, &body_context, &ret.ty);
	let (core, ty) = if is_implicit {
		(
			Core::FnImplicit { name, arg_type: arg_type.clone().into(), ret: ret.core.into() },
			Core::PiImplicit { name, arg_type: arg_type.into(), ret_type: ret_type.into() },
		)
	} else {
		(
			Core::Fn { name, arg_type: arg_type.clone().into(), ret: ret.core.into() },
			Core::Pi { name, arg_type: arg_type.into(), ret_type: ret_type.into() },
		)
	};
	let ty = evaluate_core(solution, context, &ty);
	Ok(Inferred::new(core, ty))
}

/// Applies a term to a fresh pattern variable for each of its leading implicit parameters.
pub fn insert_implicit_aps(solution: &mut Solution, context: &Context, inferred: Inferred) -> Inferred {
	let mut inferred = inferred;
	loop {
		let ty = solution.advance(&inferred.ty);
		let Value::PiImplicit { arg_type, ret_type } = ty.as_ref() else { return inferred };
		let name = solution.fresh_name(context, ret_type.name);
		let pattern_var = solution.create_pattern_var(name, arg_type.clone(), context.names());
		inferred = Inferred::new(
			Core::ApImplicit { target: inferred.core.into(), arg: Core::Var(name).into() },
			ret_type.apply(pattern_var),
		);
	}
}

fn check_preterm(
	solution: &mut Solution,
	context: &Context,
	expr: &Expression,
	ty: &Rc<Value>,
) -> Result<Core, ElaborationError> {
	let ty = solution.advance(ty);
	match (&expr.preterm, ty.as_ref()) {
		(Preterm::Fn { name, arg_type: annotation, ret }, Value::Pi { arg_type, ret_type }) =>
			check_fn(solution, context, *name, annotation.as_deref(), ret, arg_type, ret_type, false),
		(Preterm::FnImplicit { name, arg_type: annotation, ret }, Value::PiImplicit { arg_type, ret_type }) =>
			check_fn(solution, context, *name, annotation.as_deref(), ret, arg_type, ret_type, true),
		// A plain function against an implicit function type gets an implicit binder of its own.
		(Preterm::Fn { .. }, Value::PiImplicit { arg_type, ret_type }) => {
			let (body_context, name) = bind_fresh(solution, context, ret_type.name, arg_type.clone());
			let variable = Value::variable(arg_type.clone(), name).into();
			let ret = check(solution, &body_context, expr, &ret_type.apply(variable))?;
			Ok(Core::FnImplicit { name, arg_type: readback_type(solution, context, arg_type).into(), ret: ret.into() })
		}
		(Preterm::Cons { car, cdr }, Value::Sigma { car_type, cdr_type }) => {
			let car = check(solution, context, car, car_type)?;
			let car_value = evaluate_core(solution, context, &car);
			let cdr = check(solution, context, cdr, &cdr_type.apply(car_value))?;
			Ok(Core::Cons { car: car.into(), cdr: cdr.into() })
		}
		(Preterm::Objekt(properties), Value::Clazz(clazz)) => check_properties(solution, context, properties, clazz),
		(Preterm::Clazz(bindings), Value::Type) => check_clazz(solution, context, bindings),
		(Preterm::Let { name, ty: annotation, argument, tail }, _) => {
			let (tail_context, binding) = elaborate_let(solution, context, *name, annotation.as_deref(), argument)?;
			let tail = check(solution, &tail_context, tail, &ty)?;
			Ok(binding.into_core(tail))
		}
		_ => {
			let inferred = infer(solution, context, expr)?;
			let inferred = if matches!(ty.as_ref(), Value::PiImplicit { .. }) {
				inferred
			} else {
				insert_implicit_aps(solution, context, inferred)
			};
			inclusion(solution, context, &inferred.ty, &ty)?;
			Ok(inferred.core)
		}
	}
}

#[allow(clippy::too_many_arguments)]
fn check_fn(
	solution: &mut Solution,
	context: &Context,
	label: Name,
	annotation: Option<&Expression>,
	ret: &Expression,
	arg_type: &Rc<Value>,
	ret_type: &Closure,
	is_implicit: bool,
) -> Result<Core, ElaborationError> {
	if let Some(annotation) = annotation {
		let annotated = check_type(solution, context, annotation)?;
		let annotated = evaluate_core(solution, context, &annotated);
		inclusion(solution, context, arg_type, &annotated)?;
	}
	let (body_context, name) = bind_fresh(solution, context, label, arg_type.clone());
	let variable = Value::variable(arg_type.clone(), name).into();
	let ret = check(solution, &body_context, ret, &ret_type.apply(variable))?;
	let arg_type = readback_type(solution, context, arg_type).into();
	Ok(if is_implicit {
		Core::FnImplicit { name, arg_type, ret: ret.into() }
	} else {
		Core::Fn { name, arg_type, ret: ret.into() }
	})
}

/// Checks an object against a class: unfulfilled properties come from the object,
/// fulfilled ones are filled in or compared, and the object's extra properties are kept.
pub fn check_properties(
	solution: &mut Solution,
	context: &Context,
	properties: &[(Name, Expression)],
	clazz: &Rc<Clazz>,
) -> Result<Core, ElaborationError> {
	check_distinct(properties.iter().map(|(name, _)| name))?;
	let find = |name: Name| properties.iter().find(|(property_name, _)| *property_name == name).map(|(_, expr)| expr);
	let mut cores = Vec::with_capacity(properties.len());
	let mut clazz = clazz.clone();
	loop {
		clazz = match clazz.as_ref() {
			Clazz::Null => break,
			Clazz::Cons { name, property_type, rest } => {
				let Some(property) = find(*name) else {
					return Err(ErrorKind::MissingProperty(*name).into());
				};
				let core = check(solution, context, property, property_type)
					.map_err(|error| error.within(Frame::Property(*name)))?;
				let value = evaluate_core(solution, context, &core);
				cores.push((*name, core));
				rest.apply_clazz(value)
			}
			Clazz::Fulfilled { name, property_type, property, rest } => {
				let core = match find(*name) {
					Some(expr) => {
						check(solution, context, expr, property_type)
							.and_then(|core| {
								let value = evaluate_core(solution, context, &core);
								conversion(solution, context, property_type, property, &value)?;
								Ok(core)
							})
							.map_err(|error| error.within(Frame::Property(*name)))?
					}
					None => readback(solution, context, property),
				};
				cores.push((*name, core));
				rest.clone()
			}
		};
	}
	for (name, expr) in properties {
		if cores.iter().any(|(core_name, _)| core_name == name) {
			continue;
		}
		let inferred = infer(solution, context, expr).map_err(|error| error.within(Frame::Property(*name)))?;
		cores.push((*name, inferred.core));
	}
	Ok(Core::Objekt(cores))
}

// The class that `new` constructs an object of, as a type and as a chain.
fn infer_new_target(
	solution: &mut Solution,
	context: &Context,
	clazz: &Expression,
) -> Result<(Rc<Value>, Rc<Clazz>), ElaborationError> {
	let core = check_type(solution, context, clazz)?;
	let ty = evaluate_core(solution, context, &core);
	let ty = solution.advance(&ty);
	match ty.as_ref() {
		Value::Clazz(clazz) => Ok((ty.clone(), clazz.clone())),
		_ => Err(expected_former(solution, context, ExpectedFormer::Clazz, &ty).at(clazz.range)),
	}
}

/// Checks positional arguments against the unfulfilled properties of a class, in order.
/// Fulfilled properties are copied into the object.
pub fn check_new_args(
	solution: &mut Solution,
	context: &Context,
	args: &[Expression],
	clazz: &Rc<Clazz>,
) -> Result<Core, ElaborationError> {
	let mut args = args.iter();
	let mut cores = Vec::new();
	let mut remaining = clazz.clone();
	loop {
		remaining = match remaining.as_ref() {
			Clazz::Null => break,
			Clazz::Cons { name, property_type, rest } => {
				let Some(arg) = args.next() else {
					return Err(ErrorKind::MissingProperty(*name).into());
				};
				let core = check(solution, context, arg, property_type)
					.map_err(|error| error.within(Frame::Property(*name)))?;
				let value = evaluate_core(solution, context, &core);
				cores.push((*name, core));
				rest.apply_clazz(value)
			}
			Clazz::Fulfilled { name, property, rest, .. } => {
				cores.push((*name, readback(solution, context, property)));
				rest.clone()
			}
		};
	}
	match args.next() {
		Some(arg) => Err(ElaborationError::from(ErrorKind::ExtraArgument {
			clazz: readback_clazz(solution, context, clazz),
		})
		.at(arg.range)),
		None => Ok(Core::Objekt(cores)),
	}
}

// Fulfils the first unfulfilled property of `clazz` with `arg`.
fn check_clazz_arg(
	solution: &mut Solution,
	context: &Context,
	clazz: &Rc<Clazz>,
	arg: &Expression,
) -> Result<Rc<Clazz>, ElaborationError> {
	match fulfil_next(solution, context, clazz, arg)? {
		Some(clazz) => Ok(clazz),
		None => Err(ElaborationError::from(ErrorKind::ExtraArgument {
			clazz: readback_clazz(solution, context, clazz),
		})
		.at(arg.range)),
	}
}

fn fulfil_next(
	solution: &mut Solution,
	context: &Context,
	clazz: &Rc<Clazz>,
	arg: &Expression,
) -> Result<Option<Rc<Clazz>>, ElaborationError> {
	match clazz.as_ref() {
		Clazz::Null => Ok(None),
		Clazz::Cons { name, property_type, rest } => {
			let core =
				check(solution, context, arg, property_type).map_err(|error| error.within(Frame::Property(*name)))?;
			let property = evaluate_core(solution, context, &core);
			Ok(Some(
				Clazz::Fulfilled {
					name: *name,
					property_type: property_type.clone(),
					property: property.clone(),
					rest: rest.apply_clazz(property),
				}
				.into(),
			))
		}
		Clazz::Fulfilled { name, property_type, property, rest } =>
			Ok(fulfil_next(solution, context, rest, arg)?.map(|rest| {
				Rc::new(Clazz::Fulfilled {
					name: *name,
					property_type: property_type.clone(),
					property: property.clone(),
					rest,
				})
			})),
	}
}

/// Elaborates a class literal; each property is in scope in the properties after it.
pub fn check_clazz(
	solution: &mut Solution,
	context: &Context,
	bindings: &[ClazzBinding],
) -> Result<Core, ElaborationError> {
	check_distinct(bindings.iter().map(|binding| match binding {
		ClazzBinding::Abstract { name, .. } | ClazzBinding::Fulfilled { name, .. } => name,
	}))?;
	check_clazz_bindings(solution, context, bindings)
}

fn check_clazz_bindings(
	solution: &mut Solution,
	context: &Context,
	bindings: &[ClazzBinding],
) -> Result<Core, ElaborationError> {
	let Some((binding, bindings)) = bindings.split_first() else { return Ok(Core::ClazzNull) };
	match binding {
		ClazzBinding::Abstract { name, property_type } => {
			let property_type =
				check_type(solution, context, property_type).map_err(|error| error.within(Frame::Property(*name)))?;
			let property_type_value = evaluate_core(solution, context, &property_type);
			let (rest_context, local) = bind_fresh(solution, context, *name, property_type_value);
			let rest = check_clazz_bindings(solution, &rest_context, bindings)?;
			Ok(Core::ClazzCons { name: *name, local, property_type: property_type.into(), rest: rest.into() })
		}
		ClazzBinding::Fulfilled { name, property_type, property } => {
			let (property_type, property_type_value, property) = match property_type {
				Some(property_type) => {
					let property_type = check_type(solution, context, property_type)
						.map_err(|error| error.within(Frame::Property(*name)))?;
					let property_type_value = evaluate_core(solution, context, &property_type);
					let property = check(solution, context, property, &property_type_value)
						.map_err(|error| error.within(Frame::Property(*name)))?;
					(property_type, property_type_value, property)
				}
				None => {
					let inferred =
						infer(solution, context, property).map_err(|error| error.within(Frame::Property(*name)))?;
					(readback_type(solution, context, &inferred.ty), inferred.ty, inferred.core)
				}
			};
			let property_value = evaluate_core(solution, context, &property);
			let local = solution.fresh_name(context, *name);
			let rest_context = context.define(*name, local, property_type_value, property_value);
			let rest = check_clazz_bindings(solution, &rest_context, bindings)?;
			Ok(Core::ClazzFulfilled {
				name: *name,
				local,
				property_type: property_type.into(),
				property: property.into(),
				rest: rest.into(),
			})
		}
	}
}

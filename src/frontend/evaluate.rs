use std::rc::Rc;

use crate::{
	common::Name,
	ir::{
		semantics::{Clazz, Closure, Environment, Neutral, TypedValue, Value},
		syntax::Core,
	},
};

pub trait Evaluate {
	/// Transforms a core term into a value.
	fn evaluate_in(&self, environment: &Environment) -> Rc<Value>;
}

impl Evaluate for Core {
	fn evaluate_in(&self, environment: &Environment) -> Rc<Value> {
		use Core as C;
		let closure = |name: &Name, body: &Core| Closure::new(environment.clone(), *name, body.clone());
		match self {
			// Variables.
			C::Var(name) => environment
				.lookup(*name)
				.unwrap_or_else(|| panic!("variable {name:?} is missing from the environment")),

			// Types.
			C::Type => Value::Type.into(),

			// Dependent functions.
			C::Pi { name, arg_type, ret_type } =>
				Value::Pi { arg_type: arg_type.evaluate_in(environment), ret_type: closure(name, ret_type) }.into(),
			C::PiImplicit { name, arg_type, ret_type } =>
				Value::PiImplicit { arg_type: arg_type.evaluate_in(environment), ret_type: closure(name, ret_type) }
					.into(),
			C::Fn { name, arg_type, ret } =>
				Value::Fn { arg_type: arg_type.evaluate_in(environment), ret: closure(name, ret) }.into(),
			C::FnImplicit { name, arg_type, ret } =>
				Value::FnImplicit { arg_type: arg_type.evaluate_in(environment), ret: closure(name, ret) }.into(),
			C::Ap { target, arg } => do_ap(target.evaluate_in(environment), arg.evaluate_in(environment)),
			C::ApImplicit { target, arg } =>
				do_ap_implicit(target.evaluate_in(environment), arg.evaluate_in(environment)),

			// Dependent pairs.
			C::Sigma { name, car_type, cdr_type } =>
				Value::Sigma { car_type: car_type.evaluate_in(environment), cdr_type: closure(name, cdr_type) }.into(),
			C::Cons { car, cdr } => Value::Cons(car.evaluate_in(environment), cdr.evaluate_in(environment)).into(),
			C::Car(target) => do_car(target.evaluate_in(environment)),
			C::Cdr(target) => do_cdr(target.evaluate_in(environment)),

			// Literals.
			C::String => Value::String.into(),
			C::Quote(literal) => Value::Quote(literal.clone()).into(),
			C::Trivial => Value::Trivial.into(),
			C::Sole => Value::Sole.into(),

			// Identity types.
			C::Equal { ty, from, to } => Value::Equal {
				ty: ty.evaluate_in(environment),
				from: from.evaluate_in(environment),
				to: to.evaluate_in(environment),
			}
			.into(),
			C::Same(value) => Value::Same(value.evaluate_in(environment)).into(),

			// Classes and objects.
			C::ClazzNull | C::ClazzCons { .. } | C::ClazzFulfilled { .. } =>
				Value::Clazz(evaluate_clazz(environment, self)).into(),
			C::Objekt(properties) => Value::Objekt(
				properties.iter().map(|(name, property)| (*name, property.evaluate_in(environment))).collect(),
			)
			.into(),
			C::Dot { target, name } => do_dot(target.evaluate_in(environment), *name),

			// Let-expressions.
			C::Let { name, argument, tail, .. } =>
				tail.evaluate_in(&environment.extend(*name, argument.evaluate_in(environment))),
		}
	}
}

fn evaluate_clazz(environment: &Environment, core: &Core) -> Rc<Clazz> {
	match core {
		Core::ClazzNull => Clazz::Null.into(),
		Core::ClazzCons { name, local, property_type, rest } => Clazz::Cons {
			name: *name,
			property_type: property_type.evaluate_in(environment),
			rest: Closure::new(environment.clone(), *local, (**rest).clone()),
		}
		.into(),
		Core::ClazzFulfilled { name, local, property_type, property, rest } => {
			let property = property.evaluate_in(environment);
			Clazz::Fulfilled {
				name: *name,
				property_type: property_type.evaluate_in(environment),
				property: property.clone(),
				rest: evaluate_clazz(&environment.extend(*local, property), rest),
			}
			.into()
		}
		_ => panic!("the rest of a class must be a class"),
	}
}

impl Closure {
	/// Evaluates the body with the bound name set to `value`.
	pub fn apply(&self, value: Rc<Value>) -> Rc<Value> {
		self.body.evaluate_in(&self.environment.extend(self.name, value))
	}

	/// Applies a class closure; its body always evaluates to a class.
	pub fn apply_clazz(&self, value: Rc<Value>) -> Rc<Clazz> {
		match self.apply(value).as_ref() {
			Value::Clazz(clazz) => clazz.clone(),
			_ => panic!("the rest of a class must be a class"),
		}
	}
}

pub fn do_ap(target: Rc<Value>, arg: Rc<Value>) -> Rc<Value> {
	match target.as_ref() {
		Value::Fn { ret, .. } => ret.apply(arg),
		Value::TypedNeutral { ty, neutral } => match ty.as_ref() {
			Value::Pi { arg_type, ret_type } => Value::TypedNeutral {
				ty: ret_type.apply(arg.clone()),
				neutral: Neutral::Ap { target: neutral.clone().into(), arg: TypedValue::new(arg_type.clone(), arg) },
			}
			.into(),
			_ => panic!("applied a neutral whose type is not a function type"),
		},
		_ => panic!("applied a value that is not a function"),
	}
}

pub fn do_ap_implicit(target: Rc<Value>, arg: Rc<Value>) -> Rc<Value> {
	match target.as_ref() {
		Value::FnImplicit { ret, .. } => ret.apply(arg),
		Value::TypedNeutral { ty, neutral } => match ty.as_ref() {
			Value::PiImplicit { arg_type, ret_type } => Value::TypedNeutral {
				ty: ret_type.apply(arg.clone()),
				neutral: Neutral::ApImplicit {
					target: neutral.clone().into(),
					arg: TypedValue::new(arg_type.clone(), arg),
				},
			}
			.into(),
			_ => panic!("implicitly applied a neutral whose type is not an implicit function type"),
		},
		_ => panic!("implicitly applied a value that is not an implicit function"),
	}
}

pub fn do_car(target: Rc<Value>) -> Rc<Value> {
	match target.as_ref() {
		Value::Cons(car, _) => car.clone(),
		Value::TypedNeutral { ty, neutral } => match ty.as_ref() {
			Value::Sigma { car_type, .. } =>
				Value::TypedNeutral { ty: car_type.clone(), neutral: Neutral::Car(neutral.clone().into()) }.into(),
			_ => panic!("projected from a neutral whose type is not a pair type"),
		},
		_ => panic!("projected from a value that is not a pair"),
	}
}

pub fn do_cdr(target: Rc<Value>) -> Rc<Value> {
	match target.as_ref() {
		Value::Cons(_, cdr) => cdr.clone(),
		Value::TypedNeutral { ty, neutral } => match ty.as_ref() {
			Value::Sigma { cdr_type, .. } => Value::TypedNeutral {
				ty: cdr_type.apply(do_car(target.clone())),
				neutral: Neutral::Cdr(neutral.clone().into()),
			}
			.into(),
			_ => panic!("projected from a neutral whose type is not a pair type"),
		},
		_ => panic!("projected from a value that is not a pair"),
	}
}

pub fn do_dot(target: Rc<Value>, name: Name) -> Rc<Value> {
	match target.as_ref() {
		Value::Objekt(properties) => properties
			.iter()
			.find(|(property_name, _)| *property_name == name)
			.map(|(_, property)| property.clone())
			.unwrap_or_else(|| panic!("object has no property {name:?}")),
		Value::TypedNeutral { ty, neutral } => match ty.as_ref() {
			Value::Clazz(clazz) => match lookup_property(clazz, &target, name) {
				// The class fixes the property, whatever the object.
				Some((_, Some(property))) => property,
				Some((ty, None)) =>
					Value::TypedNeutral { ty, neutral: Neutral::Dot { target: neutral.clone().into(), name } }.into(),
				None => panic!("class has no property {name:?}"),
			},
			_ => panic!("accessed a property of a neutral whose type is not a class"),
		},
		_ => panic!("accessed a property of a value that is not an object"),
	}
}

/// Finds the type of property `name` of `target`, a value of class `clazz`.
/// Earlier unfulfilled properties are instantiated with the corresponding properties of `target`.
pub fn lookup_property_type(clazz: &Rc<Clazz>, target: &Rc<Value>, name: Name) -> Option<Rc<Value>> {
	lookup_property(clazz, target, name).map(|(ty, _)| ty)
}

// The type of a property, and its value if the class fulfills it.
fn lookup_property(clazz: &Rc<Clazz>, target: &Rc<Value>, name: Name) -> Option<(Rc<Value>, Option<Rc<Value>>)> {
	let mut clazz = clazz.clone();
	loop {
		clazz = match clazz.as_ref() {
			Clazz::Null => return None,
			Clazz::Cons { name: property_name, property_type, .. } if *property_name == name =>
				return Some((property_type.clone(), None)),
			Clazz::Fulfilled { name: property_name, property_type, property, .. } if *property_name == name =>
				return Some((property_type.clone(), Some(property.clone()))),
			Clazz::Cons { name: property_name, rest, .. } => rest.apply_clazz(do_dot(target.clone(), *property_name)),
			Clazz::Fulfilled { rest, .. } => rest.clone(),
		};
	}
}

/// The property names of a class, in chain order.
pub fn clazz_property_names(clazz: &Rc<Clazz>) -> Vec<Name> {
	let mut names = Vec::new();
	let mut clazz = clazz.clone();
	loop {
		clazz = match clazz.as_ref() {
			Clazz::Null => return names,
			Clazz::Cons { name, property_type, rest } => {
				names.push(*name);
				rest.apply_clazz(Value::variable(property_type.clone(), rest.name).into())
			}
			Clazz::Fulfilled { name, rest, .. } => {
				names.push(*name);
				rest.clone()
			}
		};
	}
}

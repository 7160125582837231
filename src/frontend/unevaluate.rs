use std::{collections::HashSet, rc::Rc};

use crate::{
	common::{freshen, Name},
	frontend::{context::Context, solution::Solution},
	ir::{
		semantics::{Clazz, Closure, Neutral, Value},
		syntax::Core,
	},
};

/// Transforms a value into a core term in normal form, reading through solved pattern variables.
pub fn readback(solution: &Solution, context: &Context, value: &Rc<Value>) -> Core {
	Readback::new(solution, context).value(value)
}

/// Reads back a value of type `Type`.
pub fn readback_type(solution: &Solution, context: &Context, ty: &Rc<Value>) -> Core {
	readback(solution, context, ty)
}

pub fn readback_clazz(solution: &Solution, context: &Context, clazz: &Rc<Clazz>) -> Core {
	Readback::new(solution, context).clazz(clazz)
}

struct Readback<'s> {
	solution: &'s Solution,
	// Names that a binder opened here must avoid.
	used: HashSet<Name>,
}

impl<'s> Readback<'s> {
	fn new(solution: &'s Solution, context: &Context) -> Self { Self { solution, used: solution.used_names(context) } }

	fn fresh(&mut self, name: Name) -> Name {
		let fresh = freshen(&self.used, name);
		self.used.insert(fresh);
		fresh
	}

	// Opens a closure on a fresh variable of type `arg_type`.
	fn closure(&mut self, arg_type: &Rc<Value>, closure: &Closure) -> (Name, Core) {
		let name = self.fresh(closure.name);
		let body = self.value(&closure.apply(Value::variable(arg_type.clone(), name).into()));
		self.used.remove(&name);
		(name, body)
	}

	fn value(&mut self, value: &Rc<Value>) -> Core {
		use Value as V;
		let value = self.solution.advance(value);
		match value.as_ref() {
			V::TypedNeutral { neutral, .. } => self.neutral(neutral),
			V::Type => Core::Type,
			V::Pi { arg_type, ret_type } => {
				let (name, ret_type) = self.closure(arg_type, ret_type);
				Core::Pi { name, arg_type: self.value(arg_type).into(), ret_type: ret_type.into() }
			}
			V::PiImplicit { arg_type, ret_type } => {
				let (name, ret_type) = self.closure(arg_type, ret_type);
				Core::PiImplicit { name, arg_type: self.value(arg_type).into(), ret_type: ret_type.into() }
			}
			V::Fn { arg_type, ret } => {
				let (name, ret) = self.closure(arg_type, ret);
				Core::Fn { name, arg_type: self.value(arg_type).into(), ret: ret.into() }
			}
			V::FnImplicit { arg_type, ret } => {
				let (name, ret) = self.closure(arg_type, ret);
				Core::FnImplicit { name, arg_type: self.value(arg_type).into(), ret: ret.into() }
			}
			V::Sigma { car_type, cdr_type } => {
				let (name, cdr_type) = self.closure(car_type, cdr_type);
				Core::Sigma { name, car_type: self.value(car_type).into(), cdr_type: cdr_type.into() }
			}
			V::Cons(car, cdr) => Core::Cons { car: self.value(car).into(), cdr: self.value(cdr).into() },
			V::String => Core::String,
			V::Quote(literal) => Core::Quote(literal.clone()),
			V::Trivial => Core::Trivial,
			V::Sole => Core::Sole,
			V::Equal { ty, from, to } =>
				Core::Equal { ty: self.value(ty).into(), from: self.value(from).into(), to: self.value(to).into() },
			V::Same(value) => Core::Same(self.value(value).into()),
			V::Clazz(clazz) => self.clazz(clazz),
			V::Objekt(properties) =>
				Core::Objekt(properties.iter().map(|(name, property)| (*name, self.value(property))).collect()),
		}
	}

	fn neutral(&mut self, neutral: &Neutral) -> Core {
		match neutral {
			Neutral::Var(name) => Core::Var(*name),
			Neutral::Ap { target, arg } =>
				Core::Ap { target: self.neutral(target).into(), arg: self.value(&arg.value).into() },
			Neutral::ApImplicit { target, arg } =>
				Core::ApImplicit { target: self.neutral(target).into(), arg: self.value(&arg.value).into() },
			Neutral::Car(target) => Core::Car(self.neutral(target).into()),
			Neutral::Cdr(target) => Core::Cdr(self.neutral(target).into()),
			Neutral::Dot { target, name } => Core::Dot { target: self.neutral(target).into(), name: *name },
		}
	}

	// Locals are freshened from the property label so that they usually print as the label itself.
	fn clazz(&mut self, clazz: &Rc<Clazz>) -> Core {
		match clazz.as_ref() {
			Clazz::Null => Core::ClazzNull,
			Clazz::Cons { name, property_type, rest } => {
				let property_type_core = self.value(property_type);
				let local = self.fresh(*name);
				let rest = self.clazz(&rest.apply_clazz(Value::variable(property_type.clone(), local).into()));
				self.used.remove(&local);
				Core::ClazzCons { name: *name, local, property_type: property_type_core.into(), rest: rest.into() }
			}
			Clazz::Fulfilled { name, property_type, property, rest } => {
				let property_type = self.value(property_type);
				let property = self.value(property);
				let local = self.fresh(*name);
				let rest = self.clazz(rest);
				self.used.remove(&local);
				Core::ClazzFulfilled {
					name: *name,
					local,
					property_type: property_type.into(),
					property: property.into(),
					rest: rest.into(),
				}
			}
		}
	}
}

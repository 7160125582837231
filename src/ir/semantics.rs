use std::rc::Rc;

use super::syntax::Core;
use crate::common::Name;

// The semantic domain (of values).
#[derive(Clone, Debug)]
pub enum Value {
	// Neutrals.
	TypedNeutral { ty: Rc<Self>, neutral: Neutral },

	// Types.
	Type,

	// Dependent functions.
	Pi { arg_type: Rc<Self>, ret_type: Closure },
	PiImplicit { arg_type: Rc<Self>, ret_type: Closure },
	Fn { arg_type: Rc<Self>, ret: Closure },
	FnImplicit { arg_type: Rc<Self>, ret: Closure },

	// Dependent pairs.
	Sigma { car_type: Rc<Self>, cdr_type: Closure },
	Cons(Rc<Self>, Rc<Self>),

	// Literals.
	String,
	Quote(Rc<str>),
	Trivial,
	Sole,

	// Identity types.
	Equal { ty: Rc<Self>, from: Rc<Self>, to: Rc<Self> },
	Same(Rc<Self>),

	// Classes and objects.
	Clazz(Rc<Clazz>),
	Objekt(Vec<(Name, Rc<Self>)>),
}

#[derive(Clone, Debug)]
pub enum Neutral {
	// Variables (pattern variables included).
	Var(Name),

	// Dependent functions.
	Ap { target: Rc<Self>, arg: TypedValue },
	ApImplicit { target: Rc<Self>, arg: TypedValue },

	// Dependent pairs.
	Car(Rc<Self>),
	Cdr(Rc<Self>),

	// Objects.
	Dot { target: Rc<Self>, name: Name },
}

#[derive(Clone, Debug)]
pub struct TypedValue {
	pub ty: Rc<Value>,
	pub value: Rc<Value>,
}

impl TypedValue {
	pub fn new(ty: Rc<Value>, value: Rc<Value>) -> Self { Self { ty, value } }
}

/// A class: an ordered chain of properties, each declared with a type and possibly fulfilled with a value.
#[derive(Clone, Debug)]
pub enum Clazz {
	Null,
	// An unfulfilled property; the rest of the chain is computed from a witness of it.
	Cons { name: Name, property_type: Rc<Value>, rest: Closure },
	Fulfilled { name: Name, property_type: Rc<Value>, property: Rc<Value>, rest: Rc<Clazz> },
}

#[derive(Clone, Debug)]
pub struct Closure {
	pub environment: Environment,
	pub name: Name,
	pub body: Rc<Core>,
}

impl Closure {
	pub fn new(environment: Environment, name: Name, body: impl Into<Rc<Core>>) -> Self {
		Self { environment, name, body: body.into() }
	}
}

#[derive(Clone, Debug, Default)]
pub struct Environment(im::HashMap<Name, Rc<Value>>);

impl Environment {
	pub fn new() -> Self { Self::default() }

	pub fn lookup(&self, name: Name) -> Option<Rc<Value>> { self.0.get(&name).cloned() }

	#[must_use]
	pub fn extend(&self, name: Name, value: Rc<Value>) -> Self { Self(self.0.update(name, value)) }

	pub fn insert(&mut self, name: Name, value: Rc<Value>) { self.0.insert(name, value); }
}

impl Value {
	pub fn variable(ty: Rc<Self>, name: Name) -> Self { Self::TypedNeutral { ty, neutral: Neutral::Var(name) } }

	pub fn as_clazz(&self) -> Option<&Rc<Clazz>> {
		match self {
			Self::Clazz(clazz) => Some(clazz),
			_ => None,
		}
	}

	/// The name of the value's shape, for diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::TypedNeutral { .. } => "TypedNeutral",
			Self::Type => "Type",
			Self::Pi { .. } => "Pi",
			Self::PiImplicit { .. } => "PiImplicit",
			Self::Fn { .. } => "Fn",
			Self::FnImplicit { .. } => "FnImplicit",
			Self::Sigma { .. } => "Sigma",
			Self::Cons(..) => "Cons",
			Self::String => "String",
			Self::Quote(_) => "Quote",
			Self::Trivial => "Trivial",
			Self::Sole => "Sole",
			Self::Equal { .. } => "Equal",
			Self::Same(_) => "Same",
			Self::Clazz(_) => "Clazz",
			Self::Objekt(_) => "Objekt",
		}
	}
}

impl Neutral {
	/// The variable at the head of an elimination spine.
	pub fn head(&self) -> Name {
		match self {
			Self::Var(name) => *name,
			Self::Ap { target, .. }
			| Self::ApImplicit { target, .. }
			| Self::Car(target)
			| Self::Cdr(target)
			| Self::Dot { target, .. } => target.head(),
		}
	}

	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Var(_) => "Var",
			Self::Ap { .. } => "Ap",
			Self::ApImplicit { .. } => "ApImplicit",
			Self::Car(_) => "Car",
			Self::Cdr(_) => "Cdr",
			Self::Dot { .. } => "Dot",
		}
	}
}

impl From<Clazz> for Value {
	fn from(clazz: Clazz) -> Self { Self::Clazz(clazz.into()) }
}

use std::rc::Rc;

use crate::common::Name;

#[derive(Debug, Clone)]
pub struct Expression {
	pub range: (usize, usize),
	pub preterm: Preterm,
}

impl Expression {
	pub fn new(preterm: Preterm, range: (usize, usize)) -> Self { Self { range, preterm } }
}

#[derive(Debug, Clone)]
pub enum Preterm {
	Var(Name),

	Type,

	Pi { name: Name, arg_type: Box<Expression>, ret_type: Box<Expression> },
	PiImplicit { name: Name, arg_type: Box<Expression>, ret_type: Box<Expression> },
	Fn { name: Name, arg_type: Option<Box<Expression>>, ret: Box<Expression> },
	FnImplicit { name: Name, arg_type: Option<Box<Expression>>, ret: Box<Expression> },
	Ap { target: Box<Expression>, arg: Box<Expression> },
	ApImplicit { target: Box<Expression>, arg: Box<Expression> },

	Sigma { name: Name, car_type: Box<Expression>, cdr_type: Box<Expression> },
	Cons { car: Box<Expression>, cdr: Box<Expression> },
	Car(Box<Expression>),
	Cdr(Box<Expression>),

	String,
	Quote(Rc<str>),
	Trivial,
	Sole,

	Equal { ty: Box<Expression>, from: Box<Expression>, to: Box<Expression> },
	Same(Box<Expression>),

	Clazz(Vec<ClazzBinding>),
	Objekt(Vec<(Name, Expression)>),
	Dot { target: Box<Expression>, name: Name },
	New { clazz: Box<Expression>, properties: Vec<(Name, Expression)> },
	NewAp { clazz: Box<Expression>, args: Vec<Expression> },

	// A type annotation.
	The { ty: Box<Expression>, value: Box<Expression> },

	// A local definition, visible in `tail`.
	Let { name: Name, ty: Option<Box<Expression>>, argument: Box<Expression>, tail: Box<Expression> },
}

#[derive(Debug, Clone)]
pub enum ClazzBinding {
	Abstract { name: Name, property_type: Expression },
	Fulfilled { name: Name, property_type: Option<Expression>, property: Expression },
}

impl ClazzBinding {
	pub fn name(&self) -> Name {
		match self {
			Self::Abstract { name, .. } | Self::Fulfilled { name, .. } => *name,
		}
	}
}

#[derive(Debug, Clone)]
pub enum PiBinding {
	Named { name: Name, ty: Expression },
	Nameless(Expression),
	Implicit { name: Name, ty: Expression },
}

#[derive(Debug, Clone)]
pub enum SigmaBinding {
	Named { name: Name, ty: Expression },
	Nameless(Expression),
}

#[derive(Debug, Clone)]
pub enum FnBinding {
	Named { name: Name, ty: Option<Expression> },
	Implicit { name: Name, ty: Option<Expression> },
}

#[derive(Debug, Clone)]
pub enum ApArg {
	Plain(Expression),
	Implicit(Expression),
}

#[derive(Debug, Clone)]
pub enum SequenceBinding {
	Let { name: Name, ty: Option<Expression>, argument: Expression },
	Check { expr: Expression, ty: Expression },
}

#[derive(Debug, Clone)]
pub enum Equation {
	Typed { ty: Expression, left: Expression, right: Expression },
	Untyped { left: Expression, right: Expression },
}

#[derive(Debug, Clone)]
pub enum Stmt {
	Let { name: Name, ty: Option<Expression>, expr: Expression },
	Check { expr: Expression, ty: Expression },
	Compute(Expression),
	Solve { bindings: Vec<(Name, Expression)>, equations: Vec<Equation> },
}

// The folders below desugar multi-binder syntax into nested single-binder preterms.
// Each nested node spans the whole sugared expression.

/// `(x: A, implicit y: B, C) -> D` becomes nested `Pi`/`PiImplicit` nodes; `anonymous` names nameless binders.
pub fn fold_pi(bindings: Vec<PiBinding>, ret_type: Expression, range: (usize, usize), anonymous: Name) -> Expression {
	bindings.into_iter().rev().fold(ret_type, |ret_type, binding| {
		let preterm = match binding {
			PiBinding::Named { name, ty } =>
				Preterm::Pi { name, arg_type: ty.into(), ret_type: ret_type.into() },
			PiBinding::Nameless(ty) => Preterm::Pi { name: anonymous, arg_type: ty.into(), ret_type: ret_type.into() },
			PiBinding::Implicit { name, ty } =>
				Preterm::PiImplicit { name, arg_type: ty.into(), ret_type: ret_type.into() },
		};
		Expression::new(preterm, range)
	})
}

pub fn fold_sigma(
	bindings: Vec<SigmaBinding>,
	cdr_type: Expression,
	range: (usize, usize),
	anonymous: Name,
) -> Expression {
	bindings.into_iter().rev().fold(cdr_type, |cdr_type, binding| {
		let (name, car_type) = match binding {
			SigmaBinding::Named { name, ty } => (name, ty),
			SigmaBinding::Nameless(ty) => (anonymous, ty),
		};
		Expression::new(Preterm::Sigma { name, car_type: car_type.into(), cdr_type: cdr_type.into() }, range)
	})
}

pub fn fold_fn(bindings: Vec<FnBinding>, ret: Expression, range: (usize, usize)) -> Expression {
	bindings.into_iter().rev().fold(ret, |ret, binding| {
		let preterm = match binding {
			FnBinding::Named { name, ty } => Preterm::Fn { name, arg_type: ty.map(Box::new), ret: ret.into() },
			FnBinding::Implicit { name, ty } =>
				Preterm::FnImplicit { name, arg_type: ty.map(Box::new), ret: ret.into() },
		};
		Expression::new(preterm, range)
	})
}

/// `(x: A, y: B): C => d` checks the body against the return type.
pub fn fold_fn_with_ret_type(
	bindings: Vec<FnBinding>,
	ret_type: Expression,
	ret: Expression,
	range: (usize, usize),
) -> Expression {
	let ret_range = (ret_type.range.0, ret.range.1);
	let ret = Expression::new(Preterm::The { ty: ret_type.into(), value: ret.into() }, ret_range);
	fold_fn(bindings, ret, range)
}

/// `{ let x = a  check b: B  return c }` becomes nested `Let` nodes; a check is a definition named `anonymous`.
pub fn fold_sequence(
	bindings: Vec<SequenceBinding>,
	ret: Expression,
	range: (usize, usize),
	anonymous: Name,
) -> Expression {
	bindings.into_iter().rev().fold(ret, |tail, binding| {
		let (name, ty, argument) = match binding {
			SequenceBinding::Let { name, ty, argument } => (name, ty, argument),
			SequenceBinding::Check { expr, ty } => (anonymous, Some(ty), expr),
		};
		Expression::new(
			Preterm::Let { name, ty: ty.map(Box::new), argument: argument.into(), tail: tail.into() },
			range,
		)
	})
}

/// `f(implicit a, b, c)` becomes `ApImplicit` then `Ap` nodes, applied left to right.
pub fn fold_ap(target: Expression, args: Vec<ApArg>, range: (usize, usize)) -> Expression {
	args.into_iter().fold(target, |target, arg| {
		let preterm = match arg {
			ApArg::Plain(arg) => Preterm::Ap { target: target.into(), arg: arg.into() },
			ApArg::Implicit(arg) => Preterm::ApImplicit { target: target.into(), arg: arg.into() },
		};
		Expression::new(preterm, range)
	})
}

/// Collects class bindings, rejecting the first repeated property name.
pub fn fold_clazz(bindings: Vec<ClazzBinding>, range: (usize, usize)) -> Result<Expression, Name> {
	let mut names = Vec::with_capacity(bindings.len());
	for binding in &bindings {
		let name = binding.name();
		if names.contains(&name) {
			return Err(name);
		}
		names.push(name);
	}
	Ok(Expression::new(Preterm::Clazz(bindings), range))
}

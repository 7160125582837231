use std::{collections::HashSet, rc::Rc};

use crate::common::Name;

// The core syntax: the output of the elaborator.
#[derive(Clone, Debug)]
pub enum Core {
	// Variables.
	Var(Name),

	// Types.
	Type,

	// Dependent functions.
	Pi { name: Name, arg_type: Box<Self>, ret_type: Box<Self> },
	PiImplicit { name: Name, arg_type: Box<Self>, ret_type: Box<Self> },
	Fn { name: Name, arg_type: Box<Self>, ret: Box<Self> },
	FnImplicit { name: Name, arg_type: Box<Self>, ret: Box<Self> },
	Ap { target: Box<Self>, arg: Box<Self> },
	ApImplicit { target: Box<Self>, arg: Box<Self> },

	// Dependent pairs.
	Sigma { name: Name, car_type: Box<Self>, cdr_type: Box<Self> },
	Cons { car: Box<Self>, cdr: Box<Self> },
	Car(Box<Self>),
	Cdr(Box<Self>),

	// Literals.
	String,
	Quote(Rc<str>),
	Trivial,
	Sole,

	// Identity types.
	Equal { ty: Box<Self>, from: Box<Self>, to: Box<Self> },
	Same(Box<Self>),

	// Classes and objects.
	// NOTE: `name` is the property label, `local` is the binder visible in the rest of the chain.
	ClazzNull,
	ClazzCons { name: Name, local: Name, property_type: Box<Self>, rest: Box<Self> },
	ClazzFulfilled { name: Name, local: Name, property_type: Box<Self>, property: Box<Self>, rest: Box<Self> },
	Objekt(Vec<(Name, Self)>),
	Dot { target: Box<Self>, name: Name },

	// Let-expressions.
	Let { name: Name, ty: Box<Self>, argument: Box<Self>, tail: Box<Self> },
}

impl Core {
	/// Collects the names occurring free in a term.
	pub fn free_names(&self) -> HashSet<Name> {
		let mut names = HashSet::new();
		self.collect_free_names(&mut Vec::new(), &mut names);
		names
	}

	fn collect_free_names(&self, bound: &mut Vec<Name>, names: &mut HashSet<Name>) {
		use Core::*;
		match self {
			Var(name) =>
				if !bound.contains(name) {
					names.insert(*name);
				},
			Type | String | Quote(_) | Trivial | Sole | ClazzNull => {}
			Pi { name, arg_type, ret_type: body }
			| PiImplicit { name, arg_type, ret_type: body }
			| Fn { name, arg_type, ret: body }
			| FnImplicit { name, arg_type, ret: body } => {
				arg_type.collect_free_names(bound, names);
				collect_under(*name, body, bound, names);
			}
			Sigma { name, car_type, cdr_type } => {
				car_type.collect_free_names(bound, names);
				collect_under(*name, cdr_type, bound, names);
			}
			Ap { target, arg } | ApImplicit { target, arg } => {
				target.collect_free_names(bound, names);
				arg.collect_free_names(bound, names);
			}
			Cons { car, cdr } => {
				car.collect_free_names(bound, names);
				cdr.collect_free_names(bound, names);
			}
			Car(target) | Cdr(target) | Same(target) | Dot { target, .. } => target.collect_free_names(bound, names),
			Equal { ty, from, to } => {
				ty.collect_free_names(bound, names);
				from.collect_free_names(bound, names);
				to.collect_free_names(bound, names);
			}
			ClazzCons { local, property_type, rest, .. } => {
				property_type.collect_free_names(bound, names);
				collect_under(*local, rest, bound, names);
			}
			ClazzFulfilled { local, property_type, property, rest, .. } => {
				property_type.collect_free_names(bound, names);
				property.collect_free_names(bound, names);
				collect_under(*local, rest, bound, names);
			}
			Objekt(properties) =>
				for (_, property) in properties {
					property.collect_free_names(bound, names);
				},
			Let { name, ty, argument, tail } => {
				ty.collect_free_names(bound, names);
				argument.collect_free_names(bound, names);
				collect_under(*name, tail, bound, names);
			}
		}
	}
}

fn collect_under(name: Name, body: &Core, bound: &mut Vec<Name>, names: &mut HashSet<Name>) {
	bound.push(name);
	body.collect_free_names(bound, names);
	bound.pop();
}

/// Decides whether two terms are equal up to the renaming of bound variables.
pub fn alpha_equivalent(left: &Core, right: &Core) -> bool { AlphaScope::default().equivalent(left, right) }

// Bound names on both sides, paired by binding depth.
#[derive(Default)]
struct AlphaScope {
	left: Vec<Name>,
	right: Vec<Name>,
}

impl AlphaScope {
	fn depth(names: &[Name], name: Name) -> Option<usize> { names.iter().rposition(|bound| *bound == name) }

	fn under(&mut self, left_name: Name, right_name: Name, left: &Core, right: &Core) -> bool {
		self.left.push(left_name);
		self.right.push(right_name);
		let result = self.equivalent(left, right);
		self.left.pop();
		self.right.pop();
		result
	}

	fn equivalent(&mut self, left: &Core, right: &Core) -> bool {
		use Core::*;
		match (left, right) {
			(Var(l), Var(r)) => match (Self::depth(&self.left, *l), Self::depth(&self.right, *r)) {
				(Some(l), Some(r)) => l == r,
				(None, None) => l == r,
				_ => false,
			},
			(Type, Type) | (String, String) | (Trivial, Trivial) | (Sole, Sole) | (ClazzNull, ClazzNull) => true,
			(Quote(l), Quote(r)) => l == r,
			(
				Pi { name: ln, arg_type: la, ret_type: lr },
				Pi { name: rn, arg_type: ra, ret_type: rr },
			)
			| (
				PiImplicit { name: ln, arg_type: la, ret_type: lr },
				PiImplicit { name: rn, arg_type: ra, ret_type: rr },
			)
			| (
				Sigma { name: ln, car_type: la, cdr_type: lr },
				Sigma { name: rn, car_type: ra, cdr_type: rr },
			)
			| (Fn { name: ln, arg_type: la, ret: lr }, Fn { name: rn, arg_type: ra, ret: rr })
			| (FnImplicit { name: ln, arg_type: la, ret: lr }, FnImplicit { name: rn, arg_type: ra, ret: rr }) =>
				self.equivalent(la, ra) && self.under(*ln, *rn, lr, rr),
			(Ap { target: lt, arg: la }, Ap { target: rt, arg: ra })
			| (ApImplicit { target: lt, arg: la }, ApImplicit { target: rt, arg: ra })
			| (Cons { car: lt, cdr: la }, Cons { car: rt, cdr: ra }) =>
				self.equivalent(lt, rt) && self.equivalent(la, ra),
			(Car(l), Car(r)) | (Cdr(l), Cdr(r)) | (Same(l), Same(r)) => self.equivalent(l, r),
			(Equal { ty: lt, from: lf, to: lo }, Equal { ty: rt, from: rf, to: ro }) =>
				self.equivalent(lt, rt) && self.equivalent(lf, rf) && self.equivalent(lo, ro),
			(
				ClazzCons { name: ln, local: ll, property_type: lt, rest: lr },
				ClazzCons { name: rn, local: rl, property_type: rt, rest: rr },
			) => ln == rn && self.equivalent(lt, rt) && self.under(*ll, *rl, lr, rr),
			(
				ClazzFulfilled { name: ln, local: ll, property_type: lt, property: lp, rest: lr },
				ClazzFulfilled { name: rn, local: rl, property_type: rt, property: rp, rest: rr },
			) => ln == rn && self.equivalent(lt, rt) && self.equivalent(lp, rp) && self.under(*ll, *rl, lr, rr),
			(Objekt(l), Objekt(r)) =>
				l.len() == r.len()
					&& l.iter().zip(r.iter()).all(|((ln, lp), (rn, rp))| ln == rn && self.equivalent(lp, rp)),
			(Dot { target: lt, name: ln }, Dot { target: rt, name: rn }) => ln == rn && self.equivalent(lt, rt),
			(
				Let { name: ln, ty: lt, argument: la, tail: lr },
				Let { name: rn, ty: rt, argument: ra, tail: rr },
			) => self.equivalent(lt, rt) && self.equivalent(la, ra) && self.under(*ln, *rn, lr, rr),
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use lasso::Rodeo;

	use super::*;

	#[test]
	fn alpha_equivalence_ignores_binder_names() {
		let mut interner = Rodeo::new();
		let x = Name::new(interner.get_or_intern("x"));
		let y = Name::new(interner.get_or_intern("y"));
		let left = Core::Fn { name: x, arg_type: Box::new(Core::String), ret: Box::new(Core::Var(x)) };
		let right = Core::Fn { name: y, arg_type: Box::new(Core::String), ret: Box::new(Core::Var(y)) };
		assert!(alpha_equivalent(&left, &right));
	}

	#[test]
	fn alpha_equivalence_respects_free_names() {
		let mut interner = Rodeo::new();
		let x = Name::new(interner.get_or_intern("x"));
		let y = Name::new(interner.get_or_intern("y"));
		let left = Core::Fn { name: x, arg_type: Box::new(Core::Type), ret: Box::new(Core::Var(y)) };
		let right = Core::Fn { name: y, arg_type: Box::new(Core::Type), ret: Box::new(Core::Var(y)) };
		assert!(!alpha_equivalent(&left, &right));
		assert_eq!(left.free_names(), HashSet::from([y]));
		assert!(right.free_names().is_empty());
	}
}

use std::{collections::HashSet, rc::Rc};

use crate::{
	common::{freshen, Name},
	frontend::{
		context::Context,
		error::{ElaborationError, ErrorKind, InternalError},
		evaluate::{do_ap, do_ap_implicit, do_car, do_cdr, do_dot, lookup_property_type, Evaluate as _},
		unevaluate::{readback, readback_type},
	},
	ir::{
		semantics::{Clazz, Environment, Neutral, TypedValue, Value},
		syntax::{alpha_equivalent, Core},
	},
};

#[derive(Clone, Debug)]
pub enum PatternVar {
	/// `scope` holds the context names visible where the variable was created.
	Unsolved { ty: Rc<Value>, scope: im::HashSet<Name> },
	Solved { ty: Rc<Value>, value: Rc<Value> },
}

impl PatternVar {
	pub fn ty(&self) -> &Rc<Value> {
		match self {
			Self::Unsolved { ty, .. } | Self::Solved { ty, .. } => ty,
		}
	}
}

/// The pattern variables of a module, with the solutions found for them so far.
/// Cloning is cheap; clones evolve independently.
#[derive(Clone, Debug, Default)]
pub struct Solution {
	entries: im::HashMap<Name, PatternVar>,
	names: im::HashSet<Name>,
}

// A pattern variable applied to a spine of eliminations.
struct PatternSpine {
	head: Name,
	args: Vec<(bool, TypedValue)>,
}

impl Solution {
	pub fn new() -> Self { Self::default() }

	/// Every name this solution has handed out.
	pub fn names(&self) -> &im::HashSet<Name> { &self.names }

	pub fn used_names(&self, context: &Context) -> HashSet<Name> {
		let mut used = context.names();
		used.extend(self.names.iter().copied());
		used
	}

	/// Picks a name unused by both `context` and this solution.
	/// The caller binds it in an extension of `context` (or reserves it) before picking another.
	pub fn fresh_name(&self, context: &Context, name: Name) -> Name { freshen(&self.used_names(context), name) }

	pub fn reserve(&mut self, names: impl IntoIterator<Item = Name>) { self.names.extend(names); }

	pub fn create_pattern_var(&mut self, name: Name, ty: Rc<Value>, scope: HashSet<Name>) -> Rc<Value> {
		log::trace!("created pattern variable {name:?}");
		self.names.insert(name);
		self.entries.insert(name, PatternVar::Unsolved { ty: ty.clone(), scope: scope.into_iter().collect() });
		Value::variable(ty, name).into()
	}

	pub fn is_pattern_var(&self, name: Name) -> bool { self.entries.contains_key(&name) }

	pub fn is_unsolved(&self, name: Name) -> bool {
		matches!(self.entries.get(&name), Some(PatternVar::Unsolved { .. }))
	}

	pub fn lookup(&self, name: Name) -> Option<&PatternVar> { self.entries.get(&name) }

	pub fn bind(&mut self, name: Name, value: Rc<Value>) {
		if let Some(entry) = self.entries.get_mut(&name) {
			*entry = PatternVar::Solved { ty: entry.ty().clone(), value };
		}
	}

	/// Whether `value` is a neutral headed by an unsolved pattern variable.
	pub fn is_pattern_headed(&self, value: &Value) -> bool {
		matches!(value, Value::TypedNeutral { neutral, .. } if self.is_unsolved(neutral.head()))
	}

	/// Unsolved pattern variables occurring free in `core`.
	pub fn unsolved_names(&self, core: &Core) -> Vec<Name> {
		let mut names: Vec<_> = core.free_names().into_iter().filter(|name| self.is_unsolved(*name)).collect();
		names.sort();
		names
	}

	/// Replaces a neutral headed by a solved pattern variable with its solution, repeatedly.
	pub fn advance(&self, value: &Rc<Value>) -> Rc<Value> {
		let mut value = value.clone();
		while let Value::TypedNeutral { neutral, .. } = value.as_ref() {
			match self.advance_neutral(neutral) {
				Some(next) => value = next,
				None => break,
			}
		}
		value
	}

	fn advance_neutral(&self, neutral: &Neutral) -> Option<Rc<Value>> {
		match neutral {
			Neutral::Var(name) => match self.entries.get(name) {
				Some(PatternVar::Solved { value, .. }) => Some(value.clone()),
				_ => None,
			},
			Neutral::Ap { target, arg } => Some(do_ap(self.advance_neutral(target)?, arg.value.clone())),
			Neutral::ApImplicit { target, arg } =>
				Some(do_ap_implicit(self.advance_neutral(target)?, arg.value.clone())),
			Neutral::Car(target) => Some(do_car(self.advance_neutral(target)?)),
			Neutral::Cdr(target) => Some(do_cdr(self.advance_neutral(target)?)),
			Neutral::Dot { target, name } => Some(do_dot(self.advance_neutral(target)?, *name)),
		}
	}

	/// Binds every pattern variable to its solution, or to its own neutral if unsolved.
	pub fn enrich_env(&self, mut environment: Environment) -> Environment {
		for (name, entry) in &self.entries {
			let value = match entry {
				PatternVar::Solved { value, .. } => value.clone(),
				PatternVar::Unsolved { ty, .. } => Value::variable(ty.clone(), *name).into(),
			};
			environment.insert(*name, value);
		}
		environment
	}

	pub fn environment(&self, context: &Context) -> Environment { self.enrich_env(context.to_environment()) }

	fn pattern_spine(&self, value: &Value) -> Option<PatternSpine> {
		let Value::TypedNeutral { neutral, .. } = value else { return None };
		let mut args = Vec::new();
		let mut neutral = neutral;
		loop {
			neutral = match neutral {
				Neutral::Var(head) if self.is_unsolved(*head) => {
					args.reverse();
					return Some(PatternSpine { head: *head, args });
				}
				Neutral::Ap { target, arg } => {
					args.push((false, arg.clone()));
					target
				}
				Neutral::ApImplicit { target, arg } => {
					args.push((true, arg.clone()));
					target
				}
				_ => return None,
			};
		}
	}

	/// Unifies `left` and `right` at type `ty`, solving pattern variables along the way.
	pub fn solve(
		&mut self,
		context: &Context,
		ty: &Rc<Value>,
		left: &Rc<Value>,
		right: &Rc<Value>,
	) -> Result<(), ElaborationError> {
		let ty = self.advance(ty);
		let left = self.advance(left);
		let right = self.advance(right);

		match (self.pattern_spine(&left), self.pattern_spine(&right)) {
			(Some(l), Some(r)) if l.head == r.head && self.same_spine(context, &l, &r) => return Ok(()),
			(Some(spine), _) => return self.solve_pattern(context, spine, &right),
			(_, Some(spine)) => return self.solve_pattern(context, spine, &left),
			(None, None) => {}
		}

		use Value::*;
		match (left.as_ref(), right.as_ref()) {
			(Type, Type) | (String, String) | (Trivial, Trivial) | (Sole, Sole) => Ok(()),
			(Quote(l), Quote(r)) if l == r => Ok(()),
			(Pi { arg_type: la, ret_type: lr }, Pi { arg_type: ra, ret_type: rr })
			| (PiImplicit { arg_type: la, ret_type: lr }, PiImplicit { arg_type: ra, ret_type: rr })
			| (Sigma { car_type: la, cdr_type: lr }, Sigma { car_type: ra, cdr_type: rr }) => {
				self.solve(context, &Type.into(), la, ra)?;
				let (context, variable) = self.witness(context, lr.name, la);
				self.solve(&context, &Type.into(), &lr.apply(variable.clone()), &rr.apply(variable))
			}
			(Fn { arg_type, ret: l }, Fn { ret: r, .. }) | (FnImplicit { arg_type, ret: l }, FnImplicit { ret: r, .. }) => {
				let (context, variable) = self.witness(context, l.name, arg_type);
				let ret_type = self.ret_type(&ty, &variable);
				self.solve(&context, &ret_type, &l.apply(variable.clone()), &r.apply(variable))
			}
			(Fn { arg_type, ret }, neutral @ TypedNeutral { .. }) | (neutral @ TypedNeutral { .. }, Fn { arg_type, ret })
				if self.is_function_neutral(neutral) =>
			{
				let (context, variable) = self.witness(context, ret.name, arg_type);
				let ret_type = self.ret_type(&ty, &variable);
				let (l, r) = if matches!(left.as_ref(), Fn { .. }) {
					(ret.apply(variable.clone()), do_ap(right.clone(), variable))
				} else {
					(do_ap(left.clone(), variable.clone()), ret.apply(variable))
				};
				self.solve(&context, &ret_type, &l, &r)
			}
			(Cons(lcar, lcdr), Cons(rcar, rcdr)) => match ty.as_ref() {
				Sigma { car_type, cdr_type } => {
					self.solve(context, car_type, lcar, rcar)?;
					self.solve(context, &cdr_type.apply(lcar.clone()), lcdr, rcdr)
				}
				_ => Err(self.failure(context, &left, &right)),
			},
			(Equal { ty: lt, from: lf, to: lo }, Equal { ty: rt, from: rf, to: ro }) => {
				self.solve(context, &Type.into(), lt, rt)?;
				self.solve(context, lt, lf, rf)?;
				self.solve(context, lt, lo, ro)
			}
			(Same(l), Same(r)) => match ty.as_ref() {
				Equal { ty, .. } => self.solve(context, ty, l, r),
				_ => Err(self.failure(context, &left, &right)),
			},
			(Clazz(l), Clazz(r)) =>
				if self.solve_clazz(context, l, r)? {
					Ok(())
				} else {
					Err(self.failure(context, &left, &right))
				},
			(Objekt(l), Objekt(r)) => {
				if l.len() != r.len() {
					return Err(self.failure(context, &left, &right));
				}
				for (name, l_property) in l {
					let Some((_, r_property)) = r.iter().find(|(r_name, _)| r_name == name) else {
						return Err(self.failure(context, &left, &right));
					};
					match ty.as_clazz().and_then(|clazz| lookup_property_type(clazz, &left, *name)) {
						Some(property_type) => self.solve(context, &property_type, l_property, r_property)?,
						None =>
							if !alpha_equivalent(
								&readback(self, context, l_property),
								&readback(self, context, r_property),
							) {
								return Err(self.failure(context, &left, &right));
							},
					}
				}
				Ok(())
			}
			(TypedNeutral { neutral: l, .. }, TypedNeutral { neutral: r, .. }) =>
				if self.solve_neutral(context, l, r)? {
					Ok(())
				} else {
					Err(self.failure(context, &left, &right))
				},
			_ => Err(self.failure(context, &left, &right)),
		}
	}

	// Ok(false) reports a mismatch of spine shapes; the caller names both sides.
	fn solve_neutral(&mut self, context: &Context, left: &Neutral, right: &Neutral) -> Result<bool, ElaborationError> {
		match (left, right) {
			(Neutral::Var(l), Neutral::Var(r)) => Ok(l == r),
			(Neutral::Ap { target: lt, arg: la }, Neutral::Ap { target: rt, arg: ra })
			| (Neutral::ApImplicit { target: lt, arg: la }, Neutral::ApImplicit { target: rt, arg: ra }) => {
				if !self.solve_neutral(context, lt, rt)? {
					return Ok(false);
				}
				self.solve(context, &la.ty, &la.value, &ra.value)?;
				Ok(true)
			}
			(Neutral::Car(l), Neutral::Car(r)) | (Neutral::Cdr(l), Neutral::Cdr(r)) => self.solve_neutral(context, l, r),
			(Neutral::Dot { target: l, name: ln }, Neutral::Dot { target: r, name: rn }) if ln == rn =>
				self.solve_neutral(context, l, r),
			_ => Ok(false),
		}
	}

	fn solve_clazz(
		&mut self,
		context: &Context,
		left: &Rc<Clazz>,
		right: &Rc<Clazz>,
	) -> Result<bool, ElaborationError> {
		let type_value: Rc<Value> = Value::Type.into();
		match (left.as_ref(), right.as_ref()) {
			(Clazz::Null, Clazz::Null) => Ok(true),
			(
				Clazz::Cons { name: ln, property_type: lt, rest: lr },
				Clazz::Cons { name: rn, property_type: rt, rest: rr },
			) if ln == rn => {
				self.solve(context, &type_value, lt, rt)?;
				let (context, variable) = self.witness(context, lr.name, lt);
				self.solve_clazz(&context, &lr.apply_clazz(variable.clone()), &rr.apply_clazz(variable))
			}
			(
				Clazz::Fulfilled { name: ln, property_type: lt, property: lp, rest: lr },
				Clazz::Fulfilled { name: rn, property_type: rt, property: rp, rest: rr },
			) if ln == rn => {
				self.solve(context, &type_value, lt, rt)?;
				self.solve(context, lt, lp, rp)?;
				self.solve_clazz(context, lr, rr)
			}
			_ => Ok(false),
		}
	}

	// A fresh abstract variable of type `ty`, bound in an extension of `context`.
	fn witness(&mut self, context: &Context, name: Name, ty: &Rc<Value>) -> (Context, Rc<Value>) {
		let fresh = self.fresh_name(context, name);
		(context.bind(fresh, fresh, ty.clone()), Value::variable(ty.clone(), fresh).into())
	}

	fn is_function_neutral(&self, value: &Value) -> bool {
		match value {
			Value::TypedNeutral { ty, .. } => matches!(self.advance(ty).as_ref(), Value::Pi { .. }),
			_ => false,
		}
	}

	fn ret_type(&self, ty: &Rc<Value>, variable: &Rc<Value>) -> Rc<Value> {
		match ty.as_ref() {
			Value::Pi { ret_type, .. } | Value::PiImplicit { ret_type, .. } => ret_type.apply(variable.clone()),
			_ => Value::Type.into(),
		}
	}

	fn same_spine(&self, context: &Context, left: &PatternSpine, right: &PatternSpine) -> bool {
		left.args.len() == right.args.len()
			&& left.args.iter().zip(&right.args).all(|((li, l), (ri, r))| {
				li == ri && alpha_equivalent(&readback(self, context, &l.value), &readback(self, context, &r.value))
			})
	}

	// Solves a Miller pattern: the head applied to distinct abstract variables.
	fn solve_pattern(
		&mut self,
		context: &Context,
		spine: PatternSpine,
		other: &Rc<Value>,
	) -> Result<(), ElaborationError> {
		let head = spine.head;
		let mut spine_names = Vec::with_capacity(spine.args.len());
		for (_, arg) in &spine.args {
			match self.advance(&arg.value).as_ref() {
				Value::TypedNeutral { neutral: Neutral::Var(name), .. }
					if context.is_abstract(*name) && !self.is_pattern_var(*name) && !spine_names.contains(name) =>
					spine_names.push(*name),
				_ => return Err(ErrorKind::NonPatternSpine(head).into()),
			}
		}

		let body = readback(self, context, other);
		let scope = match self.entries.get(&head) {
			Some(PatternVar::Unsolved { scope, .. }) => scope.clone(),
			_ => return Err(InternalError(format!("pattern variable {head:?} is not unsolved")).into()),
		};
		for name in body.free_names() {
			if name == head {
				return Err(ErrorKind::OccursCheck(head).into());
			}
			if !spine_names.contains(&name) && !scope.contains(&name) && !self.is_pattern_var(name) {
				return Err(ErrorKind::ScopeEscape { pattern_var: head, name }.into());
			}
		}

		let core = spine.args.iter().zip(&spine_names).rev().fold(body, |body, ((is_implicit, arg), name)| {
			let arg_type = readback_type(self, context, &arg.ty).into();
			if *is_implicit {
				Core::FnImplicit { name: *name, arg_type, ret: body.into() }
			} else {
				Core::Fn { name: *name, arg_type, ret: body.into() }
			}
		});
		let value = core.evaluate_in(&self.environment(context));
		log::debug!("solved pattern variable {head:?}");
		self.bind(head, value);
		Ok(())
	}

	fn failure(&self, context: &Context, left: &Rc<Value>, right: &Rc<Value>) -> ElaborationError {
		ErrorKind::UnificationFailure { left: readback(self, context, left), right: readback(self, context, right) }
			.into()
	}
}

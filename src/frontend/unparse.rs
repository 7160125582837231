use std::fmt::{self, Write};

use lasso::Resolver;

use crate::{common::Name, ir::syntax::Core};

/// Prints a core term in surface syntax.
pub fn pretty_print(core: &Core, interner: &impl Resolver) -> String {
	let mut string = String::new();
	let _ = Printer { interner }.print(core, &mut string);
	string
}

struct Printer<'r, R> {
	interner: &'r R,
}

impl<R: Resolver> Printer<'_, R> {
	fn name(&self, name: Name) -> String { name.resolve(self.interner) }

	fn print(&self, core: &Core, f: &mut impl Write) -> fmt::Result {
		match core {
			Core::Pi { name, arg_type, ret_type } =>
				if ret_type.free_names().contains(name) {
					write!(f, "({}: ", self.name(*name))?;
					self.print(arg_type, f)?;
					write!(f, ") -> ")?;
					self.print(ret_type, f)
				} else {
					self.print_operand(arg_type, f)?;
					write!(f, " -> ")?;
					self.print(ret_type, f)
				},
			Core::PiImplicit { name, arg_type, ret_type } => {
				write!(f, "(implicit {}: ", self.name(*name))?;
				self.print(arg_type, f)?;
				write!(f, ") -> ")?;
				self.print(ret_type, f)
			}
			Core::Fn { name, arg_type, ret } => {
				write!(f, "({}: ", self.name(*name))?;
				self.print(arg_type, f)?;
				write!(f, ") => ")?;
				self.print(ret, f)
			}
			Core::FnImplicit { name, arg_type, ret } => {
				write!(f, "(implicit {}: ", self.name(*name))?;
				self.print(arg_type, f)?;
				write!(f, ") => ")?;
				self.print(ret, f)
			}
			Core::Sigma { name, car_type, cdr_type } => {
				if cdr_type.free_names().contains(name) {
					write!(f, "exists ({}: ", self.name(*name))?;
				} else {
					write!(f, "exists (")?;
				}
				self.print(car_type, f)?;
				write!(f, ") ")?;
				self.print(cdr_type, f)
			}
			Core::Let { name, ty, argument, tail } => {
				write!(f, "{{ let {}: ", self.name(*name))?;
				self.print(ty, f)?;
				write!(f, " = ")?;
				self.print(argument, f)?;
				write!(f, " return ")?;
				self.print(tail, f)?;
				write!(f, " }}")
			}
			_ => self.print_operand(core, f),
		}
	}

	fn print_operand(&self, core: &Core, f: &mut impl Write) -> fmt::Result {
		match core {
			Core::Var(name) => write!(f, "{}", self.name(*name)),
			Core::Type => write!(f, "Type"),
			Core::Ap { target, arg } => {
				self.print_operand(target, f)?;
				write!(f, "(")?;
				self.print(arg, f)?;
				write!(f, ")")
			}
			Core::ApImplicit { target, arg } => {
				self.print_operand(target, f)?;
				write!(f, "(implicit ")?;
				self.print(arg, f)?;
				write!(f, ")")
			}
			Core::Cons { car, cdr } => {
				write!(f, "cons(")?;
				self.print(car, f)?;
				write!(f, ", ")?;
				self.print(cdr, f)?;
				write!(f, ")")
			}
			Core::Car(target) => {
				write!(f, "car(")?;
				self.print(target, f)?;
				write!(f, ")")
			}
			Core::Cdr(target) => {
				write!(f, "cdr(")?;
				self.print(target, f)?;
				write!(f, ")")
			}
			Core::String => write!(f, "String"),
			Core::Quote(literal) => write!(f, "\"{literal}\""),
			Core::Trivial => write!(f, "Trivial"),
			Core::Sole => write!(f, "sole"),
			Core::Equal { ty, from, to } => {
				write!(f, "Equal(")?;
				self.print(ty, f)?;
				write!(f, ", ")?;
				self.print(from, f)?;
				write!(f, ", ")?;
				self.print(to, f)?;
				write!(f, ")")
			}
			Core::Same(value) => {
				write!(f, "same(")?;
				self.print(value, f)?;
				write!(f, ")")
			}
			Core::ClazzNull | Core::ClazzCons { .. } | Core::ClazzFulfilled { .. } => self.print_clazz(core, f),
			Core::Objekt(properties) => {
				if properties.is_empty() {
					return write!(f, "{{}}");
				}
				write!(f, "{{ ")?;
				for (i, (name, property)) in properties.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}: ", self.name(*name))?;
					self.print(property, f)?;
				}
				write!(f, " }}")
			}
			Core::Dot { target, name } => {
				self.print_operand(target, f)?;
				write!(f, ".{}", self.name(*name))
			}
			Core::Pi { .. }
			| Core::PiImplicit { .. }
			| Core::Fn { .. }
			| Core::FnImplicit { .. }
			| Core::Sigma { .. }
			| Core::Let { .. } => {
				write!(f, "(")?;
				self.print(core, f)?;
				write!(f, ")")
			}
		}
	}

	fn print_clazz(&self, mut core: &Core, f: &mut impl Write) -> fmt::Result {
		if matches!(core, Core::ClazzNull) {
			return write!(f, "class {{}}");
		}
		write!(f, "class {{ ")?;
		let mut is_first = true;
		loop {
			core = match core {
				Core::ClazzCons { name, property_type, rest, .. } => {
					if !is_first {
						write!(f, ", ")?;
					}
					write!(f, "{}: ", self.name(*name))?;
					self.print(property_type, f)?;
					&**rest
				}
				Core::ClazzFulfilled { name, property_type, property, rest, .. } => {
					if !is_first {
						write!(f, ", ")?;
					}
					write!(f, "{}: ", self.name(*name))?;
					self.print(property_type, f)?;
					write!(f, " = ")?;
					self.print(property, f)?;
					&**rest
				}
				_ => break,
			};
			is_first = false;
		}
		write!(f, " }}")
	}
}

use std::{
	collections::{HashMap, HashSet},
	fmt::Write as _,
};

use lasso::{Resolver, Spur};

pub type Symbol = Spur;

/// A name is an interned symbol together with a subscript.
/// Freshening only ever bumps the subscript, so it never needs the interner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Name {
	pub symbol: Symbol,
	pub subscript: u32,
}

impl Name {
	pub const fn new(symbol: Symbol) -> Self { Self { symbol, subscript: 0 } }

	pub fn with_subscript(self, subscript: u32) -> Self { Self { symbol: self.symbol, subscript } }

	pub fn resolve(self, interner: &impl Resolver) -> String {
		const DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];
		let mut string = interner.resolve(&self.symbol).to_owned();
		if self.subscript > 0 {
			for digit in self.subscript.to_string().bytes() {
				string.push(DIGITS[usize::from(digit - b'0')]);
			}
		}
		string
	}
}

impl From<Symbol> for Name {
	fn from(symbol: Symbol) -> Self { Self::new(symbol) }
}

/// Returns `name` itself if it is unused, otherwise the same symbol with the least unused positive subscript.
pub fn freshen(used: &HashSet<Name>, name: Name) -> Name {
	if !used.contains(&name) {
		return name;
	}
	(1..).map(|subscript| name.with_subscript(subscript)).find(|candidate| !used.contains(candidate)).unwrap_or(name)
}

/// Picks one fresh name per distinct name, consistently: every occurrence of a name maps to the same fresh name.
pub fn freshen_names(used: &HashSet<Name>, names: impl IntoIterator<Item = Name>) -> HashMap<Name, Name> {
	let mut used = used.clone();
	let mut fresh_names = HashMap::new();
	for name in names {
		if fresh_names.contains_key(&name) {
			continue;
		}
		let fresh_name = freshen(&used, name);
		used.insert(fresh_name);
		fresh_names.insert(name, fresh_name);
	}
	fresh_names
}

/// Joins names for diagnostics.
pub fn resolve_names(names: &[Name], interner: &impl Resolver) -> String {
	let mut string = String::new();
	for (i, name) in names.iter().enumerate() {
		if i > 0 {
			string.push_str(", ");
		}
		let _ = write!(string, "{}", name.resolve(interner));
	}
	string
}

#[cfg(test)]
mod tests {
	use lasso::Rodeo;

	use super::*;

	#[test]
	fn freshen_keeps_unused_names() {
		let mut interner = Rodeo::new();
		let x = Name::new(interner.get_or_intern("x"));
		assert_eq!(freshen(&HashSet::new(), x), x);
	}

	#[test]
	fn freshen_picks_least_unused_subscript() {
		let mut interner = Rodeo::new();
		let x = Name::new(interner.get_or_intern("x"));
		let used = HashSet::from([x, x.with_subscript(1), x.with_subscript(3)]);
		assert_eq!(freshen(&used, x), x.with_subscript(2));
		assert_eq!(freshen(&used, x).resolve(&interner), "x₂");
	}

	#[test]
	fn freshen_names_is_consistent_per_name() {
		let mut interner = Rodeo::new();
		let x = Name::new(interner.get_or_intern("x"));
		let y = Name::new(interner.get_or_intern("y"));
		let used = HashSet::from([x]);
		let fresh_names = freshen_names(&used, [x, y, x]);
		assert_eq!(fresh_names.len(), 2);
		assert_eq!(fresh_names[&x], x.with_subscript(1));
		assert_eq!(fresh_names[&y], y);
	}
}

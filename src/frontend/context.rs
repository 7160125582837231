use std::{collections::HashSet, rc::Rc};

use crate::{
	common::Name,
	ir::semantics::{Environment, Value},
};

#[derive(Clone, Debug)]
pub struct ContextEntry {
	/// The surface name, used for lookup.
	pub label: Name,
	/// The core name, possibly freshened.
	pub name: Name,
	pub ty: Rc<Value>,
	pub value: Option<Rc<Value>>,
}

/// An ordered scope of typed, optionally valued, names.
#[derive(Clone, Debug, Default)]
pub struct Context {
	entries: im::Vector<ContextEntry>,
}

impl Context {
	pub fn empty() -> Self { Self::default() }

	#[must_use]
	pub fn bind(&self, label: Name, name: Name, ty: Rc<Value>) -> Self {
		self.extended(ContextEntry { label, name, ty, value: None })
	}

	#[must_use]
	pub fn define(&self, label: Name, name: Name, ty: Rc<Value>, value: Rc<Value>) -> Self {
		self.extended(ContextEntry { label, name, ty, value: Some(value) })
	}

	fn extended(&self, entry: ContextEntry) -> Self {
		let mut context = self.clone();
		context.entries.push_back(entry);
		context
	}

	/// Finds the innermost entry with the given label.
	pub fn lookup(&self, label: Name) -> Option<&ContextEntry> {
		self.entries.iter().rev().find(|entry| entry.label == label)
	}

	pub fn lookup_name(&self, name: Name) -> Option<&ContextEntry> {
		self.entries.iter().rev().find(|entry| entry.name == name)
	}

	/// Whether `name` is bound without a value.
	pub fn is_abstract(&self, name: Name) -> bool {
		self.lookup_name(name).is_some_and(|entry| entry.value.is_none())
	}

	pub fn names(&self) -> HashSet<Name> { self.entries.iter().map(|entry| entry.name).collect() }

	/// Binds every name to its value, or to a neutral variable of its type.
	pub fn to_environment(&self) -> Environment {
		let mut environment = Environment::new();
		for entry in &self.entries {
			let value = match &entry.value {
				Some(value) => value.clone(),
				None => Value::variable(entry.ty.clone(), entry.name).into(),
			};
			environment.insert(entry.name, value);
		}
		environment
	}
}

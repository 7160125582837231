use std::rc::Rc;

use crate::{common::Name, ir::syntax::Core};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}")]
pub struct ElaborationError {
	/// The source range of the innermost expression that failed, if any.
	pub range: Option<(usize, usize)>,
	pub kind: ErrorKind,
	/// Enclosing checks, innermost first.
	pub trace: Vec<Frame>,
}

/// A broken elaborator invariant, as opposed to an ill-typed program.
#[derive(Debug, Clone, thiserror::Error)]
#[error("internal error: {0}")]
pub struct InternalError(pub String);

#[derive(Debug, Clone, Copy)]
pub enum ExpectedFormer {
	Pi,
	PiImplicit,
	Sigma,
	Clazz,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ErrorKind {
	#[error(transparent)]
	Internal(#[from] InternalError),
	#[error("variable not in scope")]
	NotInScope(Name),
	#[error("type mismatch")]
	TypeMismatch { left: Core, right: Core },
	#[error("literal mismatch")]
	LiteralMismatch { left: Rc<str>, right: Rc<str> },
	#[error("variable mismatch")]
	VariableMismatch { left: Name, right: Name },
	#[error("conversion not implemented")]
	ConversionNotImplemented { ty: &'static str, left: &'static str, right: &'static str },
	#[error("missing property")]
	MissingProperty(Name),
	#[error("missing properties")]
	MissingProperties(Vec<Name>),
	#[error("cannot unfix a fulfilled property")]
	UnfixedProperty(Name),
	#[error("property not found in subclass")]
	PropertyNotFound(Name),
	#[error("duplicate property")]
	DuplicateProperty(Name),
	#[error("unknown property")]
	UnknownProperty { name: Name, clazz: Core },
	#[error("too many arguments for a class")]
	ExtraArgument { clazz: Core },
	#[error("unification failure")]
	UnificationFailure { left: Core, right: Core },
	#[error("occurs check failure")]
	OccursCheck(Name),
	#[error("solution escapes the scope of its pattern variable")]
	ScopeEscape { pattern_var: Name, name: Name },
	#[error("pattern variable applied to a non-pattern spine")]
	NonPatternSpine(Name),
	#[error("unresolved pattern variable")]
	UnresolvedPatternVariable(Name),
	#[error("unexpected type former")]
	ExpectedFormer { expected: ExpectedFormer, found: Core },
	#[error("cannot infer the type of an unannotated function")]
	CannotInferFunction,
	#[error("cannot infer the type of a pair")]
	CannotInferCons,
}

#[derive(Debug, Clone)]
pub enum Frame {
	Inclusion { subtype: Core, ty: Core },
	Property(Name),
	Equation(usize),
}

impl ElaborationError {
	/// Records `range` unless an inner expression already has.
	#[must_use]
	pub fn at(mut self, range: (usize, usize)) -> Self {
		self.range.get_or_insert(range);
		self
	}

	#[must_use]
	pub fn within(mut self, frame: Frame) -> Self {
		self.trace.push(frame);
		self
	}

	pub fn is_internal(&self) -> bool { matches!(self.kind, ErrorKind::Internal(_)) }
}

impl From<ErrorKind> for ElaborationError {
	fn from(kind: ErrorKind) -> Self { Self { range: None, kind, trace: Vec::new() } }
}

impl From<InternalError> for ElaborationError {
	fn from(error: InternalError) -> Self { ErrorKind::Internal(error).into() }
}

use std::fmt::Write as _;

use lasso::Resolver;
use peg::{error::ParseError, str::LineCol};

use crate::{
	common::{resolve_names, Name},
	frontend::{
		error::{ElaborationError, ErrorKind, ExpectedFormer, Frame},
		module::Error,
		unparse::pretty_print,
	},
	ir::syntax::Core,
};

pub fn report_error(source: &str, interner: &impl Resolver, error: &Error) {
	match error {
		Error::Parse(error) => report_parse_error(source, error),
		Error::Elaboration(error) => report_elaboration_error(source, interner, error),
	}
}

pub fn report_parse_error(source: &str, error: &ParseError<LineCol>) {
	print!("{}", format_parse_error(source, error));
}

pub fn report_elaboration_error(source: &str, interner: &impl Resolver, error: &ElaborationError) {
	print!("{}", format_elaboration_error(source, interner, error));
}

pub fn format_parse_error(source: &str, error: &ParseError<LineCol>) -> String {
	let offset = error.location.offset;
	format_line_error(source, (offset, offset + 1), &format!("parse error: expected one of: {}", error.expected))
}

pub fn format_elaboration_error(source: &str, interner: &impl Resolver, error: &ElaborationError) -> String {
	let message = display_error(error, interner);
	match error.range {
		Some(range) => format_line_error(source, range, &message),
		None => format!("error: {message}\n"),
	}
}

fn format_line_error(source: &str, range: (usize, usize), error_string: &str) -> String {
	const TAB_REPLACEMENT: &str = "   ";

	let mut lines = source.split_inclusive('\n');
	let mut line_number: usize = 0;
	let mut bytes_left = range.0;
	let (line, bytes_left, width) = loop {
		if let Some(line) = lines.next() {
			line_number += 1;
			if line.len() <= bytes_left {
				bytes_left -= line.len();
			} else {
				break (line, bytes_left, range.1.saturating_sub(range.0).max(1));
			}
		} else {
			let (i, last) = source.split('\n').enumerate().last().unwrap_or((0, ""));
			line_number = i + 1;
			break (last, last.len(), 1);
		}
	};

	let visual_line = line.replace('\t', TAB_REPLACEMENT).trim_end().to_owned();
	let visual_offset: usize =
		unicode_width::UnicodeWidthStr::width(line[0..bytes_left].replace('\t', TAB_REPLACEMENT).as_str());
	// Carets stop at the end of the line.
	let width = width.min(visual_line.len().saturating_sub(visual_offset).max(1));

	let displayed_line_number = line_number.to_string();
	let dummy_line_number = " ".repeat(displayed_line_number.len());
	let mut string = String::new();
	let _ = writeln!(string, "[{}:{}] error: {error_string}", line_number, bytes_left);
	let _ = writeln!(string, "{} |", dummy_line_number);
	let _ = writeln!(string, "{} | {}", displayed_line_number, visual_line);
	let _ = writeln!(string, "{} | {}{}", dummy_line_number, " ".repeat(visual_offset), "^".repeat(width));
	string
}

/// Renders an error message followed by its trace, innermost first.
pub fn display_error(error: &ElaborationError, interner: &impl Resolver) -> String {
	let mut string = display_kind(&error.kind, interner);
	for frame in &error.trace {
		let _ = write!(string, "\n  {}", display_frame(frame, interner));
	}
	string
}

fn display_kind(kind: &ErrorKind, interner: &impl Resolver) -> String {
	let name = |name: &Name| name.resolve(interner);
	let print = |core: &Core| pretty_print(core, interner);
	match kind {
		ErrorKind::Internal(error) => format!("{error} (this is a bug)"),
		ErrorKind::NotInScope(label) => format!("elaboration error: `{}` is not in scope", name(label)),
		ErrorKind::TypeMismatch { left, right } =>
			format!("elaboration error: type mismatch\n  left:  {}\n  right: {}", print(left), print(right)),
		ErrorKind::LiteralMismatch { left, right } =>
			format!("elaboration error: literal mismatch: \"{left}\" is not \"{right}\""),
		ErrorKind::VariableMismatch { left, right } =>
			format!("elaboration error: variable mismatch: `{}` is not `{}`", name(left), name(right)),
		ErrorKind::ConversionNotImplemented { ty, left, right } =>
			format!("elaboration error: conversion not implemented for {left} and {right} at {ty}"),
		ErrorKind::MissingProperty(property) =>
			format!("elaboration error: missing property `{}`", name(property)),
		ErrorKind::MissingProperties(properties) =>
			format!("elaboration error: missing properties: {}", resolve_names(properties, interner)),
		ErrorKind::UnfixedProperty(property) =>
			format!("elaboration error: cannot unfix fulfilled property `{}`", name(property)),
		ErrorKind::PropertyNotFound(property) =>
			format!("elaboration error: property `{}` not found in subclass", name(property)),
		ErrorKind::DuplicateProperty(property) =>
			format!("elaboration error: duplicate property `{}`", name(property)),
		ErrorKind::UnknownProperty { name: property, clazz } =>
			format!("elaboration error: `{}` has no property `{}`", print(clazz), name(property)),
		ErrorKind::ExtraArgument { clazz } =>
			format!("elaboration error: too many arguments, `{}` has no property left to fulfil", print(clazz)),
		ErrorKind::UnificationFailure { left, right } =>
			format!("elaboration error: cannot unify\n  left:  {}\n  right: {}", print(left), print(right)),
		ErrorKind::OccursCheck(pattern_var) =>
			format!("elaboration error: `{}` occurs in its own solution", name(pattern_var)),
		ErrorKind::ScopeEscape { pattern_var, name: escaped } => format!(
			"elaboration error: solution of `{}` mentions `{}`, which is out of its scope",
			name(pattern_var),
			name(escaped)
		),
		ErrorKind::NonPatternSpine(pattern_var) => format!(
			"elaboration error: `{}` is applied to arguments that are not distinct variables",
			name(pattern_var)
		),
		ErrorKind::UnresolvedPatternVariable(pattern_var) =>
			format!("elaboration error: could not solve `{}`", name(pattern_var)),
		ErrorKind::ExpectedFormer { expected, found } => {
			let expected = match expected {
				ExpectedFormer::Pi => "a function type",
				ExpectedFormer::PiImplicit => "an implicit function type",
				ExpectedFormer::Sigma => "a pair type",
				ExpectedFormer::Clazz => "a class",
			};
			format!("elaboration error: expected {expected}, found {}", print(found))
		}
		ErrorKind::CannotInferFunction =>
			"elaboration error: cannot infer the type of a function without parameter types".to_owned(),
		ErrorKind::CannotInferCons => "elaboration error: cannot infer the type of a pair".to_owned(),
	}
}

fn display_frame(frame: &Frame, interner: &impl Resolver) -> String {
	match frame {
		Frame::Inclusion { subtype, ty } => format!(
			"while checking that {} is included in {}",
			pretty_print(subtype, interner),
			pretty_print(ty, interner)
		),
		Frame::Property(name) => format!("in property `{}`", name.resolve(interner)),
		Frame::Equation(index) => format!("in equation {}", index + 1),
	}
}

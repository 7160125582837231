use lasso::Rodeo;
use peg::{error::ParseError, str::LineCol};

use crate::{
	common::Name,
	ir::presyntax::{
		fold_ap, fold_clazz, fold_fn, fold_fn_with_ret_type, fold_pi, fold_sequence, fold_sigma, ApArg, ClazzBinding,
		Equation, Expression, FnBinding, PiBinding, Preterm, SequenceBinding, SigmaBinding, Stmt,
	},
};

/// Parses a sequence of statements, interning names into `interner`.
pub fn parse_stmts(source: &str, interner: &mut Rodeo) -> Result<Vec<Stmt>, ParseError<LineCol>> {
	let mut parser = Parser::new(std::mem::take(interner));
	let result = surface_parse::stmts(source, &mut parser);
	*interner = parser.interner;
	result
}

/// Parses a single expression, interning names into `interner`.
pub fn parse_expression(source: &str, interner: &mut Rodeo) -> Result<Expression, ParseError<LineCol>> {
	let mut parser = Parser::new(std::mem::take(interner));
	let result = surface_parse::expression(source, &mut parser);
	*interner = parser.interner;
	result
}

pub struct Parser {
	pub interner: Rodeo,
	// The binder name of nameless pi and sigma bindings.
	anonymous: Name,
}

impl Parser {
	fn new(mut interner: Rodeo) -> Self {
		let anonymous = Name::new(interner.get_or_intern_static("_"));
		Self { interner, anonymous }
	}

	fn identifier(&mut self, span: &str) -> Name { Name::new(self.interner.get_or_intern(span)) }
}

peg::parser! {
	grammar surface_parse(parser: &mut Parser) for str {
		rule _ = quiet!{([' ' | '\t' | '\n' | '\r'] / "//" [^'\n']*)*}

		rule ident_char() = ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']

		rule keyword() = (
			"Type" / "String" / "Trivial" / "sole" / "class" / "cons" / "car" / "cdr" / "Equal" / "same" / "the"
			/ "exists" / "implicit" / "let" / "check" / "compute" / "solve" / "new" / "return"
		) !ident_char()

		rule identifier() -> Name
			= quiet!{!keyword() span:$(['a'..='z' | 'A'..='Z'] ident_char()* / "_" ident_char()+) {parser.identifier(span)}}
			/ expected!("identifier")

		rule binder_name() -> Name
			= identifier()
			/ "_" !ident_char() {parser.anonymous}

		rule string_literal() -> std::rc::Rc<str>
			= "\"" literal:$([^'"']*) "\"" {literal.into()}

		// Binding groups.
		rule pi_binding() -> PiBinding
			= "implicit" !ident_char() _ name:identifier() _ ":" _ ty:exp() {PiBinding::Implicit { name, ty }}
			/ name:binder_name() _ ":" _ ty:exp() {PiBinding::Named { name, ty }}
			/ ty:exp() {PiBinding::Nameless(ty)}

		rule sigma_binding() -> SigmaBinding
			= name:binder_name() _ ":" _ ty:exp() {SigmaBinding::Named { name, ty }}
			/ ty:exp() {SigmaBinding::Nameless(ty)}

		rule fn_binding() -> FnBinding
			= "implicit" !ident_char() _ name:identifier() ty:(_ ":" _ ty:exp() {ty})? {FnBinding::Implicit { name, ty }}
			/ name:binder_name() ty:(_ ":" _ ty:exp() {ty})? {FnBinding::Named { name, ty }}

		rule ap_arg() -> ApArg
			= "implicit" !ident_char() _ arg:exp() {ApArg::Implicit(arg)}
			/ arg:exp() {ApArg::Plain(arg)}

		rule clazz_binding() -> ClazzBinding
			= name:identifier() _ ":" _ property_type:exp() property:(_ "=" _ property:exp() {property})? {
				match property {
					Some(property) => ClazzBinding::Fulfilled { name, property_type: Some(property_type), property },
					None => ClazzBinding::Abstract { name, property_type },
				}
			}
			/ name:identifier() _ "=" _ property:exp() {ClazzBinding::Fulfilled { name, property_type: None, property }}

		rule property() -> (Name, Expression)
			= name:identifier() _ ":" _ property:exp() {(name, property)}

		rule sequence_binding() -> SequenceBinding
			= "let" !ident_char() _ name:binder_name() ty:(_ ":" _ ty:exp() {ty})? _ "=" _ argument:exp()
				{SequenceBinding::Let { name, ty, argument }}
			/ "check" !ident_char() _ expr:exp() _ ":" _ ty:exp() {SequenceBinding::Check { expr, ty }}

		// Atoms.
		rule atom() -> Expression
			= "(" _ expr:exp() _ ")" {expr}
			/ init:position!() "class" !ident_char() _ "{" _ bindings:(clazz_binding() ** (_ "," _)) _ ","? _ "}" fini:position!()
				{? fold_clazz(bindings, (init, fini)).map_err(|_| "distinct property names")}
			/ init:position!() "{" _ bindings:(sequence_binding() ** _)
				_ "return" !ident_char() _ ret:exp() _ "}" fini:position!()
				{fold_sequence(bindings, ret, (init, fini), parser.anonymous)}
			/ init:position!() preterm:(
				  "new" !ident_char() _ clazz:atom() _ "(" _ args:(exp() ** (_ "," _)) _ ","? _ ")"
					{Preterm::NewAp { clazz: clazz.into(), args }}
				/ "new" !ident_char() _ clazz:atom() _ "{" _ properties:(property() ** (_ "," _)) _ ","? _ "}"
					{Preterm::New { clazz: clazz.into(), properties }}
			) fini:position!() {Expression::new(preterm, (init, fini))}
			/ init:position!() preterm:(
				  "Type" !ident_char() {Preterm::Type}
				/ "String" !ident_char() {Preterm::String}
				/ "Trivial" !ident_char() {Preterm::Trivial}
				/ "sole" !ident_char() {Preterm::Sole}
				/ literal:string_literal() {Preterm::Quote(literal)}
				/ "{" _ properties:(property() ** (_ "," _)) _ ","? _ "}" {Preterm::Objekt(properties)}
				/ "cons" _ "(" _ car:exp() _ "," _ cdr:exp() _ ")" {Preterm::Cons { car: car.into(), cdr: cdr.into() }}
				/ "car" _ "(" _ target:exp() _ ")" {Preterm::Car(target.into())}
				/ "cdr" _ "(" _ target:exp() _ ")" {Preterm::Cdr(target.into())}
				/ "Equal" _ "(" _ ty:exp() _ "," _ from:exp() _ "," _ to:exp() _ ")"
					{Preterm::Equal { ty: ty.into(), from: from.into(), to: to.into() }}
				/ "same" _ "(" _ value:exp() _ ")" {Preterm::Same(value.into())}
				/ "the" _ "(" _ ty:exp() _ "," _ value:exp() _ ")" {Preterm::The { ty: ty.into(), value: value.into() }}
				/ name:identifier() {Preterm::Var(name)}
			) fini:position!() {Expression::new(preterm, (init, fini))}

		// Spines: applications and property accesses.
		#[cache_left_rec]
		rule spine() -> Expression
			= init:position!() target:spine() "(" _ args:(ap_arg() ** (_ "," _)) _ ","? _ ")" fini:position!()
				{fold_ap(target, args, (init, fini))}
			/ init:position!() target:spine() "." name:identifier() fini:position!()
				{Expression::new(Preterm::Dot { target: target.into(), name }, (init, fini))}
			/ atom()

		// Binding forms.
		rule pi() -> Expression
			= init:position!() "(" _ bindings:(pi_binding() ++ (_ "," _)) _ ","? _ ")" _ "->" _ ret_type:exp() fini:position!()
				{fold_pi(bindings, ret_type, (init, fini), parser.anonymous)}
			/ init:position!() arg_type:spine() _ "->" _ ret_type:exp() fini:position!()
				{fold_pi(vec![PiBinding::Nameless(arg_type)], ret_type, (init, fini), parser.anonymous)}

		rule function() -> Expression
			= init:position!() "(" _ bindings:(fn_binding() ++ (_ "," _)) _ ","? _ ")"
				_ ":" _ ret_type:exp() _ "=>" _ ret:exp() fini:position!()
				{fold_fn_with_ret_type(bindings, ret_type, ret, (init, fini))}
			/ init:position!() "(" _ bindings:(fn_binding() ++ (_ "," _)) _ ","? _ ")" _ "=>" _ ret:exp() fini:position!()
				{fold_fn(bindings, ret, (init, fini))}

		rule sigma() -> Expression
			= init:position!() "exists" !ident_char() _ "(" _ bindings:(sigma_binding() ++ (_ "," _)) _ ","? _ ")" _ cdr_type:exp() fini:position!()
				{fold_sigma(bindings, cdr_type, (init, fini), parser.anonymous)}

		#[cache]
		rule exp() -> Expression
			= pi() / function() / sigma() / spine()

		// Statements.
		rule equation() -> Equation
			= left:exp() _ "=" _ right:exp() ty:(_ ":" _ ty:exp() {ty})? {
				match ty {
					Some(ty) => Equation::Typed { ty, left, right },
					None => Equation::Untyped { left, right },
				}
			}

		rule solve_binding() -> (Name, Expression)
			= name:identifier() _ ":" _ ty:exp() {(name, ty)}

		rule stmt() -> Stmt
			= "let" !ident_char() _ name:identifier() ty:(_ ":" _ ty:exp() {ty})? _ "=" _ expr:exp() {Stmt::Let { name, ty, expr }}
			/ "check" !ident_char() _ expr:exp() _ ":" _ ty:exp() {Stmt::Check { expr, ty }}
			/ "compute" !ident_char() _ expr:exp() {Stmt::Compute(expr)}
			/ "solve" _ "(" _ bindings:(solve_binding() ** (_ "," _)) _ ","? _ ")" _ "{" _ equations:(equation() ** _) _ "}"
				{Stmt::Solve { bindings, equations }}

		pub rule stmts() -> Vec<Stmt>
			= _ stmts:(stmt() ** _) _ {stmts}

		pub rule expression() -> Expression
			= _ expr:exp() _ {expr}
	}
}

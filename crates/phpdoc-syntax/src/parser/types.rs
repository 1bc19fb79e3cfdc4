//! Type expression grammar
//!
//! Follows the PHPStan docblock type syntax:
//! - top level: `?T`, `A|B`, `A&B`, atomic types
//! - parenthesized: additionally conditionals (`T is X ? A : B`,
//!   `$param is not X ? A : B`)
//! - atomic: identifiers, generics, shapes, callables, const fetches,
//!   literals, `T[]` and `T[K]` suffixes
//!
//! Every suffix (`<`, `(`, `{`, `::`, `[`) must follow its identifier
//! without whitespace, so a description such as `@return Foo (cached)`
//! is not mistaken for a callable.

use super::{ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

/// Parse a type at tag level.
pub(crate) fn parse_type(parser: &mut Parser) -> Result<TypeNode, ParseError> {
    parser.enter()?;
    let result = parse_type_inner(parser);
    parser.leave();
    result
}

fn parse_type_inner(parser: &mut Parser) -> Result<TypeNode, ParseError> {
    if parser.eat(&Token::Nullable) {
        return Ok(TypeNode::nullable(parse_atomic(parser)?));
    }

    let ty = parse_atomic(parser)?;
    parse_compound(parser, ty)
}

/// Parse the inside of parentheses, where conditionals are allowed.
fn parse_sub_type(parser: &mut Parser) -> Result<TypeNode, ParseError> {
    parser.enter()?;
    let result = parse_sub_type_inner(parser);
    parser.leave();
    result
}

fn parse_sub_type_inner(parser: &mut Parser) -> Result<TypeNode, ParseError> {
    if let Token::Variable(name) = parser.current().clone() {
        parser.advance();
        if !parser.current().is_keyword("is") {
            return Err(parser.unexpected("'is'"));
        }
        return parse_conditional(parser, ConditionalSubject::Parameter(name));
    }

    if parser.eat(&Token::Nullable) {
        return Ok(TypeNode::nullable(parse_atomic(parser)?));
    }

    let ty = parse_atomic(parser)?;
    if parser.current().is_keyword("is") {
        return parse_conditional(parser, ConditionalSubject::Type(Box::new(ty)));
    }
    parse_compound(parser, ty)
}

/// Continue `first` into a union or intersection if one follows.
fn parse_compound(parser: &mut Parser, first: TypeNode) -> Result<TypeNode, ParseError> {
    if parser.check(&Token::Union) {
        let mut types = vec![first];
        while parser.eat(&Token::Union) {
            types.push(parse_atomic(parser)?);
        }
        return Ok(TypeNode::union(types));
    }

    if parser.check(&Token::Intersection) && !reference_follows(parser) {
        let mut types = vec![first];
        while parser.check(&Token::Intersection) && !reference_follows(parser) {
            parser.advance();
            types.push(parse_atomic(parser)?);
        }
        return Ok(TypeNode::intersection(types));
    }

    Ok(first)
}

/// An `&` that marks a by-reference parameter rather than an intersection.
fn reference_follows(parser: &Parser) -> bool {
    matches!(
        parser.peek(1),
        Token::Variable(_) | Token::Variadic | Token::Comma | Token::CloseParen | Token::Eof
    )
}

fn parse_conditional(parser: &mut Parser, subject: ConditionalSubject) -> Result<TypeNode, ParseError> {
    // 'is'
    parser.advance();
    let negated = parser.eat_keyword("not");
    let target = parse_type(parser)?;
    parser.expect(Token::Nullable)?;
    let if_type = parse_type(parser)?;
    parser.expect(Token::Colon)?;
    let else_type = parse_sub_type(parser)?;

    Ok(TypeNode::Conditional(ConditionalType {
        subject,
        target: Box::new(target),
        if_type: Box::new(if_type),
        else_type: Box::new(else_type),
        negated,
    }))
}

fn parse_atomic(parser: &mut Parser) -> Result<TypeNode, ParseError> {
    let ty = match parser.current().clone() {
        Token::OpenParen => {
            parser.advance();
            let inner = parse_sub_type(parser)?;
            parser.expect(Token::CloseParen)?;
            inner
        }
        Token::ThisVariable => {
            parser.advance();
            TypeNode::identifier("$this")
        }
        Token::Identifier(name) => {
            parser.advance();
            parse_after_identifier(parser, name)?
        }
        Token::IntLiteral(value) => {
            parser.advance();
            TypeNode::constant(ConstExpr::Integer { value })
        }
        Token::FloatLiteral(value) => {
            parser.advance();
            TypeNode::constant(ConstExpr::Float { value })
        }
        Token::StringLiteral(value) => {
            parser.advance();
            TypeNode::constant(ConstExpr::String { value })
        }
        _ => return Err(parser.unexpected("type")),
    };

    parse_postfix(parser, ty)
}

fn is_callable_name(name: &str) -> bool {
    let name = name.trim_start_matches('\\');
    ["callable", "pure-callable", "closure", "pure-closure"]
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

fn parse_after_identifier(parser: &mut Parser, name: String) -> Result<TypeNode, ParseError> {
    if !parser.is_adjacent() {
        return Ok(TypeNode::identifier(name));
    }

    match parser.current() {
        Token::OpenAngle if is_callable_name(&name) => {
            let start = parser.position();
            let callable = parse_callable_templates(parser)
                .and_then(|templates| parse_callable(parser, name.clone(), templates));
            match callable {
                Ok(callable) => Ok(callable),
                Err(_) => {
                    parser.rewind(start);
                    parse_generic(parser, name)
                }
            }
        }
        Token::OpenAngle => parse_generic(parser, name),
        Token::OpenParen => {
            // Anything followed by '(' may be a callable; fall back to the
            // bare identifier when it is not.
            let start = parser.position();
            match parse_callable(parser, name.clone(), Vec::new()) {
                Ok(callable) => Ok(callable),
                Err(_) => {
                    parser.rewind(start);
                    Ok(TypeNode::identifier(name))
                }
            }
        }
        Token::OpenCurly => {
            if let Some(kind) = ArrayShapeKind::from_keyword(&name) {
                parse_array_shape(parser, kind)
            } else if name.eq_ignore_ascii_case("object") {
                parse_object_shape(parser)
            } else {
                Ok(TypeNode::identifier(name))
            }
        }
        Token::DoubleColon => parse_const_fetch(parser, name),
        _ => Ok(TypeNode::identifier(name)),
    }
}

fn parse_postfix(parser: &mut Parser, mut ty: TypeNode) -> Result<TypeNode, ParseError> {
    while parser.is_adjacent() && parser.check(&Token::OpenSquare) {
        parser.advance();
        if parser.eat(&Token::CloseSquare) {
            ty = TypeNode::array_of(ty);
        } else {
            let offset = parse_type(parser)?;
            parser.expect(Token::CloseSquare)?;
            ty = TypeNode::OffsetAccess(OffsetAccessType {
                container: Box::new(ty),
                offset: Box::new(offset),
            });
        }
    }
    Ok(ty)
}

fn parse_generic(parser: &mut Parser, head: String) -> Result<TypeNode, ParseError> {
    parser.expect(Token::OpenAngle)?;

    let mut args = Vec::new();
    let mut variances = Vec::new();
    loop {
        if parser.eat(&Token::Wildcard) {
            args.push(TypeNode::identifier("mixed"));
            variances.push(Variance::Bivariant);
        } else {
            let variance = parse_variance(parser);
            args.push(parse_type(parser)?);
            variances.push(variance);
        }

        if !parser.eat(&Token::Comma) || parser.check(&Token::CloseAngle) {
            break;
        }
    }

    parser.expect(Token::CloseAngle)?;
    Ok(TypeNode::Generic(GenericType {
        head,
        args,
        variances,
    }))
}

/// A leading `covariant`/`contravariant` keyword, unless it is itself the argument.
fn parse_variance(parser: &mut Parser) -> Variance {
    let keyword_is_argument = matches!(
        parser.peek(1),
        Token::Comma | Token::CloseAngle | Token::OpenAngle | Token::OpenSquare
    );
    if keyword_is_argument {
        return Variance::Invariant;
    }
    if parser.eat_keyword("covariant") {
        Variance::Covariant
    } else if parser.eat_keyword("contravariant") {
        Variance::Contravariant
    } else {
        Variance::Invariant
    }
}

fn parse_callable_templates(parser: &mut Parser) -> Result<Vec<TemplateDeclaration>, ParseError> {
    parser.expect(Token::OpenAngle)?;

    let mut templates = Vec::new();
    loop {
        let name = parser.expect_identifier("template name")?;
        let bound = if parser.eat_keyword("of") {
            Some(Box::new(parse_type(parser)?))
        } else {
            None
        };
        let default = if parser.eat(&Token::Equal) {
            Some(Box::new(parse_type(parser)?))
        } else {
            None
        };
        templates.push(TemplateDeclaration {
            name,
            bound,
            default,
            description: String::new(),
        });

        if !parser.eat(&Token::Comma) || parser.check(&Token::CloseAngle) {
            break;
        }
    }

    parser.expect(Token::CloseAngle)?;
    Ok(templates)
}

fn parse_callable(
    parser: &mut Parser,
    identifier: String,
    templates: Vec<TemplateDeclaration>,
) -> Result<TypeNode, ParseError> {
    parser.expect(Token::OpenParen)?;

    let mut parameters = Vec::new();
    while !parser.check(&Token::CloseParen) {
        parameters.push(parse_callable_parameter(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::CloseParen)?;
    parser.expect(Token::Colon)?;

    let return_type = if parser.eat(&Token::Nullable) {
        TypeNode::nullable(parse_atomic(parser)?)
    } else {
        parse_atomic(parser)?
    };

    Ok(TypeNode::Callable(CallableType {
        identifier,
        parameters,
        return_type: Box::new(return_type),
        templates,
    }))
}

fn parse_callable_parameter(parser: &mut Parser) -> Result<CallableParameter, ParseError> {
    let ty = parse_type(parser)?;
    let is_reference = parser.eat(&Token::Intersection);
    let is_variadic = parser.eat(&Token::Variadic);
    let name = match parser.current().clone() {
        Token::Variable(name) => {
            parser.advance();
            Some(name)
        }
        _ => None,
    };
    let is_optional = parser.eat(&Token::Equal);

    Ok(CallableParameter {
        ty,
        is_reference,
        is_variadic,
        name,
        is_optional,
    })
}

fn parse_array_shape(parser: &mut Parser, kind: ArrayShapeKind) -> Result<TypeNode, ParseError> {
    parser.expect(Token::OpenCurly)?;

    let mut items = Vec::new();
    let mut sealed = true;
    while !parser.check(&Token::CloseCurly) {
        if parser.eat(&Token::Variadic) {
            sealed = false;
            // `...<K, V>` describes the extra entries; the shape keeps only the flag.
            if parser.check(&Token::OpenAngle) {
                parse_generic(parser, kind.keyword().to_string())?;
            }
            parser.eat(&Token::Comma);
            break;
        }

        items.push(parse_shape_item(parser, true)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    parser.expect(Token::CloseCurly)?;
    Ok(TypeNode::ArrayShape(ArrayShape { items, sealed, kind }))
}

fn parse_object_shape(parser: &mut Parser) -> Result<TypeNode, ParseError> {
    parser.expect(Token::OpenCurly)?;

    let mut items = Vec::new();
    while !parser.check(&Token::CloseCurly) {
        items.push(parse_shape_item(parser, false)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    parser.expect(Token::CloseCurly)?;
    Ok(TypeNode::ObjectShape(ObjectShape { items }))
}

fn parse_shape_item(parser: &mut Parser, allow_positional: bool) -> Result<ShapeItem, ParseError> {
    let key = match parser.current() {
        Token::Identifier(name) => Some(ShapeKey::Identifier(name.clone())),
        Token::IntLiteral(value) => Some(ShapeKey::Integer(value.clone())),
        Token::StringLiteral(value) => Some(ShapeKey::String(value.clone())),
        _ => None,
    };
    let keyed = key.is_some()
        && (parser.peek(1) == &Token::Colon
            || (parser.peek(1) == &Token::Nullable && parser.peek(2) == &Token::Colon));

    if keyed {
        parser.advance();
        let optional = parser.eat(&Token::Nullable);
        parser.expect(Token::Colon)?;
        let value = parse_type(parser)?;
        return Ok(ShapeItem { key, optional, value });
    }

    if !allow_positional {
        return Err(parser.unexpected("shape key"));
    }

    Ok(ShapeItem {
        key: None,
        optional: false,
        value: parse_type(parser)?,
    })
}

fn parse_const_fetch(parser: &mut Parser, class_name: String) -> Result<TypeNode, ParseError> {
    parser.expect(Token::DoubleColon)?;

    let name = match parser.current().clone() {
        Token::Identifier(name) => {
            parser.advance();
            if parser.is_adjacent() && parser.eat(&Token::Wildcard) {
                format!("{}*", name)
            } else {
                name
            }
        }
        Token::Wildcard => {
            parser.advance();
            "*".to_string()
        }
        _ => return Err(parser.unexpected("constant name")),
    };

    Ok(TypeNode::constant(ConstExpr::Fetch { class_name, name }))
}

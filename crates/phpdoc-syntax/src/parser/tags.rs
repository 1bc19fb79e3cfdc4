//! Tag body parsers

use super::types::parse_type;
use super::{ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

/// Vendor prefixes that select the same value parser as the bare tag.
const VENDOR_PREFIXES: &[&str] = &["phpstan-", "psalm-", "phan-"];

/// Strip the `@` and any vendor prefix: `@phpstan-param` -> `param`.
pub fn base_tag_name(name: &str) -> &str {
    let name = name.trim_start_matches('@');
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

pub(crate) fn parse_tag_value(name: &str, body: &str) -> TagValue {
    let mut parser = Parser::new(body);
    let result = match base_tag_name(name) {
        "param" => parse_param(&mut parser),
        "var" => parse_var(&mut parser),
        "return" | "returns" => parse_typed(&mut parser).map(TagValue::Return),
        "throws" => parse_typed(&mut parser).map(TagValue::Throws),
        "mixin" => parse_typed(&mut parser).map(TagValue::Mixin),
        "property" | "property-read" | "property-write" => parse_property(&mut parser),
        "template" | "template-covariant" | "template-contravariant" => parse_template(&mut parser),
        "type" => parse_type_alias(&mut parser),
        "import-type" => parse_type_alias_import(&mut parser),
        "extends" | "template-extends" | "inherits" => parse_typed(&mut parser).map(TagValue::Extends),
        "implements" | "template-implements" => parse_typed(&mut parser).map(TagValue::Implements),
        "use" | "template-use" => parse_typed(&mut parser).map(TagValue::Uses),
        _ => {
            return TagValue::Generic {
                value: body.trim().to_string(),
            }
        }
    };

    result.unwrap_or_else(|error| TagValue::Invalid {
        value: body.trim().to_string(),
        error: error.to_string(),
    })
}

fn parse_typed(parser: &mut Parser) -> Result<TypedTag, ParseError> {
    let ty = parse_type(parser)?;
    Ok(TypedTag {
        ty,
        description: parser.rest(),
    })
}

fn parse_param(parser: &mut Parser) -> Result<TagValue, ParseError> {
    let ty = parse_type(parser)?;
    let is_reference = parser.eat(&Token::Intersection);
    let is_variadic = parser.eat(&Token::Variadic);
    let parameter_name = match parser.current().clone() {
        Token::Variable(name) => {
            parser.advance();
            name
        }
        _ => return Err(parser.unexpected("parameter name")),
    };

    Ok(TagValue::Param(ParamTag {
        ty,
        is_reference,
        is_variadic,
        parameter_name,
        description: parser.rest(),
    }))
}

fn parse_var(parser: &mut Parser) -> Result<TagValue, ParseError> {
    let ty = parse_type(parser)?;
    let variable_name = match parser.current().clone() {
        Token::Variable(name) => {
            parser.advance();
            Some(name)
        }
        Token::ThisVariable => {
            parser.advance();
            Some("$this".to_string())
        }
        _ => None,
    };

    Ok(TagValue::Var(VarTag {
        ty,
        variable_name,
        description: parser.rest(),
    }))
}

fn parse_property(parser: &mut Parser) -> Result<TagValue, ParseError> {
    let ty = parse_type(parser)?;
    let property_name = match parser.current().clone() {
        Token::Variable(name) => {
            parser.advance();
            name
        }
        _ => return Err(parser.unexpected("property name")),
    };

    Ok(TagValue::Property(PropertyTag {
        ty,
        property_name,
        description: parser.rest(),
    }))
}

fn parse_template(parser: &mut Parser) -> Result<TagValue, ParseError> {
    let name = parser.expect_identifier("template name")?;
    let bound = if parser.eat_keyword("of") || parser.eat_keyword("as") {
        Some(Box::new(parse_type(parser)?))
    } else {
        None
    };
    let default = if parser.eat(&Token::Equal) {
        Some(Box::new(parse_type(parser)?))
    } else {
        None
    };

    Ok(TagValue::Template(TemplateDeclaration {
        name,
        bound,
        default,
        description: parser.rest(),
    }))
}

fn parse_type_alias(parser: &mut Parser) -> Result<TagValue, ParseError> {
    let alias = parser.expect_identifier("type alias name")?;
    parser.eat(&Token::Equal);
    let ty = parse_type(parser)?;
    Ok(TagValue::TypeAlias(TypeAliasTag { alias, ty }))
}

fn parse_type_alias_import(parser: &mut Parser) -> Result<TagValue, ParseError> {
    let imported_alias = parser.expect_identifier("imported type alias name")?;
    if !parser.eat_keyword("from") {
        return Err(parser.unexpected("'from'"));
    }
    let imported_from = TypeNode::identifier(parser.expect_identifier("class name")?);
    let imported_as = if parser.eat_keyword("as") {
        Some(parser.expect_identifier("local alias name")?)
    } else {
        None
    };

    Ok(TagValue::TypeAliasImport(TypeAliasImportTag {
        imported_alias,
        imported_from,
        imported_as,
    }))
}

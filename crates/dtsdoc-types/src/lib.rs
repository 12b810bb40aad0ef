//! JSDoc / Closure type-expression resolver for dtsdoc.
//!
//! This crate provides a small recursive descent parser for the type
//! expressions found in doclets (`Array.<string>`, `?number`,
//! `function(string): boolean`, `module:foo~Bar`), converting them into
//! [`dtsdoc_ast::DtsType`] values.

mod lexer;
mod parser;

use dtsdoc_ast::TypeParam;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, ParseResult, TypeExpr, normalize_namepath, parse_type, parse_type_expr};

/// Parse the text of one `@template` tag into type parameters.
///
/// Accepts `T`, `T, U` and the bounded form `{Bound} T`; anything after the
/// first word of each comma-separated entry is treated as description.
pub fn parse_type_params(text: &str) -> ParseResult<Vec<TypeParam>> {
    let text = text.trim();
    let (constraint, names) = match text.strip_prefix('{') {
        Some(rest) => {
            let close = matching_brace(rest).ok_or_else(|| ParseError {
                message: "unterminated `{` in template tag".to_string(),
                pos: 0,
            })?;
            let bound = parse_type(&rest[..close])?;
            (Some(bound), &rest[close + 1..])
        }
        None => (None, text),
    };

    Ok(names
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .filter(|name| dtsdoc_ast::is_identifier(name))
        .map(|name| TypeParam {
            name: name.to_string(),
            constraint: constraint.clone(),
            default: None,
        })
        .collect())
}

/// Byte index of the `}` closing an already-opened brace.
fn matching_brace(src: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, ch) in src.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtsdoc_ast::{DtsType, Primitive};

    #[test]
    fn test_template_names() {
        let params = parse_type_params("K, V").unwrap();
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["K", "V"]);
        assert!(params.iter().all(|p| p.constraint.is_none()));
    }

    #[test]
    fn test_template_with_bound() {
        let params = parse_type_params("{string|number} T - the key type").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "T");
        assert_eq!(
            params[0].constraint,
            Some(DtsType::Union(vec![
                DtsType::Primitive(Primitive::String),
                DtsType::Primitive(Primitive::Number),
            ]))
        );
    }

    #[test]
    fn test_template_unterminated_bound() {
        assert!(parse_type_params("{string T").is_err());
    }
}

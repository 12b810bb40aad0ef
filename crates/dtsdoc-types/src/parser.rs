//! Parser for JSDoc / Closure type expressions.

use dtsdoc_ast::{DtsType, FunctionType, IndexSignature, ObjectMember, Param, Primitive};
use thiserror::Error;

use crate::lexer::{Lexer, Token, TokenKind};

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {pos}: {message}")]
pub struct ParseError {
    pub message: String,
    pub pos: usize,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed type expression plus the parameter-level markers JSDoc allows on
/// the outermost type (`T=` optional, `...T` variadic).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub ty: DtsType,
    pub optional: bool,
    pub variadic: bool,
}

/// Parse a single JSDoc type expression such as `Array.<(string|number)>`.
pub fn parse_type_expr(src: &str) -> ParseResult<TypeExpr> {
    let mut parser = Parser::new(src);
    let expr = parser.parse_param_type()?;
    if !parser.check(&TokenKind::Eof) {
        return Err(parser.error(format!("unexpected trailing {:?}", parser.peek())));
    }
    Ok(expr)
}

/// Parse a type expression, discarding the optional/variadic markers.
pub fn parse_type(src: &str) -> ParseResult<DtsType> {
    parse_type_expr(src).map(|expr| expr.ty)
}

/// Parser for JSDoc type expressions.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        let tokens = Lexer::new(src).tokenize();
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_nth(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", kind, self.peek())))
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            pos: self.current().start,
        }
    }

    /// Whether the current token ends a type (used to tell the bare `?`
    /// "unknown" type apart from the `?T` nullable prefix).
    fn at_type_end(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Eof
                | TokenKind::Comma
                | TokenKind::RParen
                | TokenKind::RAngle
                | TokenKind::RBrace
                | TokenKind::Pipe
                | TokenKind::Eq
        )
    }

    /// `...T`, `T=` and plain `T`.
    fn parse_param_type(&mut self) -> ParseResult<TypeExpr> {
        let variadic = self.matches(&TokenKind::DotDotDot);
        let ty = if variadic && self.at_type_end() {
            DtsType::any()
        } else {
            self.parse_type()?
        };
        let optional = self.matches(&TokenKind::Eq);
        Ok(TypeExpr {
            ty,
            optional,
            variadic,
        })
    }

    fn parse_type(&mut self) -> ParseResult<DtsType> {
        self.parse_union_type()
    }

    fn parse_union_type(&mut self) -> ParseResult<DtsType> {
        // Handle leading pipe
        self.matches(&TokenKind::Pipe);

        let mut types = vec![self.parse_prefix_type()?];

        while self.matches(&TokenKind::Pipe) {
            types.push(self.parse_prefix_type()?);
        }

        Ok(DtsType::union(types))
    }

    fn parse_prefix_type(&mut self) -> ParseResult<DtsType> {
        if self.matches(&TokenKind::Question) {
            if self.at_type_end() {
                return Ok(DtsType::any());
            }
            let inner = self.parse_prefix_type()?;
            return Ok(nullable(inner));
        }
        if self.matches(&TokenKind::Bang) {
            return self.parse_prefix_type();
        }
        self.parse_postfix_type()
    }

    fn parse_postfix_type(&mut self) -> ParseResult<DtsType> {
        let mut ty = self.parse_primary_type()?;

        loop {
            // Array suffix: T[]
            if self.check(&TokenKind::LBracket) && self.peek_nth(1) == &TokenKind::RBracket {
                self.advance(); // [
                self.advance(); // ]
                ty = DtsType::Array(Box::new(ty));
                continue;
            }

            // Closure postfix nullable / non-null: `T?`, `T!`
            if self.check(&TokenKind::Question) {
                self.advance();
                ty = nullable(ty);
                continue;
            }
            if self.matches(&TokenKind::Bang) {
                continue;
            }

            break;
        }

        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParseResult<DtsType> {
        match self.peek().clone() {
            TokenKind::Star => {
                self.advance();
                Ok(DtsType::any())
            }
            TokenKind::Null_ => {
                self.advance();
                Ok(DtsType::Primitive(Primitive::Null))
            }
            TokenKind::Undefined_ => {
                self.advance();
                Ok(DtsType::Primitive(Primitive::Undefined))
            }
            TokenKind::True_ => {
                self.advance();
                Ok(DtsType::BooleanLiteral(true))
            }
            TokenKind::False_ => {
                self.advance();
                Ok(DtsType::BooleanLiteral(false))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(DtsType::StringLiteral(s))
            }
            TokenKind::NumberLiteral(n) => {
                self.advance();
                Ok(DtsType::NumberLiteral(n))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBrace => self.parse_record_type(),
            TokenKind::Function => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.parse_function_type()
                } else {
                    Ok(DtsType::named("Function"))
                }
            }
            TokenKind::Ident(name) => {
                self.advance();
                let type_args = self.parse_type_args()?;
                Ok(named_type(&name, type_args))
            }
            _ => Err(self.error(format!(
                "unexpected token in type position: {:?}",
                self.peek()
            ))),
        }
    }

    /// `.<A, B>` or `<A, B>` after a type name; empty when absent.
    fn parse_type_args(&mut self) -> ParseResult<Vec<DtsType>> {
        if self.check(&TokenKind::Dot) && self.peek_nth(1) == &TokenKind::LAngle {
            self.advance();
        }
        if !self.matches(&TokenKind::LAngle) {
            return Ok(Vec::new());
        }

        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RAngle)?;
        Ok(args)
    }

    /// `function(this:T, new:U, A, B=, ...C): R` after the `function` keyword.
    fn parse_function_type(&mut self) -> ParseResult<DtsType> {
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        let mut this_param = None;
        let mut constructs = None;

        while !self.check(&TokenKind::RParen) && !self.check(&TokenKind::Eof) {
            let context = match (self.peek(), self.peek_nth(1)) {
                (TokenKind::Ident(name), TokenKind::Colon) if name == "this" || name == "new" => {
                    Some(name.clone())
                }
                _ => None,
            };

            if let Some(context) = context {
                self.advance();
                self.advance();
                let ty = self.parse_type()?;
                if context == "this" {
                    this_param = Some(Box::new(ty));
                } else {
                    constructs = Some(ty);
                }
            } else {
                let expr = self.parse_param_type()?;
                let name = format!("arg{}", params.len());
                params.push(if expr.variadic {
                    Param {
                        name,
                        ty: DtsType::Array(Box::new(expr.ty)),
                        optional: false,
                        rest: true,
                    }
                } else {
                    Param {
                        name,
                        ty: expr.ty,
                        optional: expr.optional,
                        rest: false,
                    }
                });
            }

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let return_type = if self.matches(&TokenKind::Colon) {
            self.parse_prefix_type()?
        } else {
            constructs.unwrap_or_else(DtsType::any)
        };

        Ok(DtsType::Function(Box::new(FunctionType {
            params,
            return_type: Box::new(return_type),
            this_param,
        })))
    }

    /// `{a: number, 'b': string, c}`
    fn parse_record_type(&mut self) -> ParseResult<DtsType> {
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            let name = match self.advance().kind {
                TokenKind::Ident(name) | TokenKind::StringLiteral(name) => name,
                TokenKind::NumberLiteral(n) => n,
                TokenKind::Function => "function".to_string(),
                TokenKind::Null_ => "null".to_string(),
                TokenKind::Undefined_ => "undefined".to_string(),
                TokenKind::True_ => "true".to_string(),
                TokenKind::False_ => "false".to_string(),
                other => return Err(self.error(format!("expected field name, found {other:?}"))),
            };

            let (ty, optional) = if self.matches(&TokenKind::Colon) {
                let expr = self.parse_param_type()?;
                (expr.ty, expr.optional)
            } else {
                (DtsType::any(), false)
            };

            members.push(ObjectMember::Property { name, ty, optional });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(DtsType::Object(members))
    }
}

fn nullable(ty: DtsType) -> DtsType {
    DtsType::union(vec![ty, DtsType::Primitive(Primitive::Null)])
}

/// Map a JSDoc type name (and its arguments) to a TypeScript type.
fn named_type(name: &str, mut type_args: Vec<DtsType>) -> DtsType {
    let primitive = match name {
        "any" | "mixed" => Some(Primitive::Any),
        "string" | "String" => Some(Primitive::String),
        "number" | "Number" | "int" | "float" => Some(Primitive::Number),
        "boolean" | "Boolean" | "bool" => Some(Primitive::Boolean),
        "void" => Some(Primitive::Void),
        "object" => Some(Primitive::Object),
        "symbol" | "Symbol" => Some(Primitive::Symbol),
        "bigint" | "BigInt" => Some(Primitive::BigInt),
        "never" => Some(Primitive::Never),
        "unknown" => Some(Primitive::Unknown),
        _ => None,
    };
    if let Some(p) = primitive {
        if type_args.is_empty() {
            return DtsType::Primitive(p);
        }
    }

    match name {
        "Array" | "array" => match type_args.len() {
            0 => DtsType::Array(Box::new(DtsType::any())),
            _ => DtsType::Array(Box::new(type_args.remove(0))),
        },
        "Object" if type_args.is_empty() => DtsType::any(),
        "Object" => {
            let value_type = type_args.pop().unwrap_or_else(DtsType::any);
            let key_type = match type_args.pop() {
                Some(DtsType::Primitive(Primitive::Number)) => DtsType::Primitive(Primitive::Number),
                _ => DtsType::Primitive(Primitive::String),
            };
            DtsType::Object(vec![ObjectMember::IndexSignature(IndexSignature {
                key_name: "key".to_string(),
                key_type,
                value_type,
            })])
        }
        "Function" => DtsType::named("Function"),
        "Promise" if type_args.is_empty() => DtsType::Named {
            name: "Promise".to_string(),
            type_args: vec![DtsType::any()],
        },
        _ => DtsType::Named {
            name: normalize_namepath(name),
            type_args,
        },
    }
}

/// Turn a JSDoc namepath into a TypeScript entity name.
///
/// `module:pkg/sub~Thing` becomes `sub.Thing`, `external:Foo` becomes `Foo`,
/// and `Outer~Inner` / `Class#member` use `.` as the separator.
pub fn normalize_namepath(name: &str) -> String {
    let mut rest = name;
    for prefix in ["external:", "event:"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }

    let owned;
    if let Some(module) = rest.strip_prefix("module:") {
        let (path, tail) = match module.find(['~', '#']) {
            Some(idx) => module.split_at(idx),
            None => (module, ""),
        };
        let base = path.rsplit('/').next().unwrap_or(path).replace(['-', '@'], "_");
        owned = format!("{base}{tail}");
        rest = &owned;
    }

    rest.replace(['~', '#'], ".")
}

//! AST types for TypeScript declaration files.

use std::fmt;

/// A top-level or namespace-level declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub enum DtsItem {
    Function(DtsFunction),
    Interface(DtsInterface),
    TypeAlias(DtsTypeAlias),
    Class(DtsClass),
    Enum(DtsEnum),
    Variable(DtsVariable),
    Namespace(DtsNamespace),
    Module(DtsModule),
}

impl DtsItem {
    /// The declared identifier of this item.
    pub fn name(&self) -> &str {
        match self {
            DtsItem::Function(f) => &f.name,
            DtsItem::Interface(i) => &i.name,
            DtsItem::TypeAlias(t) => &t.name,
            DtsItem::Class(c) => &c.name,
            DtsItem::Enum(e) => &e.name,
            DtsItem::Variable(v) => &v.name,
            DtsItem::Namespace(ns) => &ns.name,
            DtsItem::Module(m) => &m.name,
        }
    }

    pub fn comment(&self) -> Option<&DocComment> {
        match self {
            DtsItem::Function(f) => f.comment.as_ref(),
            DtsItem::Interface(i) => i.comment.as_ref(),
            DtsItem::TypeAlias(t) => t.comment.as_ref(),
            DtsItem::Class(c) => c.comment.as_ref(),
            DtsItem::Enum(e) => e.comment.as_ref(),
            DtsItem::Variable(v) => v.comment.as_ref(),
            DtsItem::Namespace(ns) => ns.comment.as_ref(),
            DtsItem::Module(m) => m.comment.as_ref(),
        }
    }
}

/// A `/** ... */` documentation comment, one entry per line without the
/// leading ` * `.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocComment {
    pub lines: Vec<String>,
}

impl DocComment {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A function declaration: `declare function name<T>(params): ReturnType;`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsFunction {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

/// An interface declaration: `interface Name<T> extends Base { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsInterface {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<DtsType>,
    pub members: Vec<InterfaceMember>,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

/// A type alias: `type Name<T> = Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsTypeAlias {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: DtsType,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

/// A class declaration: `declare class Name<T> extends Base implements Interface { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsClass {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<DtsType>,
    pub implements: Vec<DtsType>,
    pub members: Vec<ClassMember>,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

/// An enum declaration: `declare const enum Name { A = "a" }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsEnum {
    pub name: String,
    pub members: Vec<EnumMember>,
    pub is_const: bool,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<Literal>,
}

/// A variable declaration: `declare const/var name: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsVariable {
    pub name: String,
    pub kind: VarKind,
    pub ty: Option<DtsType>,
    /// Literal initializer, only meaningful for `const`.
    pub initializer: Option<Literal>,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Const,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Var => write!(f, "var"),
            VarKind::Const => write!(f, "const"),
        }
    }
}

/// A namespace declaration: `declare namespace Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsNamespace {
    pub name: String,
    pub items: Vec<DtsItem>,
    /// Declared inside another namespace or module. A namespace whose only
    /// item is a nested namespace prints with the dotted `A.B` shorthand.
    pub nested: bool,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

/// A module declaration: `declare module "name" { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsModule {
    pub name: String,
    pub items: Vec<DtsItem>,
    pub declare: bool,
    pub comment: Option<DocComment>,
}

/// A generic type parameter with optional constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    /// Optional constraint: `T extends Foo`
    pub constraint: Option<DtsType>,
    /// Optional default: `T = DefaultType`
    pub default: Option<DtsType>,
}

impl TypeParam {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }
}

/// A function/method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: DtsType,
    pub optional: bool,
    pub rest: bool,
}

/// A member of an interface.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceMember {
    Property(PropertyMember),
    Method(MethodMember),
}

/// A property in an interface: `name?: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMember {
    pub name: String,
    pub ty: DtsType,
    pub optional: bool,
    pub readonly: bool,
    pub comment: Option<DocComment>,
}

/// A method in an interface: `name<T>(params): ReturnType;`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMember {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    pub optional: bool,
    pub comment: Option<DocComment>,
}

/// An index signature: `[key: string]: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub key_name: String,
    pub key_type: DtsType,
    pub value_type: DtsType,
}

/// A member of a class.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Property(ClassProperty),
    Method(ClassMethod),
    Constructor(Constructor),
}

/// A property in a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    pub name: String,
    pub ty: Option<DtsType>,
    pub optional: bool,
    pub readonly: bool,
    pub is_static: bool,
    pub visibility: Option<Visibility>,
    pub comment: Option<DocComment>,
}

/// A method in a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMethod {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    pub optional: bool,
    pub is_static: bool,
    pub visibility: Option<Visibility>,
    pub comment: Option<DocComment>,
}

/// A class constructor: `constructor(params);`
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub params: Vec<Param>,
}

/// Visibility modifier for class members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A literal value used by enum members and constant initializers.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Kept as source text so `1.50` and `0x10` survive unchanged.
    Number(String),
    Boolean(bool),
}

/// A TypeScript type.
#[derive(Debug, Clone, PartialEq)]
pub enum DtsType {
    /// A named type with optional type arguments: `Promise<T>`, `Array<T>`
    Named {
        name: String,
        type_args: Vec<DtsType>,
    },
    /// A primitive type: `string`, `number`, `boolean`, `void`, etc.
    Primitive(Primitive),
    /// A string literal type: `"GET"`, `"POST"`
    StringLiteral(String),
    /// A number literal type: `1`, `2`, `3`
    NumberLiteral(String),
    /// A boolean literal type: `true`, `false`
    BooleanLiteral(bool),
    /// A union type: `A | B | C`
    Union(Vec<DtsType>),
    /// A function type: `(a: T, b: U) => R`
    Function(Box<FunctionType>),
    /// An object literal type: `{ key: Type, key2?: Type2 }`
    Object(Vec<ObjectMember>),
    /// An array type: `T[]`
    Array(Box<DtsType>),
}

impl DtsType {
    pub fn any() -> Self {
        DtsType::Primitive(Primitive::Any)
    }

    pub fn named(name: impl Into<String>) -> Self {
        DtsType::Named {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// Build a union, flattening nested unions and collapsing single members.
    pub fn union(types: Vec<DtsType>) -> Self {
        let mut flat: Vec<DtsType> = Vec::with_capacity(types.len());
        let members = types.into_iter().flat_map(|ty| match ty {
            DtsType::Union(inner) => inner,
            other => vec![other],
        });
        for ty in members {
            if !flat.contains(&ty) {
                flat.push(ty);
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            DtsType::Union(flat)
        }
    }
}

/// A primitive TypeScript type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Void,
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    Object,
    Symbol,
    BigInt,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::String => write!(f, "string"),
            Primitive::Number => write!(f, "number"),
            Primitive::Boolean => write!(f, "boolean"),
            Primitive::Void => write!(f, "void"),
            Primitive::Null => write!(f, "null"),
            Primitive::Undefined => write!(f, "undefined"),
            Primitive::Any => write!(f, "any"),
            Primitive::Unknown => write!(f, "unknown"),
            Primitive::Never => write!(f, "never"),
            Primitive::Object => write!(f, "object"),
            Primitive::Symbol => write!(f, "symbol"),
            Primitive::BigInt => write!(f, "bigint"),
        }
    }
}

/// A function type: `(params) => ReturnType`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Vec<Param>,
    pub return_type: Box<DtsType>,
    /// If this function has a `this` parameter
    pub this_param: Option<Box<DtsType>>,
}

/// A member of an object literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Property {
        name: String,
        ty: DtsType,
        optional: bool,
    },
    IndexSignature(IndexSignature),
}

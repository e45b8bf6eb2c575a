//! A small declaration model of the generated source units.
//!
//! Generators build [SourceUnit]s out of these nodes and a [crate::render::Syntax]
//! turns them into text, so what gets emitted can be inspected without comparing strings.

/// A generated source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// File stem, e.g. `TokenFaucet` or `index`.
    pub name: String,
    /// Whether the unit starts with the "do not edit" banner.
    pub autogenerated: bool,
    pub items: Vec<Item>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            autogenerated: true,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.items.iter().find_map(|item| match item {
            Item::Namespace(ns) if ns.name == name => Some(ns),
            _ => None,
        })
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.items.iter().find_map(|item| match item {
            Item::Class(class) if class.name == name => Some(class),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.items.iter().find_map(|item| match item {
            Item::Function(function) if function.name == name => Some(function),
            _ => None,
        })
    }

    pub fn type_alias(&self, name: &str) -> Option<&TypeAlias> {
        find_type_alias(&self.items, name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.items.iter().find_map(|item| match item {
            Item::Variable(var) if var.name == name => Some(var),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn re_exports(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::ReExport(path) => Some(path.as_str()),
            _ => None,
        })
    }
}

fn find_type_alias<'a>(items: &'a [Item], name: &str) -> Option<&'a TypeAlias> {
    items.iter().find_map(|item| match item {
        Item::TypeAlias(alias) if alias.name == name => Some(alias),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Import(Import),
    /// `export * from "<path>"`
    ReExport(String),
    /// A line comment.
    Comment(String),
    Namespace(Namespace),
    TypeAlias(TypeAlias),
    Interface(Interface),
    Class(Class),
    Variable(Variable),
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub kind: ImportKind,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportKind {
    Named(Vec<String>),
    /// `import { default as <name> } from ...`
    Default(String),
}

impl Import {
    pub fn named<I, S>(names: I, from: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ImportKind::Named(names.into_iter().map(Into::into).collect()),
            from: from.into(),
        }
    }

    pub fn default_as(name: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            kind: ImportKind::Default(name.into()),
            from: from.into(),
        }
    }
}

/// An exported namespace holding type declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub items: Vec<Item>,
}

impl Namespace {
    pub fn type_alias(&self, name: &str) -> Option<&TypeAlias> {
        find_type_alias(&self.items, name)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.items.iter().find_map(|item| match item {
            Item::Interface(interface) if interface.name == name => Some(interface),
            _ => None,
        })
    }

    /// Names of every type declared in the namespace, in declaration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Item::TypeAlias(alias) => Some(alias.name.as_str()),
                Item::Interface(interface) => Some(interface.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    pub exported: bool,
    /// Generic parameters as written, e.g. `T extends keyof CallMethodTable`.
    pub generics: Vec<String>,
    pub ty: TsType,
}

impl TypeAlias {
    pub fn exported(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            exported: true,
            generics: Vec::new(),
            ty,
        }
    }

    pub fn with_generic(mut self, generic: impl Into<String>) -> Self {
        self.generics.push(generic.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub exported: bool,
    pub members: Vec<PropertySig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySig {
    pub name: String,
    pub optional: bool,
    pub ty: TsType,
}

impl PropertySig {
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            optional: false,
            ty,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            optional: true,
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub exported: bool,
    pub extends: Option<TsType>,
    pub members: Vec<ClassMember>,
}

impl Class {
    pub fn member(&self, name: &str) -> Option<&ClassMember> {
        self.members.iter().find(|member| member.name() == name)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(ClassMember::name).collect()
    }

    /// Keys of an object-valued property such as `tests` or `methods`.
    pub fn property_keys(&self, name: &str) -> Vec<&str> {
        match self.member(name) {
            Some(ClassMember::Property {
                value: Expr::Object(entries),
                ..
            }) => entries
                .iter()
                .filter_map(|entry| match entry {
                    ObjectEntry::Field(key, _) => Some(key.as_str()),
                    ObjectEntry::Spread(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Constructor { params: Vec<Param>, body: Vec<Stmt> },
    Method(Method),
    Property { name: String, value: Expr },
}

impl ClassMember {
    pub fn name(&self) -> &str {
        match self {
            ClassMember::Constructor { .. } => "constructor",
            ClassMember::Method(method) => &method.name,
            ClassMember::Property { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub is_static: bool,
    pub is_async: bool,
    pub generics: Vec<String>,
    pub params: Vec<Param>,
    pub ret: Option<TsType>,
    pub body: Vec<Stmt>,
}

impl Method {
    pub fn new(name: impl Into<String>, params: Vec<Param>, ret: TsType, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            is_async: false,
            generics: Vec::new(),
            params,
            ret: Some(ret),
            body,
        }
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub exported: bool,
    pub generics: Vec<String>,
    pub params: Vec<Param>,
    pub ret: Option<TsType>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub optional: bool,
    pub ty: Option<TsType>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            optional: false,
            ty: Some(ty),
        }
    }

    pub fn optional(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            optional: true,
            ty: Some(ty),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            ty: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub exported: bool,
    pub kind: VarKind,
    pub ty: Option<TsType>,
    pub value: Expr,
}

impl Variable {
    pub fn constant(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            exported: false,
            kind: VarKind::Const,
            ty: None,
            value,
        }
    }

    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Return(Expr),
    Expr(Expr),
    Variable(Variable),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    Throw(Expr),
}

impl Stmt {
    pub fn if_then(cond: Expr, then: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then,
            otherwise: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An identifier or a dotted path such as `this.contract`.
    Ident(String),
    Str(String),
    /// A big integer literal, holding its decimal digits.
    BigInt(String),
    Bool(bool),
    Number(i64),
    Undefined,
    Array(Vec<Expr>),
    Object(Vec<ObjectEntry>),
    Call {
        callee: Box<Expr>,
        type_args: Vec<TsType>,
        args: Vec<Expr>,
    },
    New {
        class: String,
        type_args: Vec<TsType>,
        args: Vec<Expr>,
    },
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Arrow(Box<Arrow>),
    Await(Box<Expr>),
    As(Box<Expr>, TsType),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Assign,
    StrictEq,
    Gt,
    Or,
    Add,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Assign => "=",
            BinOp::StrictEq => "===",
            BinOp::Gt => ">",
            BinOp::Or => "||",
            BinOp::Add => "+",
        }
    }
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(Expr::ident(callee)),
            type_args: Vec::new(),
            args,
        }
    }

    pub fn call_generic(
        callee: impl Into<String>,
        type_args: Vec<TsType>,
        args: Vec<Expr>,
    ) -> Self {
        Expr::Call {
            callee: Box::new(Expr::ident(callee)),
            type_args,
            args,
        }
    }

    pub fn method_call(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(self.member(method)),
            type_args: Vec::new(),
            args,
        }
    }

    pub fn new_instance(class: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::New {
            class: class.into(),
            type_args: Vec::new(),
            args,
        }
    }

    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member(Box::new(self), name.into())
    }

    pub fn index(self, key: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(key))
    }

    pub fn awaited(self) -> Self {
        Expr::Await(Box::new(self))
    }

    pub fn cast(self, ty: TsType) -> Self {
        Expr::As(Box::new(self), ty)
    }

    pub fn paren(self) -> Self {
        Expr::Paren(Box::new(self))
    }

    pub fn binary(self, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(self), op, Box::new(rhs))
    }

    pub fn strict_eq(self, rhs: Expr) -> Self {
        self.binary(BinOp::StrictEq, rhs)
    }

    pub fn cond(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Cond(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Expr)>,
        K: Into<String>,
    {
        Expr::Object(
            fields
                .into_iter()
                .map(|(key, value)| ObjectEntry::Field(key.into(), value))
                .collect(),
        )
    }

    pub fn arrow(arrow: Arrow) -> Self {
        Expr::Arrow(Box::new(arrow))
    }

    pub fn empty_object() -> Self {
        Expr::Object(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    Field(String, Expr),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub is_async: bool,
    pub params: Vec<Param>,
    pub ret: Option<TsType>,
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Expr),
    Block(Vec<Stmt>),
}

/// A type expression of the target language.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Named(String),
    Generic(String, Vec<TsType>),
    Tuple(Vec<TsType>),
    Object(Vec<PropertySig>),
    Union(Vec<TsType>),
    StrLit(String),
    Array(Box<TsType>),
    /// Mapped and indexed types that have no dedicated node.
    Raw(String),
}

impl TsType {
    pub fn named(name: impl Into<String>) -> Self {
        TsType::Named(name.into())
    }

    pub fn generic(name: impl Into<String>, args: Vec<TsType>) -> Self {
        TsType::Generic(name.into(), args)
    }

    pub fn raw(text: impl Into<String>) -> Self {
        TsType::Raw(text.into())
    }

    pub fn empty_object() -> Self {
        TsType::Object(Vec::new())
    }

    /// `Omit<ty, "key1" | "key2">`
    pub fn omit(ty: TsType, keys: &[&str]) -> Self {
        let keys = keys.iter().map(|key| TsType::StrLit(key.to_string())).collect::<Vec<_>>();
        let keys = match <[TsType; 1]>::try_from(keys) {
            Ok([key]) => key,
            Err(keys) => TsType::Union(keys),
        };
        TsType::generic("Omit", vec![ty, keys])
    }

    pub fn promise(ty: TsType) -> Self {
        TsType::generic("Promise", vec![ty])
    }
}

impl From<Import> for Item {
    fn from(import: Import) -> Self {
        Item::Import(import)
    }
}

impl From<Namespace> for Item {
    fn from(ns: Namespace) -> Self {
        Item::Namespace(ns)
    }
}

impl From<TypeAlias> for Item {
    fn from(alias: TypeAlias) -> Self {
        Item::TypeAlias(alias)
    }
}

impl From<Interface> for Item {
    fn from(interface: Interface) -> Self {
        Item::Interface(interface)
    }
}

impl From<Class> for Item {
    fn from(class: Class) -> Self {
        Item::Class(class)
    }
}

impl From<Variable> for Item {
    fn from(var: Variable) -> Self {
        Item::Variable(var)
    }
}

impl From<Function> for Item {
    fn from(function: Function) -> Self {
        Item::Function(function)
    }
}

impl From<Method> for ClassMember {
    fn from(method: Method) -> Self {
        ClassMember::Method(method)
    }
}

//! AST for the supported subset: import statements plus one function
//! definition whose parameters carry type annotations.

/// One `import a, b as c` or `from a import b, c as d` statement.
#[derive(Debug, Clone)]
pub enum ImportStmt {
    Import(Vec<(String, Option<String>)>),
    From { module: String, names: Vec<(String, Option<String>)> },
}

/// How a parameter participates in the call signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Normal,
    PositionalOnlyMarker,
    VarArgs,
    KwArgs,
    KeywordOnlyMarker,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub has_default: bool,
    pub kind: ParamKind,
}

/// A type annotation expression: a bare name, a subscripted generic
/// (`list[int]`, `Optional[str]`, …), or a literal value (only meaningful
/// inside a `Literal[...]` subscript).
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Name(String),
    Subscript(Box<TypeExpr>, Vec<TypeExpr>),
    LiteralStr(String),
    LiteralNum(String),
    LiteralBool(bool),
    LiteralNone,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_annotation: Option<TypeExpr>,
    pub docstring: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Module {
    pub imports: Vec<ImportStmt>,
    pub function: FunctionDef,
}

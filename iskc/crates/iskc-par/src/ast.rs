//! iskc-par - AST Node Definitions
//!
//! This module contains all AST node definitions produced by the parser.
//! Rules, statements, expressions, literals and type references are
//! closed sums; downstream stages match exhaustively so the compiler
//! flags missing cases when the language grows.
//!
//! Nodes carry no source spans: parser diagnostics are reported from
//! token spans before the AST exists, and analyzer diagnostics name the
//! offending element instead of a location. That also gives the module
//! merger its structural equality for free.

use indexmap::IndexMap;
use iskc_util::Symbol;

/// A parsed source module: every declaration in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    /// Optional `module <name>` header
    pub name: Option<Symbol>,
    /// Import declarations
    pub imports: Vec<Import>,
    /// Fact declarations (read-only inputs)
    pub facts: Vec<Fact>,
    /// Global declarations (read-only ambient values, `@`-referenced)
    pub globals: Vec<Global>,
    /// Output declarations (writable results)
    pub outputs: Vec<Output>,
    /// Module-level data tables
    pub data_tables: Vec<DataTable>,
    /// Rule definitions
    pub rules: Vec<Rule>,
}

/// `alias := qualified.type.Name`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub alias: Symbol,
    /// Dotted path identifying a host-language type
    pub qualified_name: String,
    pub description: Option<String>,
}

/// A typed read-only input, bound at construction of the generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub description: Option<String>,
}

/// A typed read-only ambient value, referenced as `@name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub description: Option<String>,
}

/// A writable result, exposed through a generated getter.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub initial_value: Option<Expr>,
    pub description: Option<String>,
}

/// An ordered list of rows over a fixed column set.
///
/// The first row's keys define the columns; the parser rejects rows
/// whose keys differ. Tables embedded in template rules take the rule's
/// id.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub id: Symbol,
    pub rows: Vec<DataRow>,
}

impl DataTable {
    /// The column names, taken from the first row.
    pub fn columns(&self) -> Vec<Symbol> {
        self.rows
            .first()
            .map(|row| row.cells.keys().copied().collect())
            .unwrap_or_default()
    }
}

/// One row: ordered mapping from column name to literal expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub cells: IndexMap<Symbol, Expr>,
}

/// Reference to a host type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// `Name` or `qualified.Name`
    Simple(String),
    /// `T[]`
    List(Box<TypeRef>),
    /// `T{}`
    Set(Box<TypeRef>),
    /// `[K:V]`
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    /// Canonical textual form, the shape the code generator consumes.
    pub fn render(&self) -> String {
        match self {
            TypeRef::Simple(name) => name.clone(),
            TypeRef::List(element) => format!("{}[]", element.render()),
            TypeRef::Set(element) => format!("{}{{}}", element.render()),
            TypeRef::Map(key, value) => format!("[{}:{}]", key.render(), value.render()),
        }
    }
}

/// A rule definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Simple(SimpleRule),
    Template(TemplateRule),
    DecisionTable(DecisionTableRule),
}

impl Rule {
    /// The rule's id, whatever its kind.
    pub fn id(&self) -> Symbol {
        match self {
            Rule::Simple(rule) => rule.id,
            Rule::Template(rule) => rule.id,
            Rule::DecisionTable(rule) => rule.id,
        }
    }
}

/// `rule <id> when … then … (else …)? end`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRule {
    pub id: Symbol,
    pub description: Option<String>,
    pub when: Vec<Statement>,
    pub then: Vec<Statement>,
    pub else_branch: Vec<Statement>,
}

/// `template rule <id> data table { … } when … then … end`
///
/// The table's column names are in scope inside `when` and `then`; the
/// generator clones the rule once per row.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRule {
    pub id: Symbol,
    pub description: Option<String>,
    /// `None` when the `data table` clause is missing entirely; the
    /// analyzer rejects that case
    pub data_table: Option<DataTable>,
    pub when: Vec<Statement>,
    pub then: Vec<Statement>,
}

/// `decision table <id> { … } where alias := […], …`
///
/// Alias blocks referenced from column headers are inlined into the rows
/// at parse time; the `aliases` map is retained for tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTableRule {
    pub id: Symbol,
    pub description: Option<String>,
    pub rows: Vec<DecisionRow>,
    pub aliases: IndexMap<Symbol, Block>,
}

/// One decision-table row: a conjunction of conditions and a list of
/// actions. Wildcard cells were dropped by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub id: String,
    pub when: Vec<Statement>,
    pub then: Vec<Statement>,
}

/// A statement in a rule section or block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let <name> := <expr>` - introduces a local binding
    Let(LetStatement),
    /// A bare expression
    Expr(Expr),
}

/// `let <name> := <expr>`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Symbol,
    pub expr: Expr,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A name; `global` marks the `@` sigil form
    Identifier(IdentExpr),
    Literal(Literal),
    Binary(BinaryExpr),
    /// `target := value`; target is an identifier or a navigation
    Assignment(AssignExpr),
    /// `receiver.prop1.prop2…`
    Navigation(NavExpr),
    /// Smalltalk-style message send
    MessageSend(MessageExpr),
    /// First-class block
    Block(Block),
    /// Comma-combined expressions, used in `when` conditions
    Sequence(Vec<Expr>),
}

/// A plain or `@`-prefixed name.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr {
    pub name: Symbol,
    /// True if written `@name` (a global reference)
    pub global: bool,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    /// Arbitrary-precision decimal, kept as normalized text
    Number(String),
    Bool(bool),
    Null,
    /// `#(…)`
    List(Vec<Expr>),
    /// `#{…}`
    Set(Vec<Expr>),
    /// `#[k: v, …]`
    Map(Vec<(Expr, Expr)>),
    /// `$"text ${expr} …"`
    Interpolated(Vec<StringPart>),
}

/// One segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    Expr(Expr),
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// True for the operators that yield a boolean.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq
        )
    }

    /// Source spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::NotEq => "~=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// `left <op> right`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinOp,
    pub right: Box<Expr>,
}

/// `target := value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

/// `receiver.a.b.c`
#[derive(Debug, Clone, PartialEq)]
pub struct NavExpr {
    pub receiver: Box<Expr>,
    pub path: Vec<Symbol>,
}

/// `receiver selector`
#[derive(Debug, Clone, PartialEq)]
pub struct MessageExpr {
    pub receiver: Box<Expr>,
    pub selector: Selector,
}

/// Message selector shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// `receiver name`
    Unary(Symbol),
    /// `receiver k1: a k2: b` - one message, ordered parts
    Keyword(Vec<KeywordPart>),
    /// `receiver !` - apply with no name
    Default,
}

/// One `keyword: argument` pair of a keyword message.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordPart {
    pub keyword: Symbol,
    pub argument: Expr,
}

/// `[:p1 :p2 | statements]`, `[| expr]` (parameter `it`), `[…]`, `{…}`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub parameters: Vec<Symbol>,
    pub statements: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_render() {
        assert_eq!(TypeRef::Simple("Money".into()).render(), "Money");
        assert_eq!(
            TypeRef::List(Box::new(TypeRef::Simple("Item".into()))).render(),
            "Item[]"
        );
        assert_eq!(
            TypeRef::Set(Box::new(TypeRef::Simple("Tag".into()))).render(),
            "Tag{}"
        );
        assert_eq!(
            TypeRef::Map(
                Box::new(TypeRef::Simple("String".into())),
                Box::new(TypeRef::Simple("Money".into()))
            )
            .render(),
            "[String:Money]"
        );
    }

    #[test]
    fn test_nested_type_ref_render() {
        let nested = TypeRef::List(Box::new(TypeRef::Map(
            Box::new(TypeRef::Simple("String".into())),
            Box::new(TypeRef::Simple("Item".into())),
        )));
        assert_eq!(nested.render(), "[String:Item][]");
    }

    #[test]
    fn test_binop_classification() {
        assert!(BinOp::Eq.is_comparison());
        assert!(BinOp::GtEq.is_comparison());
        assert!(!BinOp::Add.is_comparison());
        assert!(!BinOp::Div.is_comparison());
    }

    #[test]
    fn test_data_table_columns() {
        let mut cells = IndexMap::new();
        cells.insert(Symbol::intern("category"), Expr::Literal(Literal::Str("A".into())));
        cells.insert(Symbol::intern("pct"), Expr::Literal(Literal::Number("10".into())));
        let table = DataTable {
            id: Symbol::intern("rates"),
            rows: vec![DataRow { cells }],
        };
        assert_eq!(
            table.columns(),
            vec![Symbol::intern("category"), Symbol::intern("pct")]
        );
    }

    #[test]
    fn test_empty_table_has_no_columns() {
        let table = DataTable {
            id: Symbol::intern("t"),
            rows: vec![],
        };
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_rule_id_accessor() {
        let rule = Rule::Simple(SimpleRule {
            id: Symbol::intern("R1"),
            description: None,
            when: vec![],
            then: vec![],
            else_branch: vec![],
        });
        assert_eq!(rule.id(), Symbol::intern("R1"));
    }

    #[test]
    fn test_structural_equality_ignores_nothing() {
        let a = Import {
            alias: Symbol::intern("Money"),
            qualified_name: "java.math.BigDecimal".into(),
            description: None,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}

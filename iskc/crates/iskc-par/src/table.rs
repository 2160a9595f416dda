//! Pipe-table reading.
//!
//! Both data tables and decision tables use a pipe-delimited body:
//!
//! ```text
//! data table rates {          decision table D
//! | category | pct |          {
//! | "A"      | 10  |          | ID 2+| WHEN 2+| THEN
//! | "B"      | 20  |          | h| age h| status h| discount h| message
//! }                           | A | < 30  | "active" | 10 | "y" |
//!                             | B | >= 65 | *        | 15 | "s" |
//!                             }
//! ```
//!
//! Rows are scanned at the token level into raw cells (the text between
//! pipes, sliced back out of the source by span), because decision-table
//! cells are not expressions on their own: a cell like `>= 65` is
//! combined with its column header by textual concatenation and then
//! re-parsed through the expression fragment entry, under the module's
//! configured locale.
//!
//! HEADER MARKERS BIND FORWARD:
//! ----------------------------
//! In the region row, a `N+` trailer gives the column span of the
//! *following* region (`| ID 2+| WHEN …` = the WHEN region spans two
//! columns). In the structure row, a trailing `h` marks the *next*
//! column as an expression column. Both markers sit just before the `|`
//! that introduces what they describe.
//!
//! CELL COMBINATION:
//! -----------------
//! An expression column's cell is prefixed with its header. When the
//! cell does not itself lead with a comparison operator or `:=`, the
//! reader inserts `=` (WHEN region) or `:=` (THEN region), so a bare
//! value cell means an equality test or an assignment. Alias columns
//! (`#name` headers) instead feed the cell to the named block: the cell
//! becomes the block's first parameter, or, for parameterless blocks,
//! the block body is inlined as-is. Empty cells and `*` are wildcards
//! and contribute nothing.

use crate::ast::{Block, DataRow, DataTable, DecisionRow, Expr, LetStatement, Statement};
use crate::{ParseOptions, Parser};
use indexmap::IndexMap;
use iskc_lex::{Lexer, TokenKind};
use iskc_util::{Handler, Outcome, Span, Symbol};

/// A table body before interpretation: rows of trimmed cell text.
pub(crate) struct RawTable {
    pub rows: Vec<RawRow>,
    /// Span of the opening brace, for table-level diagnostics
    pub span: Span,
}

pub(crate) struct RawRow {
    pub cells: Vec<RawCell>,
    pub span: Span,
}

pub(crate) struct RawCell {
    pub text: String,
    pub span: Span,
}

impl RawCell {
    /// True for `*` or an empty cell.
    fn is_wildcard(&self) -> bool {
        self.text.is_empty() || self.text == "*"
    }
}

/// Which structural region a decision-table column belongs to.
#[derive(Clone, Copy, PartialEq)]
enum Region {
    When,
    Then,
}

/// Interpreted header of one decision-table column.
enum ColumnHeader {
    /// `h|`-marked: combine header text with the cell and re-parse
    Expression(String),
    /// `#name`: feed the cell to the alias block
    Alias(Symbol),
    /// Unmarked: the cell is a complete expression on its own
    Plain,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Raw scanning
    // ------------------------------------------------------------------

    /// `{ | … | … }` into raw rows.
    pub(crate) fn parse_raw_table(&mut self) -> Option<RawTable> {
        let open = self.expect(&TokenKind::LBrace)?;
        let mut rows = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.check(&TokenKind::Pipe) {
                rows.push(self.parse_raw_row());
            } else {
                let message = format!("expected a table row, found {}", self.peek());
                self.error_here(message);
                self.recover_table_row();
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace)?;
        Some(RawTable {
            rows,
            span: open.span,
        })
    }

    /// One `| cell | cell |` row. Cells are the segments between pipes;
    /// the segment after the last pipe counts only if non-empty, so a
    /// trailing `|` does not create a phantom cell.
    fn parse_raw_row(&mut self) -> RawRow {
        let row_span = self.current_span();
        self.advance(); // leading '|'
        let mut cells = Vec::new();
        loop {
            let cell = self.collect_cell();
            if self.eat(&TokenKind::Pipe) {
                cells.push(cell);
                continue;
            }
            if !cell.text.is_empty() {
                cells.push(cell);
            }
            break;
        }
        RawRow {
            cells,
            span: row_span,
        }
    }

    /// Tokens up to the next `|`, line break, or closing brace, sliced
    /// back out of the source.
    fn collect_cell(&mut self) -> RawCell {
        let mut first: Option<Span> = None;
        let mut last = self.current_span();
        while !matches!(
            self.peek(),
            TokenKind::Pipe | TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            let token = self.advance();
            if first.is_none() {
                first = Some(token.span);
            }
            last = token.span;
        }
        match first {
            Some(first_span) => {
                let span = first_span.to(last);
                let text = self.source[span.start..span.end].trim().to_owned();
                RawCell { text, span }
            }
            None => RawCell {
                text: String::new(),
                span: self.current_span(),
            },
        }
    }

    /// Skip a malformed row: to the next line break or closing brace.
    fn recover_table_row(&mut self) {
        while !matches!(
            self.peek(),
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            self.advance();
        }
    }

    // ------------------------------------------------------------------
    // Data tables
    // ------------------------------------------------------------------

    /// Module-level `data table <id> { … }`.
    pub(crate) fn parse_module_data_table(&mut self) -> Option<DataTable> {
        self.advance(); // 'data'
        self.expect(&TokenKind::Table)?;
        let id = self.expect_identifier("data table id")?;
        self.skip_newlines();
        self.parse_data_table_body(id)
    }

    /// `{ … }` of a data table: first row names the columns, body rows
    /// hold literal cells.
    pub(crate) fn parse_data_table_body(&mut self, id: Symbol) -> Option<DataTable> {
        let raw = self.parse_raw_table()?;
        let mut rows_iter = raw.rows.iter();

        let columns: Vec<Symbol> = match rows_iter.next() {
            Some(header) => header
                .cells
                .iter()
                .map(|cell| Symbol::intern(cell.text.trim_matches('`')))
                .collect(),
            None => {
                return Some(DataTable { id, rows: vec![] });
            }
        };

        let mut rows = Vec::new();
        for raw_row in rows_iter {
            if raw_row.cells.len() != columns.len() {
                self.handler
                    .error(format!(
                        "table row has {} cells but the table declares {} columns",
                        raw_row.cells.len(),
                        columns.len()
                    ))
                    .at(self.location(raw_row.span))
                    .emit();
                continue;
            }
            let mut cells = IndexMap::new();
            for (column, cell) in columns.iter().zip(&raw_row.cells) {
                if let Some(expr) = self.reparse_cell(&cell.text, cell.span, "table cell") {
                    cells.insert(*column, expr);
                }
            }
            rows.push(DataRow { cells });
        }

        Some(DataTable { id, rows })
    }

    // ------------------------------------------------------------------
    // Decision tables
    // ------------------------------------------------------------------

    /// Interpret a raw decision-table body: region row, structure row,
    /// then one [`DecisionRow`] per body row.
    pub(crate) fn build_decision_rows(
        &mut self,
        raw: &RawTable,
        aliases: &IndexMap<Symbol, Block>,
    ) -> Vec<DecisionRow> {
        let Some((when_columns, then_columns)) = self.read_region_row(raw) else {
            return Vec::new();
        };
        let column_count = 1 + when_columns + then_columns;

        let Some(headers) = self.read_structure_row(raw, column_count) else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for raw_row in raw.rows.iter().skip(2) {
            if raw_row.cells.len() != column_count {
                self.handler
                    .error(format!(
                        "decision table row has {} cells but the header declares {} columns",
                        raw_row.cells.len(),
                        column_count
                    ))
                    .at(self.location(raw_row.span))
                    .emit();
                continue;
            }

            let id = raw_row.cells[0].text.trim_matches('"').to_owned();
            let mut when = Vec::new();
            let mut then = Vec::new();

            for (index, cell) in raw_row.cells.iter().enumerate().skip(1) {
                if cell.is_wildcard() {
                    continue;
                }
                let region = if index <= when_columns {
                    Region::When
                } else {
                    Region::Then
                };
                let target = match region {
                    Region::When => &mut when,
                    Region::Then => &mut then,
                };
                self.expand_cell(&headers[index], region, cell, aliases, target);
            }

            rows.push(DecisionRow { id, when, then });
        }
        rows
    }

    /// First row: `| ID 2+| WHEN 2+| THEN`. Returns the WHEN and THEN
    /// column counts. The `N+` trailer of a cell spans the *next*
    /// region.
    fn read_region_row(&mut self, raw: &RawTable) -> Option<(usize, usize)> {
        let Some(region_row) = raw.rows.first() else {
            self.handler
                .error("decision table has no header row")
                .at(self.location(raw.span))
                .emit();
            return None;
        };

        let mut names = Vec::new();
        let mut pending_span = 1usize;
        for cell in &region_row.cells {
            let mut parts = cell.text.split_whitespace();
            let name = parts.next().unwrap_or("").to_ascii_uppercase();
            names.push((name, pending_span));
            pending_span = match parts.next() {
                Some(marker) => marker
                    .strip_suffix('+')
                    .and_then(|n| n.parse::<usize>().ok())
                    .unwrap_or(1),
                None => 1,
            };
        }

        let valid = names.len() == 3
            && names[0].0 == "ID"
            && names[1].0 == "WHEN"
            && names[2].0 == "THEN";
        if !valid {
            self.handler
                .error("decision table header must declare ID, WHEN and THEN regions")
                .at(self.location(region_row.span))
                .emit();
            return None;
        }

        Some((names[1].1, names[2].1))
    }

    /// Second row: column headers, with trailing `h` markers flagging
    /// the following column as an expression column.
    fn read_structure_row(
        &mut self,
        raw: &RawTable,
        column_count: usize,
    ) -> Option<Vec<ColumnHeader>> {
        let Some(structure_row) = raw.rows.get(1) else {
            self.handler
                .error("decision table has no structure row")
                .at(self.location(raw.span))
                .emit();
            return None;
        };
        if structure_row.cells.len() != column_count {
            self.handler
                .error(format!(
                    "structure row has {} cells but the header declares {} columns",
                    structure_row.cells.len(),
                    column_count
                ))
                .at(self.location(structure_row.span))
                .emit();
            return None;
        }

        let mut headers = Vec::with_capacity(column_count);
        let mut next_is_expression = false;
        for cell in &structure_row.cells {
            let mut text = cell.text.clone();
            let marked = text == "h" || text.ends_with(" h") || text.ends_with("\th");
            if marked {
                text = text[..text.len() - 1].trim_end().to_owned();
            }
            let header = if let Some(alias) = text.strip_prefix('#') {
                ColumnHeader::Alias(Symbol::intern(alias.trim().trim_matches('`')))
            } else if next_is_expression && !text.is_empty() {
                ColumnHeader::Expression(text)
            } else {
                ColumnHeader::Plain
            };
            headers.push(header);
            next_is_expression = marked;
        }
        Some(headers)
    }

    /// Turn one non-wildcard cell into statements for its region.
    fn expand_cell(
        &mut self,
        header: &ColumnHeader,
        region: Region,
        cell: &RawCell,
        aliases: &IndexMap<Symbol, Block>,
        target: &mut Vec<Statement>,
    ) {
        match header {
            ColumnHeader::Alias(name) => {
                let Some(block) = aliases.get(name) else {
                    self.handler
                        .error(format!("unknown alias '#{}'", name))
                        .at(self.location(cell.span))
                        .emit();
                    return;
                };
                if block.parameters.is_empty() {
                    target.extend(block.statements.iter().cloned());
                } else if let Some(argument) =
                    self.reparse_cell(&cell.text, cell.span, "alias argument")
                {
                    target.push(Statement::Let(LetStatement {
                        name: block.parameters[0],
                        expr: argument,
                    }));
                    target.extend(block.statements.iter().cloned());
                }
            }
            ColumnHeader::Expression(header_text) => {
                let combined = if self.cell_leads_with_operator(&cell.text) {
                    format!("{} {}", header_text, cell.text)
                } else {
                    let operator = match region {
                        Region::When => "=",
                        Region::Then => ":=",
                    };
                    format!("{} {} {}", header_text, operator, cell.text)
                };
                if let Some(expr) = self.reparse_cell(&combined, cell.span, "table cell") {
                    target.push(Statement::Expr(expr));
                }
            }
            ColumnHeader::Plain => {
                if let Some(expr) = self.reparse_cell(&cell.text, cell.span, "table cell") {
                    target.push(Statement::Expr(expr));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Cell re-parsing
    // ------------------------------------------------------------------

    /// Re-parse cell text through the expression fragment entry, under
    /// the module's locale. A failure becomes one error at the cell's
    /// original location.
    fn reparse_cell(&mut self, text: &str, span: Span, what: &str) -> Option<Expr> {
        let options = ParseOptions {
            locale: self.options.locale,
            source_type: self.options.source_type,
            source_name: self.options.source_name.clone(),
        };
        match crate::parse_expression_fragment(text, &options) {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Failure { .. } => {
                self.handler
                    .error(format!("invalid {} '{}'", what, text))
                    .at(self.location(span))
                    .emit();
                None
            }
        }
    }

    /// True when the cell's first token is a comparison operator or
    /// `:=`, meaning it concatenates with its header as-is.
    fn cell_leads_with_operator(&self, text: &str) -> bool {
        let scratch = Handler::new();
        let tokens = Lexer::new(text, self.options.locale, "<cell>", &scratch).tokenize();
        matches!(
            tokens.first().map(|t| &t.kind),
            Some(
                TokenKind::Eq
                    | TokenKind::NotEq
                    | TokenKind::Lt
                    | TokenKind::LtEq
                    | TokenKind::Gt
                    | TokenKind::GtEq
                    | TokenKind::Assign
            )
        )
    }
}

//! Import tables: parsing `use` declarations into alias → FQN maps.
//!
//! Recognized forms:
//!
//! ```text
//! use App\Model\User;
//! use App\Model\User as U, App\Http\Request;
//! use function App\helpers\format;
//! use const App\VERSION;
//! use App\Model\{User, Post as Article, function helper};
//! ```
//!
//! Trait imports inside class bodies and closure `use (...)` clauses are not
//! import declarations and are skipped by [`import_use_indexes`].

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::syntax::{TokenKind, TokenStream};

use super::name_ref::NAMESPACE_SEPARATOR;

/// What an import declaration binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// Classes, interfaces, traits and enums (plain `use`).
    Class,
    /// `use function`
    Function,
    /// `use const`
    Const,
}

/// One alias bound by a `use` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImportDecl {
    pub alias: SmolStr,
    pub full_name: SmolStr,
    pub kind: ImportKind,
}

impl ImportDecl {
    /// Create a declaration, defaulting the alias to the last segment.
    ///
    /// A leading `\` on `full_name` is dropped.
    pub fn new(full_name: &str, alias: Option<SmolStr>, kind: ImportKind) -> Self {
        let full_name = full_name.trim_start_matches(NAMESPACE_SEPARATOR);
        let alias = alias.unwrap_or_else(|| SmolStr::new(last_segment(full_name)));
        Self {
            alias,
            full_name: SmolStr::new(full_name),
            kind,
        }
    }

    /// Whether the alias differs from the imported name's last segment.
    pub fn is_aliased(&self) -> bool {
        self.alias != last_segment(&self.full_name)
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(name)
}

type AliasMap = IndexMap<SmolStr, ImportDecl, FxBuildHasher>;

/// Alias → declaration maps for one token stream, one map per [`ImportKind`].
///
/// When two declarations share an alias the later one wins. Iteration order
/// follows the first declaration of each alias.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportTable {
    classes: AliasMap,
    functions: AliasMap,
    constants: AliasMap,
}

impl ImportTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the import positions of `stream` and build its table.
    pub fn from_stream(stream: &TokenStream) -> Self {
        Self::build(stream, &import_use_indexes(stream))
    }

    /// Build a table from the `use` statements starting at `use_indexes`.
    ///
    /// Statements that do not parse are skipped.
    pub fn build(stream: &TokenStream, use_indexes: &[usize]) -> Self {
        let mut table = Self::new();

        for &index in use_indexes {
            match parse_use_statement(stream, index) {
                Ok(decls) => {
                    for decl in decls {
                        table.insert(decl);
                    }
                }
                Err(Malformed { position }) => {
                    debug!(use_index = index, position, "skipping malformed use statement");
                }
            }
        }

        trace!(
            classes = table.classes.len(),
            functions = table.functions.len(),
            constants = table.constants.len(),
            "built import table"
        );
        table
    }

    fn map(&self, kind: ImportKind) -> &AliasMap {
        match kind {
            ImportKind::Class => &self.classes,
            ImportKind::Function => &self.functions,
            ImportKind::Const => &self.constants,
        }
    }

    /// Add a declaration, replacing any earlier one with the same alias and kind.
    pub fn insert(&mut self, decl: ImportDecl) {
        let map = match decl.kind {
            ImportKind::Class => &mut self.classes,
            ImportKind::Function => &mut self.functions,
            ImportKind::Const => &mut self.constants,
        };
        map.insert(decl.alias.clone(), decl);
    }

    /// Look up a class alias.
    pub fn get(&self, alias: &str) -> Option<&ImportDecl> {
        self.classes.get(alias)
    }

    /// Look up an alias of the given kind.
    pub fn lookup(&self, kind: ImportKind, alias: &str) -> Option<&ImportDecl> {
        self.map(kind).get(alias)
    }

    /// Iterate over all declarations: classes, then functions, then constants.
    pub fn iter(&self) -> impl Iterator<Item = &ImportDecl> {
        self.classes
            .values()
            .chain(self.functions.values())
            .chain(self.constants.values())
    }

    /// Get the number of aliases across all kinds.
    pub fn len(&self) -> usize {
        self.classes.len() + self.functions.len() + self.constants.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positions of `use` keywords that start import declarations.
///
/// Excludes trait `use` inside class-like bodies and closure `use (...)`.
pub fn import_use_indexes(stream: &TokenStream) -> Vec<usize> {
    let mut indexes = Vec::new();
    let mut depth = 0usize;
    // Brace depths of open class-like bodies
    let mut class_bodies: Vec<usize> = Vec::new();
    let mut pending_class = false;

    for (index, token) in stream.iter().enumerate() {
        match token.kind {
            TokenKind::ClassLike => {
                // `Foo::class` is a constant fetch, not a declaration
                let is_class_constant = stream
                    .prev_meaningful(index)
                    .is_some_and(|prev| stream[prev].text().ends_with(':'));
                if !is_class_constant {
                    pending_class = true;
                }
            }
            TokenKind::LBrace => {
                depth += 1;
                if pending_class {
                    class_bodies.push(depth);
                    pending_class = false;
                }
            }
            TokenKind::RBrace => {
                if class_bodies.last() == Some(&depth) {
                    class_bodies.pop();
                }
                depth = depth.saturating_sub(1);
            }
            TokenKind::Semicolon => pending_class = false,
            TokenKind::Use => {
                let after_closure = stream
                    .prev_meaningful(index)
                    .is_some_and(|prev| stream[prev].is(TokenKind::RParen));
                if class_bodies.is_empty() && !after_closure {
                    indexes.push(index);
                }
            }
            _ => {}
        }
    }

    indexes
}

/// A `use` statement that could not be parsed; `position` is the offending token.
struct Malformed {
    position: usize,
}

type Parse<T> = std::result::Result<T, Malformed>;

/// Forward reader over meaningful (non-trivia) tokens.
struct Cursor<'a> {
    stream: &'a TokenStream,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(stream: &'a TokenStream, position: usize) -> Self {
        Self { stream, position }
    }

    fn peek(&self) -> Option<(usize, TokenKind)> {
        let index = self.stream.next_meaningful(self.position)?;
        Some((index, self.stream[index].kind))
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|(_, k)| k == kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        match self.peek() {
            Some((index, k)) if k == kind => {
                self.position = index + 1;
                true
            }
            _ => false,
        }
    }

    fn malformed(&self) -> Malformed {
        Malformed {
            position: self.peek().map_or(self.stream.len(), |(index, _)| index),
        }
    }

    fn kind_marker(&mut self) -> Option<ImportKind> {
        if self.eat(TokenKind::Function) {
            Some(ImportKind::Function)
        } else if self.eat(TokenKind::Const) {
            Some(ImportKind::Const)
        } else {
            None
        }
    }

    /// A contiguous run of name tokens.
    fn name(&mut self) -> Parse<String> {
        let Some((start, kind)) = self.peek() else {
            return Err(self.malformed());
        };
        // A lone reserved word is still a single-segment name (`use App\{Enum}`)
        if !kind.is_name_part() && !kind.is_reserved_word() {
            return Err(self.malformed());
        }

        let mut end = start + 1;
        while self.stream.get(end).is_some_and(|t| t.kind.is_name_part()) {
            end += 1;
        }
        self.position = end;
        Ok(self.stream.text_of(start..end))
    }

    /// An optional `as Alias` clause.
    fn alias(&mut self) -> Parse<Option<SmolStr>> {
        if !self.eat(TokenKind::As) {
            return Ok(None);
        }
        match self.peek() {
            Some((index, kind)) if kind == TokenKind::Ident || kind.is_reserved_word() => {
                self.position = index + 1;
                Ok(Some(self.stream[index].text.clone()))
            }
            _ => Err(self.malformed()),
        }
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some((_, TokenKind::Semicolon)) | Some((_, TokenKind::CloseTag))
        )
    }
}

fn parse_use_statement(stream: &TokenStream, use_index: usize) -> Parse<Vec<ImportDecl>> {
    if !stream.get(use_index).is_some_and(|t| t.is(TokenKind::Use)) {
        return Err(Malformed {
            position: use_index,
        });
    }

    let mut cursor = Cursor::new(stream, use_index + 1);
    let kind = cursor.kind_marker().unwrap_or(ImportKind::Class);
    let mut decls = Vec::new();

    loop {
        let name = cursor.name()?;

        if cursor.eat(TokenKind::LBrace) {
            if !name.ends_with(NAMESPACE_SEPARATOR) {
                return Err(cursor.malformed());
            }
            parse_group(&mut cursor, &name, kind, &mut decls)?;
        } else {
            if name.ends_with(NAMESPACE_SEPARATOR) {
                return Err(cursor.malformed());
            }
            let alias = cursor.alias()?;
            decls.push(ImportDecl::new(&name, alias, kind));
        }

        if cursor.eat(TokenKind::Comma) {
            continue;
        }
        if cursor.at_statement_end() {
            return Ok(decls);
        }
        return Err(cursor.malformed());
    }
}

/// Members of `Prefix\{ ... }` after the opening brace.
fn parse_group(
    cursor: &mut Cursor<'_>,
    prefix: &str,
    kind: ImportKind,
    decls: &mut Vec<ImportDecl>,
) -> Parse<()> {
    loop {
        // Empty group or trailing comma
        if cursor.eat(TokenKind::RBrace) {
            return Ok(());
        }

        let member_kind = cursor.kind_marker().unwrap_or(kind);
        let member = cursor.name()?;
        if member.ends_with(NAMESPACE_SEPARATOR) {
            return Err(cursor.malformed());
        }
        let alias = cursor.alias()?;
        decls.push(ImportDecl::new(&format!("{prefix}{member}"), alias, member_kind));

        if cursor.eat(TokenKind::Comma) {
            continue;
        }
        if cursor.at(TokenKind::RBrace) {
            continue;
        }
        return Err(cursor.malformed());
    }
}

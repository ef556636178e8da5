use super::common::descendants;
use super::symbols::SymbolIndex;
use crate::discovery::Dialect;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Node, Parser as TsParser, Tree};

/// Parser errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to load {dialect:?} grammar: {source}")]
    Language {
        dialect: Dialect,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("Parser produced no tree for {path}")]
    NoTree { path: PathBuf },
    #[error("Syntax error in {path} at line {line}")]
    Syntax { path: PathBuf, line: usize },
}

/// JavaScript/TypeScript parser holding one tree-sitter parser per grammar
pub struct ScriptParser {
    javascript: TsParser,
    typescript: TsParser,
    tsx: TsParser,
}

impl ScriptParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            javascript: Self::parser_for(Dialect::JavaScript)?,
            typescript: Self::parser_for(Dialect::TypeScript)?,
            tsx: Self::parser_for(Dialect::Tsx)?,
        })
    }

    fn parser_for(dialect: Dialect) -> Result<TsParser, ParseError> {
        let language: tree_sitter::Language = match dialect {
            // The JavaScript grammar always accepts JSX
            Dialect::JavaScript | Dialect::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        };

        let mut parser = TsParser::new();
        parser
            .set_language(&language)
            .map_err(|source| ParseError::Language { dialect, source })?;
        Ok(parser)
    }

    /// Parse one text snapshot into a tree plus its symbol index.
    ///
    /// Syntax errors do not fail here; they surface through
    /// [`ParsedModule::syntax_tree`] so the declaration view stays usable.
    pub fn parse<'s>(
        &mut self,
        path: &Path,
        source: &'s str,
        dialect: Dialect,
    ) -> Result<ParsedModule<'s>, ParseError> {
        let parser = match dialect {
            Dialect::JavaScript | Dialect::Jsx => &mut self.javascript,
            Dialect::TypeScript => &mut self.typescript,
            Dialect::Tsx => &mut self.tsx,
        };

        let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
            path: path.to_path_buf(),
        })?;
        let symbols = SymbolIndex::build(tree.root_node(), source);

        Ok(ParsedModule {
            path: path.to_path_buf(),
            source,
            dialect,
            tree,
            symbols,
        })
    }
}

/// A parsed module: one tree, viewed either as generic syntax nodes or
/// through the symbol index of its top-level declarations
pub struct ParsedModule<'s> {
    pub path: PathBuf,
    pub source: &'s str,
    pub dialect: Dialect,
    tree: Tree,
    symbols: SymbolIndex,
}

impl<'s> ParsedModule<'s> {
    /// The raw tree, including any error-recovery nodes
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The generic syntax tree, available only for a clean parse
    pub fn syntax_tree(&self) -> Result<&Tree, ParseError> {
        let root = self.tree.root_node();
        if !root.has_error() {
            return Ok(&self.tree);
        }

        let line = descendants(root)
            .find(|n| n.is_error() || n.is_missing())
            .map(|n| n.start_position().row + 1)
            .unwrap_or(1);

        Err(ParseError::Syntax {
            path: self.path.clone(),
            line,
        })
    }

    /// Name/line-addressable declarations
    pub fn symbols(&self) -> &SymbolIndex {
        &self.symbols
    }
}

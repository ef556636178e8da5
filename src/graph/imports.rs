use crate::parser::{descendants, node_text, string_literal_value};
use tree_sitter::Node;

/// How a module specifier was referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import ... from './x'` or `import './x'`
    Static,
    /// `export ... from './x'`
    ReExport,
    /// `import('./x')`
    Dynamic,
    /// `require('./x')`
    Require,
}

/// A module specifier found in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    pub specifier: String,
    pub kind: ImportKind,
    /// Line number in the source file (1-indexed)
    pub line: usize,
}

impl ImportRef {
    /// Relative specifiers start with `.` (`./x`, `../x`, `.`)
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with('.')
    }
}

/// Extract every module specifier in document order.
///
/// Works on error-recovered trees too: the unused-file check must not depend
/// on a clean parse.
pub fn extract_imports(root: Node, source: &str) -> Vec<ImportRef> {
    descendants(root)
        .filter_map(|node| match node.kind() {
            "import_statement" => source_of(node, source, ImportKind::Static),
            "export_statement" => source_of(node, source, ImportKind::ReExport),
            "call_expression" => call_specifier(node, source),
            _ => None,
        })
        .collect()
}

fn source_of(statement: Node, source: &str, kind: ImportKind) -> Option<ImportRef> {
    let specifier = statement.child_by_field_name("source")?;
    Some(ImportRef {
        specifier: string_literal_value(specifier, source)?,
        kind,
        line: statement.start_position().row + 1,
    })
}

/// `import('./x')` and `require('./x')` with a string literal argument
fn call_specifier(call: Node, source: &str) -> Option<ImportRef> {
    let callee = call.child_by_field_name("function")?;
    let kind = match callee.kind() {
        "import" => ImportKind::Dynamic,
        "identifier" if node_text(callee, source) == "require" => ImportKind::Require,
        _ => return None,
    };

    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let first = arguments.named_children(&mut cursor).next()?;

    Some(ImportRef {
        specifier: string_literal_value(first, source)?,
        kind,
        line: call.start_position().row + 1,
    })
}

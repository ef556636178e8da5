use super::common::{line_range, node_text};
use std::collections::HashSet;
use tree_sitter::Node;

/// Kind of top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `function name() {}` or `function* name() {}`
    Function,
    /// A `const`/`let`/`var` binding
    Variable,
}

/// A name-addressable top-level declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// First line, 1-based
    pub start_line: usize,
    /// Last line, 1-based inclusive
    pub end_line: usize,
    /// Exact source text of the declaration
    pub text: String,
    /// Exported by keyword, by `export { name }`, or by `export default name`
    pub exported: bool,
    /// For variables: bound to an arrow function or function expression
    pub is_function_value: bool,
}

/// Index of a module's top-level declarations.
///
/// Built from the same tree as the generic view so line numbers always agree.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    symbols: Vec<Symbol>,
}

impl SymbolIndex {
    pub fn build(root: Node, source: &str) -> Self {
        let mut symbols = Vec::new();
        let mut export_names = HashSet::new();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "export_statement" => {
                    if let Some(declaration) = child.child_by_field_name("declaration") {
                        collect_declaration(declaration, child, true, source, &mut symbols);
                    } else {
                        collect_export_names(child, source, &mut export_names);
                    }
                }
                _ => collect_declaration(child, child, false, source, &mut symbols),
            }
        }

        for symbol in &mut symbols {
            if export_names.contains(&symbol.name) {
                symbol.exported = true;
            }
        }

        Self { symbols }
    }

    /// Top-level function declaration by name
    pub fn function(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .iter()
            .find(|s| s.kind == SymbolKind::Function && s.name == name)
    }

    /// Top-level variable declaration by name
    pub fn variable(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .iter()
            .find(|s| s.kind == SymbolKind::Variable && s.name == name)
    }

    /// Function declaration first, then variable declaration
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.function(name).or_else(|| self.variable(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Record a declaration statement. `outer` is the node whose range is
/// reported: the `export` statement when the declaration is wrapped in one.
fn collect_declaration(
    declaration: Node,
    outer: Node,
    exported: bool,
    source: &str,
    symbols: &mut Vec<Symbol>,
) {
    match declaration.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let Some(name) = declaration.child_by_field_name("name") else {
                return;
            };
            push_unique(symbols, symbol(outer, node_text(name, source), SymbolKind::Function, exported, true, source));
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = declaration.walk();
            let declarators: Vec<Node> = declaration
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "variable_declarator")
                .collect();
            let single = declarators.len() == 1;

            for declarator in declarators {
                let Some(name) = declarator.child_by_field_name("name") else {
                    continue;
                };
                // Destructuring patterns bind no single name
                if name.kind() != "identifier" {
                    continue;
                }

                let is_function_value = declarator
                    .child_by_field_name("value")
                    .map(is_function_expression)
                    .unwrap_or(false);
                let range_node = if single { outer } else { declarator };

                push_unique(
                    symbols,
                    symbol(range_node, node_text(name, source), SymbolKind::Variable, exported, is_function_value, source),
                );
            }
        }
        _ => {}
    }
}

fn symbol(
    range_node: Node,
    name: &str,
    kind: SymbolKind,
    exported: bool,
    is_function_value: bool,
    source: &str,
) -> Symbol {
    let (start_line, end_line) = line_range(range_node);
    Symbol {
        name: name.to_string(),
        kind,
        start_line,
        end_line,
        text: node_text(range_node, source).to_string(),
        exported,
        is_function_value,
    }
}

fn push_unique(symbols: &mut Vec<Symbol>, symbol: Symbol) {
    if !symbols
        .iter()
        .any(|s| s.kind == symbol.kind && s.name == symbol.name)
    {
        symbols.push(symbol);
    }
}

/// Names exported by `export { a, b as c }` and `export default name`.
/// Clauses with a `from` source re-export other modules and are skipped.
fn collect_export_names(statement: Node, source: &str, names: &mut HashSet<String>) {
    if statement.child_by_field_name("source").is_some() {
        return;
    }

    if let Some(value) = statement.child_by_field_name("value") {
        if value.kind() == "identifier" {
            names.insert(node_text(value, source).to_string());
        }
        return;
    }

    let mut cursor = statement.walk();
    for child in statement.named_children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for specifier in child.named_children(&mut clause_cursor) {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            if let Some(local) = specifier.child_by_field_name("name") {
                names.insert(node_text(local, source).to_string());
            }
        }
    }
}

/// Arrow functions and anonymous/named function expressions
pub fn is_function_expression(node: Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

use super::finding::Finding;
use super::usage::FileUsage;
use crate::parser::{Symbol, SymbolIndex};
use std::path::Path;
use tracing::debug;

/// Components declared in the file but never rendered there
pub fn find_unused_components(path: &Path, usage: &FileUsage, symbols: &SymbolIndex) -> Vec<Finding> {
    usage
        .components
        .iter()
        .filter(|name| !usage.markup_usages.contains(name.as_str()))
        .filter_map(|name| resolve(path, name, symbols))
        .map(|symbol| Finding::UnusedComponent {
            file_path: path.to_path_buf(),
            name: symbol.name.clone(),
            code: symbol.text.clone(),
            start_line: symbol.start_line,
            end_line: symbol.end_line,
        })
        .collect()
}

/// Exported utilities declared in the file but never called there.
///
/// Unexported utilities are never reported: an uncalled private helper is
/// more likely passed around as a value than dead.
pub fn find_unused_utilities(path: &Path, usage: &FileUsage, symbols: &SymbolIndex) -> Vec<Finding> {
    usage
        .utilities
        .iter()
        .filter(|name| !usage.call_usages.contains(name.as_str()))
        .filter_map(|name| resolve(path, name, symbols))
        .filter(|symbol| symbol.exported)
        .map(|symbol| Finding::UnusedUtility {
            file_path: path.to_path_buf(),
            name: symbol.name.clone(),
            code: symbol.text.clone(),
            start_line: symbol.start_line,
            end_line: symbol.end_line,
        })
        .collect()
}

/// Names with no top-level declaration (e.g. nested functions) are dropped
fn resolve<'a>(path: &Path, name: &str, symbols: &'a SymbolIndex) -> Option<&'a Symbol> {
    let symbol = symbols.lookup(name);
    if symbol.is_none() {
        debug!("No top-level declaration for '{}' in {}, dropping", name, path.display());
    }
    symbol
}

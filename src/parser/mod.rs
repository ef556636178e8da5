mod common;
mod script;
mod symbols;

pub use common::{descendants, line_range, node_text, string_literal_value};
pub use script::{ParseError, ParsedModule, ScriptParser};
pub use symbols::{is_function_expression, Symbol, SymbolIndex, SymbolKind};

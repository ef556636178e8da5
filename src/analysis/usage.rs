use crate::parser::{descendants, is_function_expression, node_text};
use regex::Regex;
use std::collections::HashSet;
use tree_sitter::Node;

/// Names declared and used in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUsage {
    /// Component-like declaration names, in document order
    pub components: Vec<String>,
    /// Utility-like declaration names, in document order
    pub utilities: Vec<String>,
    /// Tag names of rendered markup elements
    pub markup_usages: HashSet<String>,
    /// Callee names of direct function calls
    pub call_usages: HashSet<String>,
}

impl FileUsage {
    fn declare(&mut self, name: &str, is_component: bool) {
        let names = if is_component {
            &mut self.components
        } else {
            &mut self.utilities
        };
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
}

/// Collects declarations and usages in a single walk of the syntax tree.
///
/// Components are used by being rendered, utilities by being called; the two
/// signals are never mixed.
pub struct UsageExtractor<'r> {
    component_pattern: &'r Regex,
}

impl<'r> UsageExtractor<'r> {
    pub fn new(component_pattern: &'r Regex) -> Self {
        Self { component_pattern }
    }

    pub fn is_component_name(&self, name: &str) -> bool {
        self.component_pattern.is_match(name)
    }

    pub fn extract(&self, root: Node, source: &str) -> FileUsage {
        let mut usage = FileUsage::default();

        for node in descendants(root) {
            match node.kind() {
                "function_declaration" | "generator_function_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        let name = node_text(name, source);
                        usage.declare(name, self.is_component_name(name));
                    }
                }
                "variable_declarator" => {
                    let (Some(name), Some(value)) = (
                        node.child_by_field_name("name"),
                        node.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    if name.kind() == "identifier" && is_function_expression(value) {
                        let name = node_text(name, source);
                        usage.declare(name, self.is_component_name(name));
                    }
                }
                "jsx_opening_element" | "jsx_self_closing_element" => {
                    // Member (`<Foo.Bar>`) and namespaced tags are not counted
                    if let Some(tag) = node.child_by_field_name("name") {
                        if tag.kind() == "identifier" {
                            usage.markup_usages.insert(node_text(tag, source).to_string());
                        }
                    }
                }
                "call_expression" => {
                    let Some(callee) = node.child_by_field_name("function") else {
                        continue;
                    };
                    // foo`...` is a tagged template, not a call
                    let tagged = node
                        .child_by_field_name("arguments")
                        .map(|args| args.kind() == "template_string")
                        .unwrap_or(false);
                    if callee.kind() == "identifier" && !tagged {
                        usage.call_usages.insert(node_text(callee, source).to_string());
                    }
                }
                _ => {}
            }
        }

        usage
    }
}

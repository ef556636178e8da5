use tree_sitter::Node;

/// Extract text from a node
pub fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// 1-based inclusive line range covered by a node
pub fn line_range(node: Node) -> (usize, usize) {
    let start = node.start_position();
    let end = node.end_position();

    let start_line = start.row + 1; // tree-sitter uses 0-indexed rows
    // A node ending at column 0 stops at the end of the previous line
    let end_line = if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    };

    (start_line, end_line)
}

/// Unquoted value of a string literal node
pub fn string_literal_value(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut cursor = node.walk();
    let fragment = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "string_fragment");

    match fragment {
        Some(fragment) => Some(node_text(fragment, source).to_string()),
        None => {
            let text = node_text(node, source);
            Some(
                text.trim_start_matches(['"', '\''])
                    .trim_end_matches(['"', '\''])
                    .to_string(),
            )
        }
    }
}

/// Iterator over a node and all of its descendants, in document order
pub fn descendants(node: Node) -> impl Iterator<Item = Node> {
    DescendantIterator::new(node)
}

struct DescendantIterator<'a> {
    cursor: tree_sitter::TreeCursor<'a>,
    done: bool,
}

impl<'a> DescendantIterator<'a> {
    fn new(node: Node<'a>) -> Self {
        Self {
            cursor: node.walk(),
            done: false,
        }
    }
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let node = self.cursor.node();

        if self.cursor.goto_first_child() {
            return Some(node);
        }

        loop {
            if self.cursor.goto_next_sibling() {
                return Some(node);
            }

            if !self.cursor.goto_parent() {
                self.done = true;
                return Some(node);
            }
        }
    }
}

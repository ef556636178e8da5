use super::finding::Finding;
use crate::graph::{module_id, ImportGraph};
use std::path::Path;

/// Files whose module identity no import resolves to.
///
/// Entry points (never imported by design) are reported too; the check has
/// no notion of entry-point conventions.
pub fn find_unused_files<'a, I>(files: I, graph: &ImportGraph) -> Vec<Finding>
where
    I: IntoIterator<Item = (&'a Path, &'a str)>,
{
    files
        .into_iter()
        .filter(|(path, _)| !graph.is_imported(&module_id(path)))
        .map(|(path, content)| Finding::UnusedFile {
            path: path.to_path_buf(),
            content: content.to_string(),
        })
        .collect()
}

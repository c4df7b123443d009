//! Diagnostic sink writing intermediate trees to a directory.

use std::fs;
use std::path::{Path, PathBuf};

use graft_syntax::{DiagnosticSink, Node, SyntaxError, to_pretty_json};

/// Writes each labelled tree to `<dir>/[<prefix>.]<label>.json`.
#[derive(Debug, Clone)]
pub(crate) struct DumpSink {
    dir: PathBuf,
    prefix: Option<String>,
}

impl DumpSink {
    /// Sink for rule preparation: `before.json` and `after.json`.
    pub(crate) const fn new(dir: PathBuf) -> Self {
        Self { dir, prefix: None }
    }

    /// Sink for one input file: `<file>.input.json` and `<file>.output.json`.
    pub(crate) fn for_file(dir: PathBuf, file: &Path) -> Self {
        let prefix = file.file_name().map_or_else(
            || file.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        Self {
            dir,
            prefix: Some(prefix),
        }
    }

    fn path_for(&self, label: &str) -> PathBuf {
        let name = match &self.prefix {
            Some(prefix) => format!("{prefix}.{label}.json"),
            None => format!("{label}.json"),
        };
        self.dir.join(name)
    }
}

impl DiagnosticSink for DumpSink {
    fn dump(&self, label: &str, node: &Node) -> Result<(), SyntaxError> {
        let json = to_pretty_json(node)?;
        let path = self.path_for(label);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, json))
            .map_err(|error| SyntaxError::diagnostic(format!("{}: {error}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use graft_syntax::Object;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_labelled_json_files() {
        let dir = TempDir::new().expect("temp dir");
        let node: Node = Object::new().with("Kind", "identifier").into();

        DumpSink::new(dir.path().join("trees"))
            .dump("before", &node)
            .expect("dump before");
        DumpSink::for_file(dir.path().join("trees"), Path::new("src/main.rs"))
            .dump("input", &node)
            .expect("dump input");

        let before = fs::read_to_string(dir.path().join("trees/before.json")).expect("before");
        assert!(before.contains("\"Kind\": \"identifier\""));
        assert!(dir.path().join("trees/main.rs.input.json").is_file());
    }
}

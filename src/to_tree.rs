//! Outline rendering of entity names.
use crate::visitor::{EntityRef, Visitor};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Visitor that renders the names of a tree as an outline, one name per line:
///
/// ```text
/// a
/// ├── b
/// │   └── d
/// └── c
/// ```
///
/// The first entity visited has no connector, so the printer also works on subtrees.
#[derive(Debug, Default)]
pub struct TreePrinter {
    lines: Vec<String>,

    /// For each open level below the top entity: was that entity its parent's last child
    last_flags: Vec<bool>,
    depth: usize,
}
impl TreePrinter {
    /// Returns the outline rendered so far, without a trailing newline.
    #[must_use]
    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}
impl Visitor for TreePrinter {
    fn enter(&mut self, entity: EntityRef<'_>) {
        self.depth += 1;
        if self.depth == 1 {
            self.lines.push(entity.name().to_string());
            return;
        }

        let is_last = entity.is_last_child();
        let mut line: String = self
            .last_flags
            .iter()
            .map(|last| if *last { SPACE } else { PIPE })
            .collect();
        line.push_str(if is_last { LAST_BRANCH } else { BRANCH });
        line.push_str(entity.name());

        self.lines.push(line.trim_end().to_string());
        self.last_flags.push(is_last);
    }

    fn leave(&mut self, _entity: EntityRef<'_>) {
        if self.depth > 1 {
            self.last_flags.pop();
        }
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityTree;

    #[test]
    fn test_single_root() {
        let tree = EntityTree::new("persona").unwrap();
        assert_eq!(tree.to_tree(), "persona");
    }

    #[test]
    fn test_nested() {
        let mut tree = EntityTree::new("a").unwrap();
        let root = tree.root();
        let b = tree.create_entity("b", root).unwrap();
        tree.create_entity("c", root).unwrap();
        tree.create_entity("d", b).unwrap();

        assert_eq!(tree.to_tree(), "a\n├── b\n│   └── d\n└── c");
    }

    #[test]
    fn test_deep_last_branches() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        let c = tree.create_entity("c", b).unwrap();
        tree.create_entity("d", c).unwrap();
        tree.create_entity("e", c).unwrap();

        assert_eq!(
            tree.to_tree(),
            "a\n└── b\n    └── c\n        ├── d\n        └── e"
        );
    }

    #[test]
    fn test_subtree() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        tree.create_entity("c", tree.root()).unwrap();
        tree.create_entity("d", b).unwrap();

        let mut printer = TreePrinter::default();
        tree.accept_from(b, &mut printer);
        assert_eq!(printer.finish(), "b\n└── d");
    }
}

use termtree::Tree;
use tracing::instrument;

use crate::domain::model::{Model, NodeId};
use crate::domain::value::Value;

pub trait TreeNodeConvert {
    fn to_tree_string(&self, root: NodeId) -> Tree<String>;
}

impl TreeNodeConvert for Model {
    /// Renders the subtree under `root`. Leaf fields are shown inline,
    /// child nodes as branches labelled with their role.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> Tree<String> {
        fn build(model: &Model, id: NodeId, label: String) -> Tree<String> {
            let Ok(node) = model.get(id) else {
                return Tree::new(format!("{label}<dangling>"));
            };
            let leaves: Vec<String> = node
                .fields()
                .iter()
                .filter(|(_, v)| v.nodes().is_empty() && !matches!(v, Value::List(_) | Value::Set(_)))
                .map(|(role, v)| format!("{}={}", role, v))
                .collect();
            let mut text = format!("{label}{}", model.describe(id));
            if !leaves.is_empty() {
                text.push_str(&format!(" [{}]", leaves.join(", ")));
            }
            let mut tree = Tree::new(text);
            for (role, value) in node.fields() {
                for child in value.nodes() {
                    tree.push(build(model, child, format!("{}: ", role)));
                }
            }
            tree
        }

        build(self, root, String::new())
    }
}

impl Model {
    pub fn to_tree(&self, root: NodeId) -> Tree<String> {
        self.to_tree_string(root)
    }
}

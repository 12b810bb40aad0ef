//! Grouping of dotted `@property` / `@param` names.
//!
//! `options`, `options.timeout` and `options.retry.count` become one root
//! with nested children; `items[].id` marks `items` as an array of objects.

use crate::doclet::DocParam;

#[derive(Debug, Clone, PartialEq)]
pub struct PropNode<'a> {
    pub name: String,
    /// The entry that documents this node; absent for implied parents.
    pub prop: Option<&'a DocParam>,
    pub children: Vec<PropNode<'a>>,
    /// Children were given as `name[].child`.
    pub is_array: bool,
}

impl<'a> PropNode<'a> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prop: None,
            children: Vec::new(),
            is_array: false,
        }
    }

    pub fn optional(&self) -> bool {
        self.prop.is_some_and(|prop| prop.optional)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.prop
            .and_then(|prop| prop.description.as_deref())
            .filter(|desc| !desc.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropTree<'a> {
    pub roots: Vec<PropNode<'a>>,
}

impl<'a> PropTree<'a> {
    pub fn new(props: &'a [DocParam]) -> Self {
        let mut roots = Vec::new();
        for prop in props {
            let path: Vec<&str> = prop.name.split('.').collect();
            insert(&mut roots, &path, prop);
        }
        Self { roots }
    }
}

fn insert<'a>(nodes: &mut Vec<PropNode<'a>>, path: &[&str], prop: &'a DocParam) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let (name, is_array) = match head.strip_suffix("[]") {
        Some(name) => (name, true),
        None => (*head, false),
    };

    let idx = match nodes.iter().position(|node| node.name == name) {
        Some(idx) => idx,
        None => {
            nodes.push(PropNode::new(name));
            nodes.len() - 1
        }
    };
    let node = &mut nodes[idx];

    if rest.is_empty() {
        if node.prop.is_none() {
            node.prop = Some(prop);
        }
    } else {
        node.is_array |= is_array;
        insert(&mut node.children, rest, prop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_dotted_names() {
        let props = vec![
            DocParam::named("options"),
            DocParam::named("options.timeout"),
            DocParam::named("options.retry.count"),
            DocParam::named("callback"),
        ];
        let tree = PropTree::new(&props);
        assert_eq!(tree.roots.len(), 2);

        let options = &tree.roots[0];
        assert_eq!(options.name, "options");
        assert!(options.prop.is_some());
        assert_eq!(options.children.len(), 2);
        assert_eq!(options.children[0].name, "timeout");

        let retry = &options.children[1];
        assert_eq!(retry.name, "retry");
        assert!(retry.prop.is_none(), "implied parent has no entry");
        assert_eq!(retry.children[0].name, "count");
        assert_eq!(tree.roots[1].name, "callback");
    }

    #[test]
    fn test_array_children() {
        let props = vec![
            DocParam::named("items"),
            DocParam::named("items[].id"),
            DocParam::named("items[].label"),
        ];
        let tree = PropTree::new(&props);
        assert_eq!(tree.roots.len(), 1);
        let items = &tree.roots[0];
        assert!(items.is_array);
        let names: Vec<_> = items.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "label"]);
    }
}

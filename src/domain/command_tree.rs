//! Hierarchical command namespace
//!
//! Groups (`network`, `subnet`, ...) hold commands (`list`, `create`, ...).
//! Resolution walks the tree level by level, trying the longest run of
//! path segments first, so `batch create` finds a node named `batch-create`
//! before a node named `batch`.

use crate::domain::error::{DomainError, DomainResult};

/// Node in the command tree. Leaves carry a handler, groups carry children.
#[derive(Debug, Clone)]
pub struct CommandNode<H> {
    name: String,
    description: String,
    aliases: Vec<String>,
    handler: Option<H>,
    children: Vec<CommandNode<H>>,
}

impl<H> CommandNode<H> {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            aliases: Vec::new(),
            handler: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    pub fn children(&self) -> &[CommandNode<H>] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        self.handler.is_none()
    }

    fn matches(&self, segment: &str) -> bool {
        self.name == segment || self.aliases.iter().any(|a| a == segment)
    }

    fn child(&self, segment: &str) -> Option<&CommandNode<H>> {
        self.children.iter().find(|c| c.matches(segment))
    }

    /// Names of direct subcommands, in registration order.
    pub fn subcommands(&self) -> Vec<String> {
        self.children.iter().map(|c| c.name.clone()).collect()
    }
}

/// Result of resolving a command path.
#[derive(Debug)]
pub struct Resolved<'t, H> {
    /// Canonical names of the matched nodes
    pub path: Vec<String>,
    /// The node the path stops at (group or command)
    pub node: &'t CommandNode<H>,
    /// Number of input segments consumed by the path
    pub consumed: usize,
}

/// Ordered hierarchy of command groups and commands.
#[derive(Debug, Clone)]
pub struct CommandTree<H> {
    root: CommandNode<H>,
}

impl<H> CommandTree<H> {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            root: CommandNode::new(name, description),
        }
    }

    pub fn root(&self) -> &CommandNode<H> {
        &self.root
    }

    /// Register a group at `path` (space separated), creating missing parents.
    pub fn add_group(&mut self, path: &str, description: &str) -> &mut Self {
        let node = self.node_mut(path);
        node.description = description.to_string();
        self
    }

    /// Register a command at `path`, creating missing parent groups.
    pub fn add_command(&mut self, path: &str, description: &str, handler: H) -> &mut Self {
        let node = self.node_mut(path);
        node.description = description.to_string();
        node.handler = Some(handler);
        self
    }

    /// Add an alternative name for the node at `path`.
    pub fn add_alias(&mut self, path: &str, alias: &str) -> &mut Self {
        let node = self.node_mut(path);
        node.aliases.push(alias.to_string());
        self
    }

    fn node_mut(&mut self, path: &str) -> &mut CommandNode<H> {
        let mut node = &mut self.root;
        for segment in path.split_whitespace() {
            let index = match node.children.iter().position(|c| c.name == segment) {
                Some(i) => i,
                None => {
                    node.children.push(CommandNode::new(segment, ""));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        node
    }

    /// Resolve leading path segments to a node.
    ///
    /// Stops at the first command (remaining segments are its arguments),
    /// at the first option-like segment, or when input runs out. A segment
    /// that matches no child of a group is a "no such command" error listing
    /// that group's subcommands.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> DomainResult<Resolved<'_, H>> {
        let mut node = &self.root;
        let mut path = Vec::new();
        let mut consumed = 0;

        while node.is_group() && consumed < segments.len() {
            let rest = &segments[consumed..];
            if rest[0].as_ref().starts_with('-') {
                break;
            }

            let option_like = rest
                .iter()
                .position(|s| s.as_ref().starts_with('-'))
                .unwrap_or(rest.len());
            let matched = (1..=option_like).rev().find_map(|n| {
                let candidate = rest[..n].iter().map(AsRef::as_ref).collect::<Vec<_>>();
                node.child(&candidate.join("-"))
                    .or_else(|| node.child(&candidate.join("_")))
                    .map(|child| (child, n))
            });

            match matched {
                Some((child, n)) => {
                    path.push(child.name.clone());
                    node = child;
                    consumed += n;
                }
                None => {
                    let mut attempted = path.clone();
                    attempted.push(rest[0].as_ref().to_string());
                    return Err(DomainError::NoSuchCommand {
                        path: attempted.join(" "),
                        available: node.subcommands(),
                    });
                }
            }
        }

        Ok(Resolved {
            path,
            node,
            consumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> CommandTree<&'static str> {
        let mut tree = CommandTree::new("cloudctl", "test");
        tree.add_group("network", "networks")
            .add_command("network list", "list", "network-list")
            .add_command("network batch", "batch", "network-batch")
            .add_command("network batch-create", "batch create", "network-batch-create")
            .add_alias("network", "net");
        tree
    }

    #[test]
    fn given_alias_when_resolving_then_reports_canonical_path() {
        let t = tree();
        let r = t.resolve(&["net", "list"]).unwrap();
        assert_eq!(r.path, vec!["network", "list"]);
        assert_eq!(r.node.handler(), Some(&"network-list"));
        assert_eq!(r.consumed, 2);
    }

    #[test]
    fn given_multi_word_command_when_resolving_then_longest_match_wins() {
        let t = tree();
        let r = t.resolve(&["network", "batch", "create", "name=a"]).unwrap();
        assert_eq!(r.node.handler(), Some(&"network-batch-create"));
        assert_eq!(r.consumed, 3);
    }

    #[test]
    fn given_group_only_when_resolving_then_stops_at_group() {
        let t = tree();
        let r = t.resolve(&["network", "--help"]).unwrap();
        assert!(r.node.is_group());
        assert_eq!(r.consumed, 1);
    }
}

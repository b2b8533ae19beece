//! Cross-container pull/put policy.
//!
//! A container's group decides whether an item may leave it (`pull`) and
//! whether an item from another container may enter it (`put`). Both
//! checks must agree before a cross-container move happens.

use crate::sortable::SortableId;
use arrange_dom::NodeId;
use std::rc::Rc;

/// Everything a policy decision can look at.
#[derive(Debug, Clone, Copy)]
pub struct GroupContext<'a> {
    /// Container the item would enter.
    pub to: SortableId,
    /// Container the item is currently owned by.
    pub from: SortableId,
    pub dragged: NodeId,
    pub to_group: Option<&'a str>,
    pub from_group: Option<&'a str>,
}

impl GroupContext<'_> {
    fn same_group(&self) -> bool {
        match (self.to_group, self.from_group) {
            (Some(to), Some(from)) => !to.is_empty() && to == from,
            _ => false,
        }
    }
}

/// A dynamic policy; its return value is resolved again.
pub type PolicyFn = Rc<dyn Fn(&GroupContext<'_>) -> Policy>;

/// One side of a group's policy.
#[derive(Clone, Default)]
pub enum Policy {
    /// Pull: always allowed. Put: allowed from containers sharing the
    /// group name.
    #[default]
    Unset,
    Bool(bool),
    /// Pull leaves a copy behind. As a put policy it matches a group
    /// literally named `"clone"`.
    Clone,
    /// Allowed when the other container's group has this name.
    Name(String),
    /// Allowed when the other container's group is one of these names.
    Names(Vec<String>),
    Dynamic(PolicyFn),
}

impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Unset => write!(f, "Unset"),
            Policy::Bool(value) => write!(f, "Bool({})", value),
            Policy::Clone => write!(f, "Clone"),
            Policy::Name(name) => write!(f, "Name({:?})", name),
            Policy::Names(names) => write!(f, "Names({:?})", names),
            Policy::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

impl Policy {
    pub fn dynamic(f: impl Fn(&GroupContext<'_>) -> Policy + 'static) -> Self {
        Policy::Dynamic(Rc::new(f))
    }
}

impl From<bool> for Policy {
    fn from(value: bool) -> Self {
        Policy::Bool(value)
    }
}

impl From<&str> for Policy {
    fn from(value: &str) -> Self {
        if value == "clone" {
            Policy::Clone
        } else {
            Policy::Name(value.to_string())
        }
    }
}

impl From<Vec<&str>> for Policy {
    fn from(names: Vec<&str>) -> Self {
        Policy::Names(names.into_iter().map(str::to_string).collect())
    }
}

/// Outcome of a pull check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullMode {
    Deny,
    Allow,
    Clone,
}

impl PullMode {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, PullMode::Deny)
    }
}

/// Group configuration as written by the user.
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    pub name: Option<String>,
    pub pull: Policy,
    pub put: Policy,
    /// Snap a cloned item back to its original position instead of
    /// leaving the clone where the item was last seen.
    pub revert_clone: bool,
}

impl GroupOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn pull(mut self, pull: impl Into<Policy>) -> Self {
        self.pull = pull.into();
        self
    }

    pub fn put(mut self, put: impl Into<Policy>) -> Self {
        self.put = put.into();
        self
    }

    pub fn revert_clone(mut self, revert: bool) -> Self {
        self.revert_clone = revert;
        self
    }

    pub fn resolve(&self) -> ResolvedGroup {
        ResolvedGroup {
            name: self.name.clone(),
            pull: self.pull.clone(),
            put: self.put.clone(),
            revert_clone: self.revert_clone,
        }
    }
}

impl From<&str> for GroupOptions {
    fn from(name: &str) -> Self {
        GroupOptions::named(name)
    }
}

/// A normalized group ready to answer pull/put questions.
#[derive(Debug, Clone, Default)]
pub struct ResolvedGroup {
    pub name: Option<String>,
    pull: Policy,
    put: Policy,
    pub revert_clone: bool,
}

impl ResolvedGroup {
    /// May the item leave `ctx.from` for `ctx.to`?
    pub fn check_pull(&self, ctx: &GroupContext<'_>) -> PullMode {
        resolve(&self.pull, true, ctx)
    }

    /// May the item enter `ctx.to` from `ctx.from`?
    pub fn check_put(&self, ctx: &GroupContext<'_>) -> bool {
        resolve(&self.put, false, ctx).is_allowed()
    }
}

fn resolve(policy: &Policy, pull: bool, ctx: &GroupContext<'_>) -> PullMode {
    let other = if pull { ctx.to_group } else { ctx.from_group };
    let allowed = |ok: bool| if ok { PullMode::Allow } else { PullMode::Deny };
    match policy {
        Policy::Unset => allowed(pull || ctx.same_group()),
        Policy::Bool(value) => allowed(*value),
        Policy::Clone if pull => PullMode::Clone,
        Policy::Clone => allowed(other == Some("clone")),
        Policy::Name(name) => allowed(other == Some(name.as_str())),
        Policy::Names(names) => allowed(other.is_some_and(|o| names.iter().any(|n| n == o))),
        Policy::Dynamic(f) => resolve(&f(ctx), pull, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(to: Option<&'a str>, from: Option<&'a str>) -> GroupContext<'a> {
        GroupContext {
            to: SortableId(1),
            from: SortableId(0),
            dragged: NodeId(7),
            to_group: to,
            from_group: from,
        }
    }

    #[test]
    fn test_unset_policies() {
        let group = GroupOptions::named("a").resolve();
        assert_eq!(group.check_pull(&ctx(Some("b"), Some("a"))), PullMode::Allow);
        assert!(group.check_put(&ctx(Some("a"), Some("a"))));
        assert!(!group.check_put(&ctx(Some("a"), Some("b"))));
        assert!(!group.check_put(&ctx(None, None)));
        assert!(!group.check_put(&ctx(Some(""), Some(""))));
    }

    #[test]
    fn test_bool_and_clone() {
        let group = GroupOptions::named("a").pull("clone").put(false).resolve();
        assert_eq!(group.check_pull(&ctx(Some("b"), Some("a"))), PullMode::Clone);
        assert!(!group.check_put(&ctx(Some("a"), Some("a"))));

        let group = GroupOptions::named("a").put("clone").resolve();
        assert!(group.check_put(&ctx(Some("a"), Some("clone"))));
        assert!(!group.check_put(&ctx(Some("a"), Some("b"))));
    }

    #[test]
    fn test_names() {
        let group = GroupOptions::named("a").pull(vec!["b", "c"]).put("z").resolve();
        assert!(group.check_pull(&ctx(Some("c"), Some("a"))).is_allowed());
        assert!(!group.check_pull(&ctx(Some("d"), Some("a"))).is_allowed());
        assert!(!group.check_pull(&ctx(None, Some("a"))).is_allowed());
        assert!(group.check_put(&ctx(Some("a"), Some("z"))));
    }

    #[test]
    fn test_dynamic_policy_is_resolved_again() {
        let group = GroupOptions::named("a")
            .pull(Policy::dynamic(|ctx| {
                if ctx.to_group == Some("trash") {
                    Policy::Clone
                } else {
                    Policy::Bool(false)
                }
            }))
            .resolve();
        assert_eq!(group.check_pull(&ctx(Some("trash"), Some("a"))), PullMode::Clone);
        assert_eq!(group.check_pull(&ctx(Some("b"), Some("a"))), PullMode::Deny);
    }
}

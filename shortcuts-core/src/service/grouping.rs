use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{ActionKind, FlowRole};

/// Source of grouping identifiers for control-flow blocks. Injected into the
/// loader so tests can supply a deterministic sequence.
pub trait GroupIdSource {
    fn next_id(&mut self) -> String;
}

/// Default source: one random v4 UUID per block.
#[derive(Debug, Default)]
pub struct UuidSource;

impl GroupIdSource for UuidSource {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockFamily {
    Conditional,
    RepeatCount,
    RepeatEach,
}

impl BlockFamily {
    fn of(kind: ActionKind) -> Option<Self> {
        match kind {
            ActionKind::If | ActionKind::Else | ActionKind::EndIf => Some(Self::Conditional),
            ActionKind::RepeatStart | ActionKind::RepeatEnd => Some(Self::RepeatCount),
            ActionKind::RepeatEachStart | ActionKind::RepeatEachEnd => Some(Self::RepeatEach),
            _ => None,
        }
    }

    fn opening_tag(self) -> &'static str {
        match self {
            Self::Conditional => ActionKind::If.tag(),
            Self::RepeatCount => ActionKind::RepeatStart.tag(),
            Self::RepeatEach => ActionKind::RepeatEachStart.tag(),
        }
    }
}

/// Threads one shared grouping identifier through the members of each
/// control-flow block. Blocks nest through a stack, so inner blocks never
/// reuse an outer identifier.
pub struct GroupingResolver<'a> {
    source: &'a mut dyn GroupIdSource,
    stack: Vec<(BlockFamily, String)>,
}

impl<'a> GroupingResolver<'a> {
    pub fn new(source: &'a mut dyn GroupIdSource) -> Self {
        Self {
            source,
            stack: Vec::new(),
        }
    }

    /// Returns the grouping identifier for `kind`, or `None` when the kind
    /// is not a control-flow action. An explicitly supplied identifier is
    /// honored verbatim but still takes part in the stack bookkeeping.
    pub fn resolve(
        &mut self,
        kind: ActionKind,
        explicit: Option<String>,
        position: usize,
    ) -> Result<Option<String>> {
        let Some(role) = kind.flow_role() else {
            return Ok(None);
        };
        let Some(family) = BlockFamily::of(kind) else {
            return Ok(None);
        };

        let id = match role {
            FlowRole::Open => {
                let id = explicit.unwrap_or_else(|| self.source.next_id());
                self.stack.push((family, id.clone()));
                id
            }
            FlowRole::Middle => {
                let top = self.open_block(kind, family, position)?;
                explicit.unwrap_or_else(|| top.to_owned())
            }
            FlowRole::Close => {
                self.open_block(kind, family, position)?;
                let id = self.stack.pop().map(|(_, id)| id).unwrap_or_default();
                explicit.unwrap_or(id)
            }
        };
        Ok(Some(id))
    }

    fn open_block(
        &mut self,
        kind: ActionKind,
        family: BlockFamily,
        position: usize,
    ) -> Result<&str> {
        match self.stack.last() {
            None => Err(Error::MalformedControlFlow {
                action: kind.tag().to_owned(),
                position,
                reason: "no open control-flow block".to_owned(),
            }),
            Some((open_family, _)) if *open_family != family => Err(Error::MalformedControlFlow {
                action: kind.tag().to_owned(),
                position,
                reason: format!("open block is `{}`", open_family.opening_tag()),
            }),
            Some((_, id)) => Ok(id),
        }
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    struct Counter(usize);

    impl GroupIdSource for Counter {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id-{}", self.0)
        }
    }

    #[test]
    fn test_block_members_share_one_identifier() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);

        let opened = resolver.resolve(ActionKind::If, None, 1).unwrap().unwrap();
        let middle = resolver.resolve(ActionKind::Else, None, 2).unwrap().unwrap();
        let closed = resolver.resolve(ActionKind::EndIf, None, 3).unwrap().unwrap();
        assert_eq!(opened, middle);
        assert_eq!(opened, closed);
    }

    #[test]
    fn test_sibling_blocks_get_fresh_identifiers() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);

        let first = resolver.resolve(ActionKind::If, None, 1).unwrap().unwrap();
        resolver.resolve(ActionKind::EndIf, None, 2).unwrap();
        let second = resolver.resolve(ActionKind::If, None, 3).unwrap().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_nested_blocks_are_independent() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);

        let repeat = resolver
            .resolve(ActionKind::RepeatStart, None, 1)
            .unwrap()
            .unwrap();
        let inner = resolver.resolve(ActionKind::If, None, 2).unwrap().unwrap();
        assert_ne!(repeat, inner);

        let inner_close = resolver.resolve(ActionKind::EndIf, None, 3).unwrap().unwrap();
        assert_eq!(inner, inner_close);
        let repeat_close = resolver
            .resolve(ActionKind::RepeatEnd, None, 4)
            .unwrap()
            .unwrap();
        assert_eq!(repeat, repeat_close);
    }

    #[test]
    fn test_explicit_identifier_is_honored() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);

        let opened = resolver
            .resolve(ActionKind::If, Some("123".to_owned()), 1)
            .unwrap()
            .unwrap();
        assert_eq!("123", opened);
        let closed = resolver.resolve(ActionKind::EndIf, None, 2).unwrap().unwrap();
        assert_eq!("123", closed);
    }

    #[test]
    fn test_non_control_flow_kinds_resolve_to_none() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);
        assert_eq!(None, resolver.resolve(ActionKind::Text, None, 1).unwrap());
    }

    #[test]
    fn test_unmatched_close() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);
        assert_matches!(
            resolver.resolve(ActionKind::EndIf, None, 1),
            Err(Error::MalformedControlFlow { action, position: 1, .. }) if action == "endif"
        );
    }

    #[test]
    fn test_close_from_wrong_family() {
        let mut source = Counter(0);
        let mut resolver = GroupingResolver::new(&mut source);
        resolver.resolve(ActionKind::RepeatStart, None, 1).unwrap();
        assert_matches!(
            resolver.resolve(ActionKind::EndIf, None, 2),
            Err(Error::MalformedControlFlow { position: 2, .. })
        );
    }
}

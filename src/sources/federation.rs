//! Ordered collection of local sources queried as one.

use crate::sources::TripleSource;
use std::sync::Arc;

/// Members are evaluated in the order they were added and their results appended.
#[derive(Clone, Default)]
pub struct Federation {
    members: Vec<Arc<dyn TripleSource>>,
}

impl Federation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, member: impl TripleSource + 'static) -> &mut Self {
        self.members.push(Arc::new(member));
        self
    }

    pub fn add_shared(&mut self, member: Arc<dyn TripleSource>) -> &mut Self {
        self.members.push(member);
        self
    }

    pub fn members(&self) -> &[Arc<dyn TripleSource>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Arc<dyn TripleSource>> for Federation {
    fn from_iter<I: IntoIterator<Item = Arc<dyn TripleSource>>>(iter: I) -> Self {
        Self { members: iter.into_iter().collect() }
    }
}

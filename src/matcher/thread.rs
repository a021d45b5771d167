use hashbrown::HashSet;

use crate::pattern::NodeId;

/// One live match attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Thread {
    /// Waiting to try `NodeId` against the next input.
    At(NodeId),
    Repeat(RepeatAttempt),
    Negation(NegationAttempt),
}

/// Progress through a repetition node: completed iterations plus the
/// sub-threads of the iteration in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepeatAttempt {
    pub node: NodeId,
    pub count: u32,
    pub threads: Vec<Thread>,
}

/// Forbidden sub-pattern still advancing under a negation node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NegationAttempt {
    pub node: NodeId,
    pub threads: Vec<Thread>,
}

/// Threads produced by one step, in the order they were first reported.
#[derive(Debug, Default)]
pub struct Successors {
    threads: Vec<Thread>,
    seen: HashSet<Thread>,
    completed: bool,
}

impl Successors {
    pub fn push(&mut self, thread: Thread) {
        if self.seen.insert(thread.clone()) {
            self.threads.push(thread);
        }
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn into_parts(self) -> (Vec<Thread>, bool) {
        (self.threads, self.completed)
    }
}

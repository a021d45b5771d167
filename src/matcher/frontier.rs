use crate::pattern::PatternGraph;
use crate::token::Input;

use super::advance::advance;
use super::thread::{Successors, Thread};

/// Advance `threads` and a freshly seeded entry thread against `input`.
///
/// The entry goes last so in-flight attempts keep their place ahead of new
/// ones when the result is capped.
pub fn step(graph: &PatternGraph, threads: &[Thread], input: Input<'_>) -> Successors {
    let mut out = Successors::default();
    for thread in threads {
        advance(graph, thread, input, &mut out);
    }
    advance(graph, &Thread::At(graph.entry()), input, &mut out);
    out
}

/// Live threads of one matcher, bounded by `limit`.
#[derive(Debug, Clone)]
pub struct Frontier {
    threads: Vec<Thread>,
    limit: usize,
}

impl Frontier {
    pub fn new(limit: usize) -> Self {
        Self {
            threads: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn clear(&mut self) {
        self.threads.clear();
    }

    pub fn replace(&mut self, mut threads: Vec<Thread>) {
        if threads.len() > self.limit {
            tracing::debug!(
                live = threads.len(),
                limit = self.limit,
                "frontier exceeds thread limit, dropping newest attempts"
            );
            threads.truncate(self.limit);
        }
        self.threads = threads;
    }
}

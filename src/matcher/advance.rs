use smallvec::{SmallVec, smallvec};

use crate::pattern::{MatcherNode, NodeId, PatternGraph};
use crate::token::Input;

use super::thread::{NegationAttempt, RepeatAttempt, Successors, Thread};

/// Feed `input` to one thread, reporting what it continues as into `out`.
///
/// Returns whether the thread made progress on `input`. A thread that
/// reports nothing and returns `false` is dead.
pub fn advance(graph: &PatternGraph, thread: &Thread, input: Input<'_>, out: &mut Successors) -> bool {
    match thread {
        Thread::At(id) => enter(graph, *id, input, out),
        Thread::Repeat(attempt) => step_repeat(graph, attempt, input, out),
        Thread::Negation(attempt) => step_negation(graph, attempt, input, out),
    }
}

/// Enter `id` and every node reachable from it without consuming input.
/// Walks an explicit stack, since chains of optional elements can be long.
fn enter(graph: &PatternGraph, id: NodeId, input: Input<'_>, out: &mut Successors) -> bool {
    let mut pending: SmallVec<[NodeId; 8]> = smallvec![id];
    let mut progressed = false;

    while let Some(id) = pending.pop() {
        match graph.node(id) {
            MatcherNode::Atom { matcher, next } => {
                if let Some(token) = input.token()
                    && matcher.matches(token)
                {
                    exit(graph, *next, out);
                    progressed = true;
                }
            }
            MatcherNode::Anchor { sentinel, next } => {
                if input.sentinel() == Some(*sentinel) {
                    exit(graph, *next, out);
                    progressed = true;
                }
            }
            MatcherNode::Sequence { head, .. } => pending.push(*head),
            // Every branch sees the input; reversed so the first is entered first.
            MatcherNode::Alternation { branches, .. } => pending.extend(branches.iter().rev().copied()),
            MatcherNode::Repeat { body, span, next } => {
                let attempt = RepeatAttempt {
                    node: id,
                    count: 0,
                    threads: vec![Thread::At(*body)],
                };
                progressed |= step_repeat(graph, &attempt, input, out);
                if (span.min == 0 || graph.is_nullable(*body))
                    && let Some(next) = next
                {
                    pending.push(*next);
                }
            }
            MatcherNode::Negation { body, .. } => {
                let attempt = NegationAttempt {
                    node: id,
                    threads: vec![Thread::At(*body)],
                };
                progressed |= step_negation(graph, &attempt, input, out);
            }
        }
    }

    progressed
}

/// Continue with `next` on the following input, completing the scope right
/// away when everything left in it is optional.
fn exit(graph: &PatternGraph, next: Option<NodeId>, out: &mut Successors) {
    match next {
        None => out.complete(),
        Some(id) => {
            out.push(Thread::At(id));
            if graph.is_nullable(id) {
                out.complete();
            }
        }
    }
}

fn step_repeat(
    graph: &PatternGraph,
    attempt: &RepeatAttempt,
    input: Input<'_>,
    out: &mut Successors,
) -> bool {
    let MatcherNode::Repeat { body, span, next } = graph.node(attempt.node) else {
        return false;
    };

    let mut inner = Successors::default();
    let mut progressed = false;
    for thread in &attempt.threads {
        progressed |= advance(graph, thread, input, &mut inner);
    }

    let (threads, completed) = inner.into_parts();
    if !threads.is_empty() {
        out.push(Thread::Repeat(RepeatAttempt {
            node: attempt.node,
            count: attempt.count,
            threads,
        }));
    }

    if completed {
        let count = span.clamp(attempt.count.saturating_add(1));
        if span.allows_more(count) {
            out.push(Thread::Repeat(RepeatAttempt {
                node: attempt.node,
                count,
                threads: vec![Thread::At(*body)],
            }));
        }
        if span.is_satisfied(count) || graph.is_nullable(*body) {
            exit(graph, *next, out);
        }
    }

    progressed
}

fn step_negation(
    graph: &PatternGraph,
    attempt: &NegationAttempt,
    input: Input<'_>,
    out: &mut Successors,
) -> bool {
    let MatcherNode::Negation { next, .. } = graph.node(attempt.node) else {
        return false;
    };
    // Sentinels are never consumed by a negation.
    if input.sentinel().is_some() {
        return false;
    }

    let mut inner = Successors::default();
    let mut progressed = false;
    for thread in &attempt.threads {
        progressed |= advance(graph, thread, input, &mut inner);
    }

    if progressed {
        let (threads, _) = inner.into_parts();
        out.push(Thread::Negation(NegationAttempt {
            node: attempt.node,
            threads,
        }));
    } else {
        exit(graph, *next, out);
    }

    true
}

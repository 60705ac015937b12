//! Token sequence under training.
//!
//! The sequence is a doubly linked list stored in a `Vec` arena. A node's
//! arena index is its position in the original byte sequence and never
//! changes, so pair positions recorded in the pair index stay valid while
//! merges splice nodes out. Ascending arena order is left-to-right order.

use bytemerge_core::Pair;

/// Node in the arena-backed list.
#[derive(Debug, Clone, Copy)]
struct Node {
    token: u32,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked token sequence with stable node positions.
#[derive(Debug, Clone, Default)]
pub struct TokenSequence {
    /// `None` marks a node consumed by a merge.
    nodes: Vec<Option<Node>>,
    head: Option<usize>,
    len: usize,
}

impl TokenSequence {
    /// Build the list from an initial token sequence.
    pub fn from_tokens(tokens: &[u32]) -> Self {
        let n = tokens.len();
        let nodes = tokens
            .iter()
            .enumerate()
            .map(|(i, &token)| {
                Some(Node {
                    token,
                    prev: i.checked_sub(1),
                    next: if i + 1 < n { Some(i + 1) } else { None },
                })
            })
            .collect();

        Self {
            nodes,
            head: if n == 0 { None } else { Some(0) },
            len: n,
        }
    }

    /// Number of live tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no tokens remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Token at a position, if the node is still live.
    #[inline]
    pub fn token_at(&self, pos: usize) -> Option<u32> {
        self.node(pos).map(|n| n.token)
    }

    /// Position of the live node after `pos`.
    #[inline]
    pub fn next_of(&self, pos: usize) -> Option<usize> {
        self.node(pos).and_then(|n| n.next)
    }

    /// Position of the live node before `pos`.
    #[inline]
    pub fn prev_of(&self, pos: usize) -> Option<usize> {
        self.node(pos).and_then(|n| n.prev)
    }

    /// The pair starting at `pos`, if `pos` is live and has a successor.
    #[inline]
    pub fn pair_at(&self, pos: usize) -> Option<Pair> {
        let node = self.node(pos)?;
        let right = self.node(node.next?)?;
        Some((node.token, right.token))
    }

    /// Replace the pair starting at `pos` with `token`.
    ///
    /// The left node keeps its position and takes the new token; the right
    /// node is removed. Returns the removed position, or `None` (leaving the
    /// list untouched) when `pos` has no live successor.
    pub fn merge_at(&mut self, pos: usize, token: u32) -> Option<usize> {
        let right = self.next_of(pos)?;
        let after = self.next_of(right);

        if let Some(node) = self.nodes[pos].as_mut() {
            node.token = token;
            node.next = after;
        }
        if let Some(after) = after {
            if let Some(node) = self.nodes[after].as_mut() {
                node.prev = Some(pos);
            }
        }
        self.nodes[right] = None;
        self.len -= 1;

        Some(right)
    }

    /// Iterate over the live tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let node = self.node(current?)?;
            current = node.next;
            Some(node.token)
        })
    }

    /// Collect the live tokens.
    pub fn to_vec(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter());
        out
    }

    #[inline]
    fn node(&self, pos: usize) -> Option<&Node> {
        self.nodes.get(pos).and_then(Option::as_ref)
    }
}

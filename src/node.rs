//! Multiset-counting binary search tree algorithms.
//!
//! A node stands for all occurrences of its key through `count`, which is
//! never zero while the node is linked into a tree. Nothing here recurses
//! once per level: a tree built from sorted inserts is a chain as long as
//! the input, so descents walk a `&mut Link` cursor and whole-tree passes
//! keep an explicit stack. Only `build` recurses, and it halves each time.

use std::borrow::Borrow;
use std::cmp::Ordering;

pub(crate) type Link<K> = Option<Box<Node<K>>>;

pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) count: usize,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
}

impl<K> Node<K> {
    fn leaf(key: K, count: usize) -> Box<Self> {
        debug_assert!(count >= 1);
        Box::new(Node {
            key,
            count,
            left: None,
            right: None,
        })
    }
}

impl<K> Drop for Node<K> {
    fn drop(&mut self) {
        // Detach descendants onto a heap stack so each one drops childless.
        let mut stack: Vec<Box<Node<K>>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// What `remove` did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    /// No node carried the key; tree untouched.
    Absent,
    /// Counter went down by one, shape untouched.
    Decremented,
    /// Last occurrence: node unlinked.
    Removed,
}

impl Removal {
    pub(crate) fn found(self) -> bool {
        !matches!(self, Removal::Absent)
    }
}

pub(crate) fn search<'a, K, Q>(mut link: &'a Link<K>, key: &Q) -> Option<&'a Node<K>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    while let Some(node) = link {
        link = match key.cmp(node.key.borrow()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => &node.left,
            Ordering::Greater => &node.right,
        };
    }
    None
}

/// The link holding `key`, or the empty link where it would be attached.
fn seek<'a, K, Q>(mut link: &'a mut Link<K>, key: &Q) -> &'a mut Link<K>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    loop {
        // Compare through a shared peek so no mutable borrow is pending
        // when the cursor itself is handed back.
        let ord = match link.as_deref() {
            None => return link,
            Some(node) => key.cmp(node.key.borrow()),
        };
        if ord == Ordering::Equal {
            return link;
        }
        let Some(node) = link else {
            return link;
        };
        link = if ord == Ordering::Less {
            &mut node.left
        } else {
            &mut node.right
        };
    }
}

/// Insert one occurrence of `key`. Returns whether a node had to be created.
pub(crate) fn insert<K: Ord>(link: &mut Link<K>, key: K) -> bool {
    let slot = seek(link, &key);
    match slot {
        Some(node) => {
            node.count += 1;
            false
        }
        None => {
            *slot = Some(Node::leaf(key, 1));
            true
        }
    }
}

/// Remove one occurrence of `key`.
pub(crate) fn remove<K, Q>(link: &mut Link<K>, key: &Q) -> Removal
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let slot = seek(link, key);
    let Some(node) = slot.as_deref_mut() else {
        return Removal::Absent;
    };
    if node.count > 1 {
        node.count -= 1;
        return Removal::Decremented;
    }
    if let Some(node) = slot.take() {
        *slot = unlink(node);
    }
    Removal::Removed
}

/// Replace `node` by what should stand in its place once it is gone.
fn unlink<K>(mut node: Box<Node<K>>) -> Link<K> {
    let left = node.left.take();
    let mut right = node.right.take();
    if left.is_none() {
        return right;
    }
    match take_min(&mut right) {
        None => left,
        Some(mut successor) => {
            // The in-order successor leaves the right subtree whole, with its
            // own count, and takes over both children.
            successor.left = left;
            successor.right = right;
            Some(successor)
        }
    }
}

/// Detach the leftmost node under `link` regardless of its count.
fn take_min<K>(link: &mut Link<K>) -> Link<K> {
    let mut cur = link;
    while matches!(cur.as_deref(), Some(node) if node.left.is_some()) {
        let Some(node) = cur else {
            break;
        };
        cur = &mut node.left;
    }
    let mut min = cur.take()?;
    *cur = min.right.take();
    Some(min)
}

/// Left-root-right listing into a fresh vector.
pub(crate) fn in_order<K>(link: &Link<K>) -> Vec<&Node<K>> {
    let mut out = Vec::new();
    let mut stack: Vec<&Node<K>> = Vec::new();
    let mut cur = link.as_deref();
    loop {
        while let Some(node) = cur {
            stack.push(node);
            cur = node.left.as_deref();
        }
        let Some(node) = stack.pop() else {
            break;
        };
        out.push(node);
        cur = node.right.as_deref();
    }
    out
}

/// Tear the tree into its nodes, in key order, with every child link cleared.
pub(crate) fn into_in_order<K>(link: Link<K>) -> Vec<Box<Node<K>>> {
    let mut out = Vec::new();
    let mut stack: Vec<Box<Node<K>>> = Vec::new();
    let mut cur = link;
    loop {
        while let Some(mut node) = cur {
            cur = node.left.take();
            stack.push(node);
        }
        let Some(mut node) = stack.pop() else {
            break;
        };
        cur = node.right.take();
        out.push(node);
    }
    out
}

/// Height in edges; `-1` for an empty tree, `0` for a lone root.
pub(crate) fn height<K>(link: &Link<K>) -> isize {
    let mut deepest = -1;
    let mut stack: Vec<(&Node<K>, isize)> = link.as_deref().map(|n| (n, 0)).into_iter().collect();
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(node.left.as_deref().map(|n| (n, depth + 1)));
        stack.extend(node.right.as_deref().map(|n| (n, depth + 1)));
    }
    deepest
}

pub(crate) fn len<K>(link: &Link<K>) -> usize {
    let mut n = 0;
    let mut stack: Vec<&Node<K>> = link.as_deref().into_iter().collect();
    while let Some(node) = stack.pop() {
        n += 1;
        stack.extend(node.left.as_deref());
        stack.extend(node.right.as_deref());
    }
    n
}

/// Minimal-height tree over childless nodes already sorted by key.
pub(crate) fn build_balanced<K>(nodes: Vec<Box<Node<K>>>) -> Link<K> {
    debug_assert!(nodes.iter().all(|n| n.left.is_none() && n.right.is_none()));
    let n = nodes.len();
    build(n, &mut nodes.into_iter())
}

fn build<K, I>(n: usize, nodes: &mut I) -> Link<K>
where
    I: Iterator<Item = Box<Node<K>>>,
{
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    let left = build(mid, nodes);
    let mut root = nodes.next()?;
    root.left = left;
    root.right = build(n - mid - 1, nodes);
    Some(root)
}

/// Balanced tree from strictly ascending `(key, count)` pairs.
pub(crate) fn from_sorted<K: Ord, I>(pairs: I) -> Link<K>
where
    I: IntoIterator<Item = (K, usize)>,
{
    let nodes: Vec<_> = pairs
        .into_iter()
        .map(|(key, count)| Node::leaf(key, count))
        .collect();
    debug_assert!(nodes.windows(2).all(|w| w[0].key < w[1].key));
    build_balanced(nodes)
}

/// Minimal height for `n` nodes: `ceil(log2(n + 1)) - 1`.
pub(crate) fn min_height(n: usize) -> isize {
    if n == 0 {
        return -1;
    }
    // n + 1 needs `bits` bits; ceil(log2(n + 1)) is that, minus one when n + 1 is a power of two.
    let m = n as u128 + 1;
    let bits = 128 - m.leading_zeros() as isize;
    let ceil_log2 = if m.is_power_of_two() { bits - 1 } else { bits };
    ceil_log2 - 1
}

#[cfg(test)]
pub(crate) fn validate<K: Ord + std::fmt::Debug>(link: &Link<K>) {
    let nodes = in_order(link);
    for node in &nodes {
        assert!(node.count >= 1, "node {:?} has count 0", node.key);
    }
    for pair in nodes.windows(2) {
        assert!(
            pair[0].key < pair[1].key,
            "keys out of order or duplicated: {:?} then {:?}",
            pair[0].key,
            pair[1].key
        );
    }
    assert_eq!(nodes.len(), len(link));
}

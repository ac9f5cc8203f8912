// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::FrameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Handled,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputFrame<F> {
    id: FrameId,
    payload: F,
    fallthrough: Option<FrameId>,
}

/// Stack of input handler frames. Each frame names the frame that was on
/// top when it was pushed as its fall-through target. Removing a frame
/// re-links anything that fell through to it, so closing frames out of
/// order never loses or resurrects a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputStack<F> {
    frames: Vec<InputFrame<F>>,
    next_id: u64,
}

impl<F> Default for InputStack<F> {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            next_id: 1,
        }
    }
}

impl<F> InputStack<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: F) -> FrameId {
        let id = FrameId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let fallthrough = self.top();
        self.frames.push(InputFrame {
            id,
            payload,
            fallthrough,
        });
        id
    }

    pub fn remove(&mut self, id: FrameId) -> Option<F> {
        let position = self.frames.iter().position(|frame| frame.id == id)?;
        let removed = self.frames.remove(position);
        for frame in &mut self.frames {
            if frame.fallthrough == Some(id) {
                frame.fallthrough = removed.fallthrough;
            }
        }
        Some(removed.payload)
    }

    pub fn top(&self) -> Option<FrameId> {
        self.frames.last().map(|frame| frame.id)
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.frames.iter().any(|frame| frame.id == id)
    }

    pub fn payload(&self, id: FrameId) -> Option<&F> {
        self.frames
            .iter()
            .find(|frame| frame.id == id)
            .map(|frame| &frame.payload)
    }

    pub fn fallthrough(&self, id: FrameId) -> Option<FrameId> {
        self.frames
            .iter()
            .find(|frame| frame.id == id)
            .and_then(|frame| frame.fallthrough)
    }

    /// Frames in the order a keypress visits them: the top frame, then each
    /// fall-through target.
    pub fn chain(&self) -> Vec<FrameId> {
        let mut chain = Vec::with_capacity(self.frames.len());
        let mut cursor = self.top();
        while let Some(id) = cursor {
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            cursor = self.fallthrough(id);
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::InputStack;

    #[test]
    fn push_links_to_previous_top() {
        let mut stack = InputStack::new();
        let global = stack.push("global");
        let table = stack.push("table");

        assert_eq!(stack.top(), Some(table));
        assert_eq!(stack.fallthrough(table), Some(global));
        assert_eq!(stack.chain(), vec![table, global]);
    }

    #[test]
    fn removing_top_restores_previous_handler() {
        let mut stack = InputStack::new();
        let global = stack.push("global");
        let table = stack.push("table");
        let before = stack.top();

        let dialog = stack.push("dialog");
        assert_eq!(stack.chain(), vec![dialog, table, global]);
        assert_eq!(stack.remove(dialog), Some("dialog"));
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn removing_outer_overlay_first_relinks_inner_overlay() {
        let mut stack = InputStack::new();
        let global = stack.push("global");
        let table = stack.push("table");
        let outer = stack.push("outer");
        let inner = stack.push("inner");

        stack.remove(outer);
        assert_eq!(stack.fallthrough(inner), Some(table));
        assert_eq!(stack.chain(), vec![inner, table, global]);

        stack.remove(inner);
        assert_eq!(stack.top(), Some(table));
    }

    #[test]
    fn open_cancel_open_confirm_returns_to_original_top() {
        let mut stack = InputStack::new();
        stack.push("global");
        let original = stack.push("table");

        let first = stack.push("confirm");
        stack.remove(first);
        let second = stack.push("confirm");
        stack.remove(second);

        assert_eq!(stack.top(), Some(original));
        assert_ne!(first, second);
    }

    #[test]
    fn removing_unknown_frame_is_a_no_op() {
        let mut stack = InputStack::new();
        let global = stack.push("global");
        stack.remove(global);
        assert_eq!(stack.remove(global), None);
        assert!(stack.is_empty());
        assert!(stack.chain().is_empty());
    }
}

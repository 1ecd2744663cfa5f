//! Owns every environment frame ever allocated and reclaims the ones that
//! become unreachable. There is no module in the teacher repo this is
//! grounded on directly; it mirrors `GarbageCollector` in the original
//! C++ source (`types.h`/`types.cpp`), reworked around `Rc` ownership
//! instead of a raw back-pointer from frame to collector.

use crate::env::{EnvRef, Frame};
use crate::value::Value;
use std::collections::HashSet;
use std::rc::Rc;

pub struct Arena {
    frames: Vec<EnvRef>,
    root: EnvRef,
}

impl Arena {
    pub fn new() -> Self {
        let root = Rc::new(std::cell::RefCell::new(Frame::new(None)));
        Arena {
            frames: vec![Rc::clone(&root)],
            root,
        }
    }

    pub fn root(&self) -> EnvRef {
        Rc::clone(&self.root)
    }

    /// Allocates a new frame whose parent is `parent`, retains it in the
    /// arena, and returns a handle to it.
    pub fn alloc(&mut self, parent: &EnvRef) -> EnvRef {
        let frame = Rc::new(std::cell::RefCell::new(Frame::new(Some(Rc::clone(
            parent,
        )))));
        self.frames.push(Rc::clone(&frame));
        frame
    }

    /// Reclaims every frame unreachable from the root. Run strictly
    /// between top-level evaluations, never mid-evaluation, since a
    /// frame currently on the call stack may not yet be referenced by
    /// any closure but is still in use.
    pub fn clear(&mut self) {
        let mut keep: HashSet<*const std::cell::RefCell<Frame>> = HashSet::new();
        let mut queue: Vec<EnvRef> = vec![Rc::clone(&self.root)];

        while let Some(frame) = queue.pop() {
            let ptr = Rc::as_ptr(&frame);
            if !keep.insert(ptr) {
                continue;
            }
            if let Some(parent) = frame.borrow().parent.clone() {
                queue.push(parent);
            }
            for value in frame.borrow().values() {
                if let Value::Closure(closure) = value {
                    queue.push(Rc::clone(&closure.env));
                }
            }
        }

        self.frames.retain(|f| keep.contains(&Rc::as_ptr(f)));
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::define;
    use crate::value::ClosureData;

    #[test]
    fn clear_drops_frames_unreachable_from_root() {
        let mut arena = Arena::new();
        let root = arena.root();
        let orphan = arena.alloc(&root);
        drop(orphan);
        assert_eq!(arena.frame_count(), 2);
        arena.clear();
        assert_eq!(arena.frame_count(), 1);
    }

    #[test]
    fn clear_preserves_frame_reachable_through_closure() {
        let mut arena = Arena::new();
        let root = arena.root();
        let captured = arena.alloc(&root);
        let closure = Value::Closure(Rc::new(ClosureData {
            params: vec![],
            body: vec![Value::Integer(1)],
            env: Rc::clone(&captured),
        }));
        define(&root, "f", closure);
        drop(captured);

        arena.clear();
        assert_eq!(arena.frame_count(), 2);
    }

    #[test]
    fn clear_never_drops_the_root() {
        let mut arena = Arena::new();
        arena.clear();
        assert_eq!(arena.frame_count(), 1);
    }
}

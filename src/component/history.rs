//! 撤销历史
//!
//! 有界的撤销栈：超出容量时丢弃最旧的记录。

use std::collections::VecDeque;

/// 默认保留的撤销步数
pub const DEFAULT_UNDO_CAPACITY: usize = 64;

/// 有界撤销栈
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> UndoStack<T> {
    /// 创建指定容量的撤销栈（容量至少为 1）
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 记录一个可恢复的状态
    pub fn push(&mut self, state: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(state);
    }

    /// 取出最近一次记录的状态
    pub fn undo(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    /// 清空历史（例如加载新模型时）
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_order() {
        let mut stack = UndoStack::new(8);
        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.undo(), Some(3));
        assert_eq!(stack.undo(), Some(2));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut stack = UndoStack::new(2);
        stack.push("a");
        stack.push("b");
        stack.push("c");

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.undo(), Some("c"));
        assert_eq!(stack.undo(), Some("b"));
        assert_eq!(stack.undo(), None);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut stack = UndoStack::new(0);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.undo(), Some(2));
    }

    #[test]
    fn test_clear() {
        let mut stack = UndoStack::default();
        stack.push(1.0);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.undo(), None);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier handed out by a [`TaskList`]; increases with creation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

/// Session-scoped tasks in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task. Blank text is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
        });
        Some(id)
    }

    /// Flips `completed`. Returns the new value, or `None` for an unknown id.
    pub fn toggle(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.len() - self.completed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_ignored() {
        let mut list = TaskList::new();
        assert_eq!(list.add(""), None);
        assert_eq!(list.add("   "), None);
        assert_eq!(list.add("\t\n"), None);
        assert!(list.is_empty());
    }

    #[test]
    fn add_trims_and_starts_incomplete() {
        let mut list = TaskList::new();
        let id = list.add("  buy milk ").expect("added");
        assert_eq!(list.len(), 1);
        let task = &list.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn ids_are_unique_even_when_added_back_to_back() {
        let mut list = TaskList::new();
        let ids: Vec<_> = (0..100)
            .filter_map(|i| list.add(&format!("task {i}")))
            .collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut list = TaskList::new();
        let first = list.add("a").expect("added");
        list.delete(first);
        let second = list.add("b").expect("added");
        assert_ne!(first, second);
    }

    #[test]
    fn toggle_flips_both_ways() {
        let mut list = TaskList::new();
        let id = list.add("write report").expect("added");
        assert_eq!(list.toggle(id), Some(true));
        assert_eq!(list.toggle(id), Some(false));
        assert_eq!(list.toggle(TaskId(999)), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut list = TaskList::new();
        let a = list.add("a").expect("added");
        let b = list.add("b").expect("added");

        assert!(list.delete(TaskId(999)).is_none());
        assert_eq!(list.len(), 2);

        assert_eq!(list.delete(a).map(|t| t.text), Some("a".to_string()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].id, b);
    }

    #[test]
    fn counts_track_completion() {
        let mut list = TaskList::new();
        let a = list.add("a").expect("added");
        list.add("b");
        list.toggle(a);
        assert_eq!(list.completed_count(), 1);
        assert_eq!(list.pending_count(), 1);
    }
}

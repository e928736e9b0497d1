use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

use super::{Task, TaskId, TaskList};
use crate::{log_debug, ui::Element};

const ENABLE_LOGS: bool = true;

pub const EMPTY_MESSAGE: &str = "No tasks yet. Add one above.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub tasks: Vec<Task>,
    pub completed: usize,
    pub pending: usize,
    pub total: usize,
}

pub struct TaskComponent {
    list: Mutex<TaskList>,
    items: Element,
    footer: Element,
}

impl TaskComponent {
    pub fn new(parent: &Element) -> Self {
        let root = parent.create_child_with_class("div", "daypanel-tasks");

        let form = root.create_child_with_class("div", "task-form");
        let input = form.create_child_with_class("input", "task-input");
        input.set_attr("type", "text");
        input.set_attr("placeholder", "Add a task…");
        input.set_attr("data-action", "addTask");
        let add = form.create_child_with_class("button", "task-add");
        add.set_attr("data-action", "addTask");
        add.set_text("Add");

        let items = root.create_child_with_class("ul", "task-items");
        let footer = root.create_child_with_class("div", "task-footer");

        let component = Self {
            list: Mutex::new(TaskList::new()),
            items,
            footer,
        };
        component.render();
        component
    }

    fn list(&self) -> MutexGuard<'_, TaskList> {
        match self.list.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn add(&self, text: &str) -> Option<TaskId> {
        let id = self.list().add(text);
        if id.is_some() {
            self.render();
        }
        id
    }

    pub fn toggle(&self, id: TaskId) -> Option<bool> {
        let completed = self.list().toggle(id);
        if completed.is_some() {
            self.render();
        }
        completed
    }

    pub fn delete(&self, id: TaskId) -> Option<Task> {
        let removed = self.list().delete(id);
        if removed.is_some() {
            self.render();
        }
        removed
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        let list = self.list();
        TaskSnapshot {
            tasks: list.tasks().to_vec(),
            completed: list.completed_count(),
            pending: list.pending_count(),
            total: list.len(),
        }
    }

    pub fn items(&self) -> &Element {
        &self.items
    }

    /// Rebuilds every row from the list.
    pub fn render(&self) {
        let list = self.list();
        self.items.empty();

        if list.is_empty() {
            let empty = self.items.create_child_with_class("li", "task-empty");
            empty.set_text(EMPTY_MESSAGE);
            self.footer.clear_text();
            self.footer.remove_class("all-done");
            return;
        }

        for task in list.tasks() {
            let row = self.items.create_child_with_class("li", "task-item");
            row.set_attr("data-task-id", task.id.to_string());
            row.toggle_class("completed", task.completed);

            let checkbox = row.create_child_with_class("input", "task-checkbox");
            checkbox.set_attr("type", "checkbox");
            checkbox.set_attr("data-action", "toggleTask");
            if task.completed {
                checkbox.set_attr("checked", "checked");
            }

            let text = row.create_child_with_class("span", "task-text");
            text.set_text(task.text.clone());

            let delete = row.create_child_with_class("button", "task-delete");
            delete.set_attr("data-action", "deleteTask");
            delete.set_text("×");
        }

        self.footer.set_text(format!(
            "{} of {} done",
            list.completed_count(),
            list.len()
        ));
        self.footer
            .toggle_class("all-done", list.pending_count() == 0);
        log_debug!("rendered {} task(s)", list.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_is_shown_initially() {
        let mount = Element::new("div");
        let _tasks = TaskComponent::new(&mount);
        let empty = mount.find_by_class("task-empty");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].text().as_deref(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn rows_follow_list_state() {
        let mount = Element::new("div");
        let tasks = TaskComponent::new(&mount);

        let milk = tasks.add("buy milk").expect("added");
        tasks.add("call <mum>");
        assert!(tasks.add("  ").is_none());
        tasks.toggle(milk);

        let rows = tasks.items().find_by_class("task-item");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].has_class("completed"));
        assert!(!rows[1].has_class("completed"));
        assert!(mount.find_by_class("task-empty").is_empty());

        let html = mount.to_html();
        assert!(html.contains("call &lt;mum&gt;"));
        assert!(html.contains("1 of 2 done"));
        assert_eq!(tasks.snapshot().pending, 1);

        let second = tasks.snapshot().tasks[1].id;
        tasks.toggle(second);
        assert_eq!(tasks.snapshot().pending, 0);
        assert!(mount.find_by_class("task-footer")[0].has_class("all-done"));
    }

    #[test]
    fn deleting_last_task_restores_empty_state() {
        let mount = Element::new("div");
        let tasks = TaskComponent::new(&mount);
        let id = tasks.add("only").expect("added");

        assert!(tasks.delete(id).is_some());
        assert!(tasks.delete(id).is_none());
        assert_eq!(mount.find_by_class("task-empty").len(), 1);
        assert_eq!(tasks.snapshot().total, 0);
    }

    #[test]
    fn snapshot_serialises_camel_case() {
        let mount = Element::new("div");
        let tasks = TaskComponent::new(&mount);
        let id = tasks.add("ship it").expect("added");
        tasks.toggle(id);

        let json = serde_json::to_value(tasks.snapshot()).expect("serialise");
        assert_eq!(json["completed"], 1);
        assert_eq!(json["tasks"][0]["text"], "ship it");
        assert_eq!(json["tasks"][0]["id"], 1);
    }
}

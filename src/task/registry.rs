use std::collections::HashMap;

use crate::task::info::{CurrentState, LastRunState, TaskDefinition, TaskInfo};

const DEFAULT_MAX_TASKS: usize = 10_000;

/// Local tasks known to this node.
#[derive(Debug)]
pub struct TaskRegistry {
    tasks: HashMap<String, TaskInfo>,
    max_tasks: usize,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_TASKS)
    }

    pub fn with_capacity(max_tasks: usize) -> Self {
        Self {
            tasks: HashMap::new(),
            max_tasks,
        }
    }

    /// Add a task. Returns false if the registry is at capacity.
    pub fn add_task(&mut self, task: TaskInfo) -> bool {
        if self.is_full() && !self.tasks.contains_key(&task.id) {
            return false;
        }
        self.tasks.insert(task.id.clone(), task);
        true
    }

    pub fn get_task(&self, id: &str) -> Option<&TaskInfo> {
        self.tasks.get(id)
    }

    pub fn get_task_mut(&mut self, id: &str) -> Option<&mut TaskInfo> {
        self.tasks.get_mut(id)
    }

    /// Replace a task's definition. Does not consult the edit guard; callers
    /// must run it first.
    pub fn update_definition(&mut self, id: &str, definition: TaskDefinition) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.definition = definition;
                true
            }
            None => false,
        }
    }

    pub fn update_current_state(&mut self, id: &str, current_state: CurrentState) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.current_state = current_state;
                true
            }
            None => false,
        }
    }

    pub fn record_run(&mut self, id: &str, last_run: LastRunState) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.last_run = Some(last_run);
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, id: &str) -> Option<TaskInfo> {
        self.tasks.remove(id)
    }

    /// All tasks, oldest first.
    pub fn all_tasks(&self) -> Vec<&TaskInfo> {
        let mut tasks: Vec<&TaskInfo> = self.tasks.values().collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.max_tasks
    }
}

//! Sample task-tracker domain used by the demo.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use repokit_core::traits::entity::{Described, Entity, Record};
use repokit_core::types::schema::{FieldDef, ScalarKind, Schema};
use repokit_core::types::value::FieldValue;
use repokit_memory::MemoryStore;

#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
}

static OWNER_SCHEMA: Schema = Schema::new(
    "Owner",
    &[
        FieldDef::scalar("id", ScalarKind::Uuid),
        FieldDef::scalar("name", ScalarKind::Text),
    ],
);

impl Record for Owner {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(FieldValue::from(&self.name)),
            _ => None,
        }
    }
}

impl Described for Owner {
    fn schema() -> &'static Schema {
        &OWNER_SCHEMA
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub priority: i64,
    pub done: bool,
    pub due: DateTime<Utc>,
    pub owner_id: Uuid,
    /// Loaded only when a query includes `"owner"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

static TASK_SCHEMA: Schema = Schema::new(
    "Task",
    &[
        FieldDef::scalar("id", ScalarKind::Uuid),
        FieldDef::scalar("title", ScalarKind::Text),
        FieldDef::scalar("priority", ScalarKind::Int),
        FieldDef::scalar("done", ScalarKind::Bool),
        FieldDef::scalar("due", ScalarKind::Timestamp),
        FieldDef::nested("owner", <Owner as Described>::schema),
    ],
);

impl Record for Task {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(self.id.into()),
            "title" => Some(FieldValue::from(&self.title)),
            "priority" => Some(self.priority.into()),
            "done" => Some(self.done.into()),
            "due" => Some(self.due.into()),
            "owner" => Some(match &self.owner {
                Some(owner) => FieldValue::Record(owner),
                None => FieldValue::Null,
            }),
            _ => None,
        }
    }
}

impl Described for Task {
    fn schema() -> &'static Schema {
        &TASK_SCHEMA
    }
}

impl Entity for Task {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Row shape printed by the demo.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub title: String,
    pub owner: Option<String>,
    pub priority: i64,
    pub due: DateTime<Utc>,
    pub done: bool,
}

impl From<Task> for TaskSummary {
    fn from(task: Task) -> Self {
        Self {
            title: task.title,
            owner: task.owner.map(|o| o.name),
            priority: task.priority,
            due: task.due,
            done: task.done,
        }
    }
}

/// A store seeded with a small fixed backlog, with `"owner"` loadable.
pub fn seeded_store() -> MemoryStore<Task> {
    let owners: Vec<Owner> = ["mira", "dev", "ola"]
        .into_iter()
        .map(|name| Owner {
            id: Uuid::new_v4(),
            name: name.to_string(),
        })
        .collect();

    let start = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).single().unwrap_or_else(Utc::now);
    let titles = [
        "triage inbox",
        "rotate keys",
        "write release notes",
        "fix flaky test",
        "review schema change",
        "upgrade runtime",
        "prune old branches",
        "profile cold start",
        "audit permissions",
        "draft roadmap",
        "update runbook",
        "close stale issues",
    ];

    let tasks = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let n = i as i64;
            Task {
                id: Uuid::new_v4(),
                title: (*title).to_string(),
                priority: (n * 7) % 5 + 1,
                done: i % 4 == 3,
                due: start + Duration::days((n * 5) % 11),
                owner_id: owners[i % owners.len()].id,
                owner: None,
            }
        })
        .collect();

    let directory: Arc<HashMap<Uuid, Owner>> =
        Arc::new(owners.into_iter().map(|o| (o.id, o)).collect());

    MemoryStore::with_rows(tasks).with_relation("owner", move |task: &mut Task| {
        task.owner = directory.get(&task.owner_id).cloned();
    })
}

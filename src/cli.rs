//! Command-line arguments and dispatch for the demo.

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::info;

use repokit_core::config::AppConfig;
use repokit_core::error::AppError;
use repokit_core::traits::data_source::UnitOfWork;
use repokit_core::traits::repository::Repository;
use repokit_core::types::limiting::Limiting;
use repokit_core::types::pagination::PaginationParameters;
use repokit_core::types::sorting::{SortDescriptor, Sorting};
use repokit_core::types::specification::{Predicate, Specification};
use repokit_query::{FieldResolver, SpecRepository};

use crate::tasks::{Task, TaskSummary, seeded_store};

/// Query a seeded task backlog through RepoKit
#[derive(Debug, Parser)]
#[command(name = "repokit-demo", version, about, long_about = None)]
pub struct Cli {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<i64>,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<i64>,

    /// Sort key, a dotted path such as `due` or `owner.name`
    #[arg(long, default_value = "due")]
    pub sort: String,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Return at most this many tasks instead of a page
    #[arg(long, conflicts_with_all = ["page", "page_size"])]
    pub limit: Option<usize>,

    /// Hide finished tasks
    #[arg(long)]
    pub open_only: bool,

    /// Delete finished tasks and commit before querying
    #[arg(long)]
    pub purge_done: bool,

    /// Configuration environment overlay (`config/<env>.toml`)
    #[arg(long, default_value = "development")]
    pub env: String,
}

impl Cli {
    /// Run the query described by the arguments and print it as JSON.
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let store = Arc::new(seeded_store());
        let resolver = Arc::new(FieldResolver::from_config(&config.resolver));
        let repo = SpecRepository::with_resolver(Arc::clone(&store), resolver);

        if self.purge_done {
            let staged = repo
                .delete(&Specification::matching(|t: &Task| t.done))
                .await?;
            let applied = store.commit().await?;
            info!(staged, applied, "Purged finished tasks");
        }

        let spec = Specification::all().include("owner").untracked();
        let sorting = self.sorting();

        match self.limit {
            Some(limit) => {
                let spec = match self.open_filter() {
                    Some(open) => spec.with_predicate(open),
                    None => spec,
                };
                let tasks = repo
                    .get_many_limited(&spec, sorting, Limiting::new(limit)?)
                    .await?;
                let summaries: Vec<TaskSummary> = tasks.into_iter().map(Into::into).collect();
                print_json(&summaries)
            }
            None => {
                let params =
                    PaginationParameters::from_config(&config.pagination, self.page, self.page_size);
                let page = repo
                    .get_paginated(
                        &spec,
                        &params,
                        <TaskSummary as From<Task>>::from,
                        self.open_filter(),
                        Some(sorting),
                    )
                    .await?;
                print_json(&page)
            }
        }
    }

    fn sorting(&self) -> Sorting<Task> {
        let key = SortDescriptor::<Task>::path(self.sort.clone());
        let key = if self.desc { key.descending() } else { key };
        // Title breaks ties so pages are deterministic.
        key.then_by(SortDescriptor::by_named("title", |t: &Task| t.title.clone()))
    }

    fn open_filter(&self) -> Option<Predicate<Task>> {
        self.open_only.then(|| Predicate::new(|t: &Task| !t.done))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

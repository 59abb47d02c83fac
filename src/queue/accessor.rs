//! Accessor

use crate::queue::{QueueMode, QueueService};
use crate::task::{TaskInput, TaskRecord};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Names of every queue, in the service's order
pub async fn get_queue_names<S>(service: &S) -> crate::Result<Vec<String>>
where
    S: QueueService + ?Sized,
{
    let queues = service.get_queues().await?;
    Ok(queues.into_iter().map(|desc| desc.name).collect())
}

/// Names of the push queues
pub async fn get_push_queue_names<S>(service: &S) -> crate::Result<Vec<String>>
where
    S: QueueService + ?Sized,
{
    queue_names_by_mode(service, QueueMode::Push).await
}

/// Names of the pull queues
pub async fn get_pull_queue_names<S>(service: &S) -> crate::Result<Vec<String>>
where
    S: QueueService + ?Sized,
{
    queue_names_by_mode(service, QueueMode::Pull).await
}

async fn queue_names_by_mode<S>(service: &S, mode: QueueMode) -> crate::Result<Vec<String>>
where
    S: QueueService + ?Sized,
{
    let queues = service.get_queues().await?;
    Ok(queues
        .into_iter()
        .filter(|desc| desc.mode == mode)
        .map(|desc| desc.name)
        .collect())
}

/// Resolve an optional name list, falling back to every queue
async fn names_or_all<S>(service: &S, queue_names: Option<&[String]>) -> crate::Result<Vec<String>>
where
    S: QueueService + ?Sized,
{
    match queue_names {
        Some(names) if !names.is_empty() => Ok(names.to_vec()),
        _ => get_queue_names(service).await,
    }
}

/// Pending tasks keyed by queue name
///
/// With no names given, every queue is listed.
pub async fn get_tasks<S>(
    service: &S,
    queue_names: Option<&[String]>,
) -> crate::Result<BTreeMap<String, Vec<TaskRecord>>>
where
    S: QueueService + ?Sized,
{
    let mut tasks_by_queue = BTreeMap::new();

    for queue_name in names_or_all(service, queue_names).await? {
        let tasks = service.get_tasks(&queue_name).await?;
        tasks_by_queue
            .entry(queue_name)
            .or_insert_with(Vec::new)
            .extend(tasks);
    }

    Ok(tasks_by_queue)
}

/// Flush queues and report how many tasks they held
///
/// With no names given, every queue is purged.
pub async fn purge_tasks<S>(service: &S, queue_names: Option<&[String]>) -> crate::Result<usize>
where
    S: QueueService + ?Sized,
{
    let mut purged = 0;

    for queue_name in names_or_all(service, queue_names).await? {
        purged += service.get_tasks(&queue_name).await?.len();
        service.flush_queue(&queue_name).await?;
    }

    debug!("Purged {} tasks", purged);
    Ok(purged)
}

/// Add tasks to several queues, returning how many were added
///
/// Raw tasks are rebuilt to match the mode of the queue they are added to;
/// native tasks are added unchanged.
pub async fn add_tasks<S, I>(service: &S, tasks_by_queue: I) -> crate::Result<usize>
where
    S: QueueService + ?Sized,
    I: IntoIterator<Item = (String, Vec<TaskInput>)>,
{
    let modes: HashMap<String, QueueMode> = service
        .get_queues()
        .await?
        .into_iter()
        .map(|desc| (desc.name, desc.mode))
        .collect();

    let mut added = 0;

    for (queue_name, inputs) in tasks_by_queue {
        let mode = *modes
            .get(&queue_name)
            .ok_or_else(|| crate::RunnerError::UnknownQueue(queue_name.clone()))?;

        let tasks = inputs
            .into_iter()
            .map(|input| input.normalize(mode))
            .collect::<crate::Result<Vec<_>>>()?;

        if tasks.is_empty() {
            continue;
        }

        let count = tasks.len();
        service.add_tasks(&queue_name, tasks).await?;
        added += count;
    }

    debug!("Re-added {} tasks", added);
    Ok(added)
}

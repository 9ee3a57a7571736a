use std::{
    fmt::{self, Display},
    ops::Deref,
    sync::Arc,
    time::Duration as StdDuration,
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::{sync::RwLock, time::sleep};

use crate::time;

use super::Task;

type RwLockedTasks = Arc<RwLock<Vec<RunningTask>>>;

struct RunningTask {
    pub next_scheduled_execution: DateTime<Utc>,
    pub inner: Box<dyn Task + Send + Sync>,
}

impl Deref for RunningTask {
    type Target = Box<dyn Task + Send + Sync>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerMode {
    /// Will only execute tasks based on their defined interval. Normal operation.
    Timer,
    /// Will only allow execution via [`TaskRunnerHandle::trigger`]. Useful in testing.
    ManuallyTriggered,
}

impl Display for RunnerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => write!(f, "timer"),
            Self::ManuallyTriggered => write!(f, "manually-triggered"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("task not found")]
    NotFound,
    #[error("task execution failed")]
    ExecutionFailed,
}

/// Handle onto a runner's task list which allows tasks to be executed
/// outside of their normal schedule.
#[derive(Clone)]
pub struct TaskRunnerHandle {
    tasks: RwLockedTasks,
}

impl TaskRunnerHandle {
    /// Run the named task immediately and push back its next scheduled
    /// execution.
    pub async fn trigger(&self, name: &str) -> Result<(), TriggerError> {
        let mut tasks = self.tasks.write().await;

        let Some(task) = tasks.iter_mut().find(|task| task.name() == name) else {
            return Err(TriggerError::NotFound);
        };

        tracing::info!("Manually triggered task: {}", task.name());

        if let Err(e) = task.run().await {
            tracing::error!("Failed to manually run task {}: {}", task.name(), e);
            return Err(TriggerError::ExecutionFailed);
        }

        task.next_scheduled_execution = time::now() + task.interval();
        Ok(())
    }

    pub async fn task_names(&self) -> Vec<String> {
        let tasks = self.tasks.read().await;

        tasks.iter().map(|task| task.name().to_string()).collect()
    }
}

/// Run tasks, either on a schedule or manually triggered through a
/// [`TaskRunnerHandle`].
pub struct TaskRunner {
    mode: RunnerMode,
    tasks: RwLockedTasks,
}

impl TaskRunner {
    pub fn new(mode: RunnerMode) -> Self {
        Self {
            mode,
            tasks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn add_task(&self, task: impl Task + Send + Sync + 'static) -> &Self {
        tracing::debug!("Adding task '{}'", task.name());

        let mut tasks = self.tasks.write().await;

        tasks.push(RunningTask {
            // We want the task to initially execute immediately
            // Subsequent executions will be scheduled using `now() + task.interval()`
            next_scheduled_execution: time::now(),
            inner: Box::new(task),
        });

        self
    }

    pub fn handle(&self) -> TaskRunnerHandle {
        TaskRunnerHandle {
            tasks: self.tasks.clone(),
        }
    }

    pub async fn run(&mut self) {
        tracing::info!("Starting task runner in {} mode", self.mode);

        if self.mode == RunnerMode::Timer {
            loop {
                // Open new scope so we don't sleep with the write lock open
                {
                    let mut tasks = self.tasks.write().await;
                    for task in tasks.iter_mut() {
                        let now = time::now();

                        if task.next_scheduled_execution < now {
                            tracing::debug!("Running task: {}", task.name());

                            if let Err(e) = task.run().await {
                                tracing::error!("Failed to run task {}: {}", task.name(), e);
                            }

                            let task_interval = task.interval();

                            task.next_scheduled_execution = now + task_interval;
                        }
                    }
                }

                // The runner wakes every second and checks which tasks are due.
                // A coarse cadence keeps the loop cheap while still letting
                // short-interval tasks fire close to their schedule.
                sleep(StdDuration::from_secs(1)).await;
            }
        } else {
            // If we're only manually triggered, just sleep forever
            loop {
                sleep(StdDuration::from_secs(60)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingTask {
        runs: Arc<AtomicU32>,
        interval: Duration,
        fail: bool,
    }

    #[async_trait]
    impl Task for CountingTask {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn run(&self) -> anyhow::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                anyhow::bail!("task failed on purpose");
            }

            Ok(())
        }

        fn interval(&self) -> Duration {
            self.interval
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timer_mode_runs_task_immediately() {
        let runs = Arc::new(AtomicU32::new(0));

        let runner = TaskRunner::new(RunnerMode::Timer);
        runner
            .add_task(CountingTask {
                runs: runs.clone(),
                interval: Duration::minutes(30),
                fail: false,
            })
            .await;

        let mut runner = runner;
        let join = tokio::task::spawn(async move { runner.run().await });

        tokio::time::sleep(StdDuration::from_secs(2)).await;
        join.abort();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_mode_only_runs_on_trigger() {
        let runs = Arc::new(AtomicU32::new(0));

        let runner = TaskRunner::new(RunnerMode::ManuallyTriggered);
        runner
            .add_task(CountingTask {
                runs: runs.clone(),
                interval: Duration::minutes(30),
                fail: false,
            })
            .await;

        let handle = runner.handle();

        let mut runner = runner;
        let join = tokio::task::spawn(async move { runner.run().await });

        tokio::time::sleep(StdDuration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        handle.trigger("counting").await.unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        join.abort();
    }

    #[tokio::test]
    async fn trigger_unknown_task_is_an_error() {
        let runner = TaskRunner::new(RunnerMode::ManuallyTriggered);
        let handle = runner.handle();

        assert!(matches!(
            handle.trigger("missing").await,
            Err(TriggerError::NotFound)
        ));
    }

    #[tokio::test]
    async fn trigger_reports_task_failure() {
        let runs = Arc::new(AtomicU32::new(0));

        let runner = TaskRunner::new(RunnerMode::ManuallyTriggered);
        runner
            .add_task(CountingTask {
                runs: runs.clone(),
                interval: Duration::minutes(30),
                fail: true,
            })
            .await;

        let handle = runner.handle();

        assert!(matches!(
            handle.trigger("counting").await,
            Err(TriggerError::ExecutionFailed)
        ));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handle_lists_task_names() {
        let runner = TaskRunner::new(RunnerMode::ManuallyTriggered);
        runner
            .add_task(CountingTask {
                runs: Arc::new(AtomicU32::new(0)),
                interval: Duration::minutes(30),
                fail: false,
            })
            .await;

        assert_eq!(runner.handle().task_names().await, vec!["counting"]);
    }
}

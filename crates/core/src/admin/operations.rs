//! System operations that only pretend to work
//!
//! Each operation sleeps for a fixed time and then reports an outcome. The
//! work runs on a tokio task owned by an [`OperationHandle`]; dropping or
//! cancelling the handle aborts the task, so a dismissed panel never
//! receives a late update.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemOperation {
    ClearCache,
    OptimizeDatabase,
    RunDiagnostics,
    RebuildSearchIndex,
    CheckUpdates,
}

impl SystemOperation {
    pub const ALL: [SystemOperation; 5] = [
        SystemOperation::ClearCache,
        SystemOperation::OptimizeDatabase,
        SystemOperation::RunDiagnostics,
        SystemOperation::RebuildSearchIndex,
        SystemOperation::CheckUpdates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemOperation::ClearCache => "clear-cache",
            SystemOperation::OptimizeDatabase => "optimize-database",
            SystemOperation::RunDiagnostics => "run-diagnostics",
            SystemOperation::RebuildSearchIndex => "rebuild-search-index",
            SystemOperation::CheckUpdates => "check-updates",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemOperation::ClearCache => "Очистить кэш",
            SystemOperation::OptimizeDatabase => "Оптимизировать базу данных",
            SystemOperation::RunDiagnostics => "Запустить диагностику",
            SystemOperation::RebuildSearchIndex => "Перестроить поисковый индекс",
            SystemOperation::CheckUpdates => "Проверить обновления",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            SystemOperation::ClearCache => Duration::from_millis(1500),
            SystemOperation::OptimizeDatabase => Duration::from_millis(3000),
            SystemOperation::RunDiagnostics => Duration::from_millis(2500),
            SystemOperation::RebuildSearchIndex => Duration::from_millis(4000),
            SystemOperation::CheckUpdates => Duration::from_millis(2000),
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            SystemOperation::ClearCache => "Кэш очищен, освобождено 128 МБ",
            SystemOperation::OptimizeDatabase => "База данных оптимизирована",
            SystemOperation::RunDiagnostics => "Диагностика завершена: проблем не найдено",
            SystemOperation::RebuildSearchIndex => "Поисковый индекс перестроен",
            SystemOperation::CheckUpdates => "Установлена последняя версия",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub operation: SystemOperation,
    pub success: bool,
    pub message: String,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum OperationStatus {
    Running { started_at: DateTime<Utc> },
    Finished(OperationOutcome),
    Cancelled,
}

impl OperationStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, OperationStatus::Running { .. })
    }
}

pub struct OperationHandle {
    operation: SystemOperation,
    status: Arc<Mutex<OperationStatus>>,
    task: JoinHandle<()>,
}

impl OperationHandle {
    /// Starts `operation` on the current tokio runtime.
    pub fn start(operation: SystemOperation) -> Self {
        let status = Arc::new(Mutex::new(OperationStatus::Running {
            started_at: Utc::now(),
        }));

        let shared = Arc::clone(&status);
        let task = tokio::spawn(async move {
            tokio::time::sleep(operation.duration()).await;

            let outcome = OperationOutcome {
                operation,
                success: true,
                message: operation.success_message().to_string(),
                finished_at: Utc::now(),
            };
            let mut status = shared.lock().unwrap_or_else(|e| e.into_inner());
            if status.is_running() {
                info!(operation = operation.as_str(), "System operation finished");
                *status = OperationStatus::Finished(outcome);
            }
        });

        debug!(operation = operation.as_str(), "System operation started");
        Self {
            operation,
            status,
            task,
        }
    }

    pub fn operation(&self) -> SystemOperation {
        self.operation
    }

    pub fn status(&self) -> OperationStatus {
        self.status.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Aborts the operation if it is still running.
    pub fn cancel(&self) {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        if status.is_running() {
            self.task.abort();
            *status = OperationStatus::Cancelled;
            info!(operation = self.operation.as_str(), "System operation cancelled");
        }
    }
}

impl Drop for OperationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

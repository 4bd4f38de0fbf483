//! # Task System Core Traits
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the thread that owns the manager
//! 5. The result can hand tasks back to be scheduled again
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the owning thread
//! - All shared state must be properly synchronized

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own everything they need. `process` consumes the task so that a task which
/// cannot finish yet can travel back inside its result and be published again.
pub trait Task: Send {
    /// Runs the task and returns its result.
    ///
    /// Runs on a background thread; errors are handled inside the task and reported
    /// through the result.
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Handles the result on the thread that owns the `TaskManager`.
    ///
    /// Returns tasks to schedule next (often the task itself, when it was deferred).
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>>;
}

// stepform/src/tracker.rs

//! Completion tracking: which steps are done, how far along the form is, and
//! whether everything required is complete.
//!
//! `evaluate` is the single pure source of truth. `CompletionTracker` only
//! decides *when* to publish the completed set (after a debounce window);
//! progress and the all-complete flag are always computed on demand from the
//! raw values so they can never lag behind a pending recomputation.

use crate::catalog::Catalog;
use crate::core::form_state::{FormChanges, FormState};
use crate::core::values::FormValues;
use crate::validation::{is_step_applicable, is_step_complete};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{event, instrument, span, Level};

/// Debounce window used when the configuration does not override it.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Ordinals of the steps that currently validate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedSteps(BTreeSet<usize>);

impl CompletedSteps {
  pub fn contains(&self, ordinal: usize) -> bool {
    self.0.contains(&ordinal)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.0.iter().copied()
  }
}

impl FromIterator<usize> for CompletedSteps {
  fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

/// Result of evaluating every step of a catalog against one set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
  /// Applicable steps (optional ones included) whose rule passes.
  pub completed: CompletedSteps,
  /// Steps whose applicability predicate is false.
  pub skipped: BTreeSet<usize>,
  /// Applicable, non-optional steps.
  pub required: usize,
  pub completed_required: usize,
  /// 0..=100, rounded.
  pub progress: u8,
  pub all_required_complete: bool,
}

pub fn evaluate(catalog: &Catalog, values: &FormValues) -> Completion {
  let mut completed = BTreeSet::new();
  let mut skipped = BTreeSet::new();
  let mut required = 0usize;
  let mut completed_required = 0usize;

  for step in catalog.steps() {
    let step_span = span!(
      Level::TRACE,
      "step_evaluation",
      step_key = step.key.as_str(),
      ordinal = step.ordinal,
      optional = step.is_optional()
    );
    let _step_span_guard = step_span.enter();

    if !is_step_applicable(step.key, values) {
      event!(Level::TRACE, "Step skipped due to applicability predicate.");
      skipped.insert(step.ordinal);
      continue;
    }
    let done = is_step_complete(step.key, values);
    if done {
      completed.insert(step.ordinal);
    }
    if !step.is_optional() {
      required += 1;
      if done {
        completed_required += 1;
      }
    }
    event!(Level::TRACE, done, "Step evaluated.");
  }

  Completion {
    completed: CompletedSteps(completed),
    skipped,
    required,
    completed_required,
    progress: progress_percent(completed_required, required),
    all_required_complete: completed_required == required,
  }
}

pub fn completed_steps(catalog: &Catalog, values: &FormValues) -> CompletedSteps {
  evaluate(catalog, values).completed
}

fn progress_percent(done: usize, required: usize) -> u8 {
  if required == 0 {
    return 100;
  }
  ((done as f64 * 100.0) / required as f64).round() as u8
}

/// Keeps a debounced `CompletedSteps` set in sync with a `FormState`.
///
/// Every change notification cancels the pending recomputation and schedules
/// a new one `debounce` later; the recomputation reads the values current
/// when the timer fires. A new set is published only when its membership
/// differs from the previous one. Dropping the tracker stops its task.
pub struct CompletionTracker {
  form: FormState,
  catalog: Arc<Catalog>,
  completed: watch::Receiver<CompletedSteps>,
  recomputations: Arc<AtomicUsize>,
  task: JoinHandle<()>,
}

impl CompletionTracker {
  /// Computes the set once immediately, then starts the debounce task.
  /// Must be called from within a Tokio runtime.
  #[instrument(
    name = "CompletionTracker::spawn",
    skip_all,
    fields(form_type = catalog.form_type().as_str(), num_steps = catalog.len(), debounce_ms = debounce.as_millis() as u64)
  )]
  pub fn spawn(form: FormState, catalog: Arc<Catalog>, debounce: Duration) -> Self {
    // Subscribe before the initial computation so no edit falls in between.
    let changes = form.watch();
    let initial = completed_steps(&catalog, &form.get_values());
    event!(Level::DEBUG, completed = initial.len(), "Initial completion computed.");
    let (publisher, completed) = watch::channel(initial);
    let recomputations = Arc::new(AtomicUsize::new(0));

    let task = tokio::spawn(run_debounced(
      form.clone(),
      catalog.clone(),
      debounce,
      changes,
      publisher,
      recomputations.clone(),
    ));

    Self {
      form,
      catalog,
      completed,
      recomputations,
      task,
    }
  }

  /// Last published set. May trail the live values by up to one debounce window.
  pub fn completed(&self) -> CompletedSteps {
    self.completed.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<CompletedSteps> {
    self.completed.clone()
  }

  /// Full evaluation against the live values.
  pub fn completion(&self) -> Completion {
    evaluate(&self.catalog, &self.form.get_values())
  }

  pub fn progress(&self) -> u8 {
    self.completion().progress
  }

  pub fn all_required_complete(&self) -> bool {
    self.completion().all_required_complete
  }

  /// How many debounced recomputations have run since spawn.
  pub fn recomputations(&self) -> usize {
    self.recomputations.load(Ordering::SeqCst)
  }

  pub fn catalog(&self) -> &Arc<Catalog> {
    &self.catalog
  }
}

impl Drop for CompletionTracker {
  fn drop(&mut self) {
    self.task.abort();
  }
}

async fn run_debounced(
  form: FormState,
  catalog: Arc<Catalog>,
  debounce: Duration,
  mut changes: FormChanges,
  publisher: watch::Sender<CompletedSteps>,
  recomputations: Arc<AtomicUsize>,
) {
  loop {
    if changes.changed().await.is_err() {
      return;
    }
    // Cancel-and-reschedule: each further change restarts the window.
    loop {
      tokio::select! {
        changed = changes.changed() => {
          if changed.is_err() {
            return;
          }
          event!(Level::TRACE, "Recomputation rescheduled.");
        }
        _ = tokio::time::sleep(debounce) => break,
      }
    }

    let next = completed_steps(&catalog, &form.get_values());
    recomputations.fetch_add(1, Ordering::SeqCst);
    let published = publisher.send_if_modified(|current| {
      if *current != next {
        *current = next;
        true
      } else {
        false
      }
    });
    event!(Level::DEBUG, published, version = form.version(), "Completion recomputed.");
  }
}

//! Batch operations over a selection of rows.
//!
//! A destructive command runs through
//!
//! ```text
//! Idle → Selecting → Confirming → Mutating → Compacting → Idle
//! ```
//!
//! An empty selection goes straight back to `Idle`, as does a declined
//! confirmation. Nothing carries over between commands.

mod confirm;

use std::io::Write;

pub use confirm::{AlwaysConfirm, Confirm, LineConfirm};

use crate::app::{BriefError, Result};
use crate::domain::{Collection, Item, Subscription};
use crate::selection::{self, Resolution};
use crate::store::{DeleteOutcome, Store};

/// Where a batch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selecting,
    Confirming,
    Mutating,
    Compacting,
}

/// A row as shown in a batch preview.
pub trait Listed {
    fn id(&self) -> i64;
    fn label(&self) -> &str;
}

impl Listed for Item {
    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        self.display_title()
    }
}

impl Listed for Subscription {
    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.source_uri
    }
}

/// Rows matched by a selection expression.
#[derive(Debug, Clone)]
pub struct Selected<T> {
    pub resolution: Resolution,
    pub rows: Vec<T>,
    pub missing: Vec<i64>,
}

impl<T: Listed> Selected<T> {
    pub fn ids(&self) -> Vec<i64> {
        self.rows.iter().map(Listed::id).collect()
    }
}

/// Resolve `expression` against the item collection and load the matches.
pub fn select_items<S: Store + ?Sized>(store: &S, expression: &str) -> Result<Selected<Item>> {
    select(store, Collection::Items, expression, |id| store.get_item(id))
}

/// Resolve `expression` against the subscriptions and load the matches.
pub fn select_subscriptions<S: Store + ?Sized>(
    store: &S,
    expression: &str,
) -> Result<Selected<Subscription>> {
    select(store, Collection::Subscriptions, expression, |id| {
        store.get_subscription(id)
    })
}

fn select<S, T, F>(store: &S, collection: Collection, expression: &str, load: F) -> Result<Selected<T>>
where
    S: Store + ?Sized,
    F: Fn(i64) -> Result<Option<T>>,
{
    let resolution = selection::resolve(expression, store.count(collection)?);

    let mut rows = Vec::new();
    let mut missing = Vec::new();
    for &id in &resolution.ids {
        match load(id)? {
            Some(row) => rows.push(row),
            None => missing.push(id),
        }
    }

    Ok(Selected {
        resolution,
        rows,
        missing,
    })
}

/// Print every rejected token, every id that matched nothing and every
/// range span past the end of the collection.
pub fn report_selection<T>(
    out: &mut dyn Write,
    collection: Collection,
    selected: &Selected<T>,
) -> Result<()> {
    for token in &selected.resolution.rejected {
        let err = BriefError::Selection {
            collection,
            token: token.clone(),
        };
        writeln!(out, "{}", err)?;
    }
    for &id in &selected.missing {
        writeln!(out, "{}", BriefError::UnknownIdentifier { collection, id })?;
    }
    for &(start, end) in &selected.resolution.beyond {
        if start == end {
            writeln!(out, "{}", BriefError::UnknownIdentifier { collection, id: start })?;
        } else {
            writeln!(out, "No {} found with IDs {}-{}", collection, start, end)?;
        }
    }
    Ok(())
}

/// One destructive batch: selection, preview, confirmation, delete.
pub struct Batch {
    collection: Collection,
    confirm_threshold: usize,
    assume_yes: bool,
    phase: Phase,
    trail: Vec<Phase>,
}

impl Batch {
    pub fn new(collection: Collection, confirm_threshold: usize) -> Self {
        Self {
            collection,
            confirm_threshold,
            assume_yes: false,
            phase: Phase::Idle,
            trail: Vec::new(),
        }
    }

    /// Skip the confirmation step, as `--yes` does.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Phases entered so far, in order.
    pub fn trail(&self) -> &[Phase] {
        &self.trail
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!("{} batch: {:?} -> {:?}", self.collection, self.phase, phase);
        self.phase = phase;
        self.trail.push(phase);
    }

    /// Select, preview and, once confirmed, delete the rows matching
    /// `expression`, compacting the collection once at the end.
    pub fn delete<S: Store + ?Sized>(
        &mut self,
        store: &S,
        expression: &str,
        confirm: &mut dyn Confirm,
        out: &mut dyn Write,
    ) -> Result<DeleteOutcome> {
        self.enter(Phase::Selecting);
        let (ids, missing, approved) = match self.collection {
            Collection::Items => {
                let selected = select_items(store, expression)?;
                let approved = self.confirm_selection(&selected, confirm, out)?;
                (selected.ids(), selected.missing, approved)
            }
            Collection::Subscriptions => {
                let selected = select_subscriptions(store, expression)?;
                let approved = self.confirm_selection(&selected, confirm, out)?;
                (selected.ids(), selected.missing, approved)
            }
        };

        if !approved {
            return Ok(DeleteOutcome {
                deleted: Vec::new(),
                missing,
            });
        }

        let mut outcome = self.apply(store, &ids, out)?;
        outcome.missing.extend(missing);
        Ok(outcome)
    }

    /// Report and preview `selected`, then ask before a wildcard or a
    /// selection larger than the confirmation threshold.
    ///
    /// Returns `false`, leaving the batch `Idle`, when nothing matched or the
    /// answer was no. Any command that ends up deleting rows goes through
    /// here before it touches anything.
    pub fn confirm_selection<T: Listed>(
        &mut self,
        selected: &Selected<T>,
        confirm: &mut dyn Confirm,
        out: &mut dyn Write,
    ) -> Result<bool> {
        if self.phase != Phase::Selecting {
            self.enter(Phase::Selecting);
        }
        report_selection(out, self.collection, selected)?;

        if selected.rows.is_empty() {
            if selected.resolution.wildcard {
                writeln!(out, "No {}s to delete.", self.collection)?;
            } else {
                writeln!(out, "No valid {} IDs to delete.", self.collection)?;
            }
            self.enter(Phase::Idle);
            return Ok(false);
        }

        for row in &selected.rows {
            writeln!(out, "  {}. {}", row.id(), row.label())?;
        }

        let wildcard = selected.resolution.wildcard;
        if self.assume_yes || !(wildcard || selected.rows.len() > self.confirm_threshold) {
            return Ok(true);
        }

        self.enter(Phase::Confirming);
        if wildcard {
            write!(out, "Are you sure to delete ALL {}s? (y/n) ", self.collection)?;
        } else {
            write!(out, "Delete {} {}s? (y/n) ", selected.rows.len(), self.collection)?;
        }
        out.flush()?;

        if !confirm.confirm()? {
            writeln!(out, "Operation cancelled.")?;
            self.enter(Phase::Idle);
            return Ok(false);
        }
        Ok(true)
    }

    /// Delete `ids` without selection or confirmation, e.g. after they were
    /// consumed by playback.
    pub fn delete_ids<S: Store + ?Sized>(
        &mut self,
        store: &S,
        ids: &[i64],
        out: &mut dyn Write,
    ) -> Result<DeleteOutcome> {
        if ids.is_empty() {
            return Ok(DeleteOutcome::default());
        }
        self.apply(store, ids, out)
    }

    fn apply<S: Store + ?Sized>(
        &mut self,
        store: &S,
        ids: &[i64],
        out: &mut dyn Write,
    ) -> Result<DeleteOutcome> {
        self.enter(Phase::Mutating);
        let outcome = store.delete(self.collection, ids)?;
        if !outcome.deleted.is_empty() {
            // The store compacts inside the delete transaction.
            self.enter(Phase::Compacting);
        }

        for id in &outcome.deleted {
            writeln!(out, "Deleted {} ID {}", self.collection, id)?;
        }
        for id in &outcome.missing {
            writeln!(out, "No {} found with ID {}", self.collection, id)?;
        }

        self.enter(Phase::Idle);
        Ok(outcome)
    }
}

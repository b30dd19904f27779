//! Stage lifecycle state machine.
//!
//! A product moves strictly sequentially through a configured [`StageCatalog`].
//! From the `Created` sentinel the only legal stage is the first catalog entry;
//! from index `i` it is `i + 1`; once the last (terminal) entry is reached,
//! nothing else may be recorded.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use pharmasafe_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, Identity, ProductId, TransitionRejection,
};

use crate::product::{INITIAL_STAGE, StageRecord, truncate_to_micros};

/// Ordered list of stage names; the last entry is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageCatalog {
    stages: Vec<String>,
}

impl StageCatalog {
    pub fn new<I, S>(stages: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for stage in stages {
            let stage: String = stage.into();
            let stage = stage.trim();
            if stage.is_empty() {
                return Err(DomainError::invalid_input("stage names cannot be blank"));
            }
            if stage == INITIAL_STAGE {
                return Err(DomainError::invalid_input(format!(
                    "\"{INITIAL_STAGE}\" is reserved for products without stages"
                )));
            }
            if out.iter().any(|s| s == stage) {
                return Err(DomainError::invalid_input(format!("duplicate stage \"{stage}\"")));
            }
            out.push(stage.to_string());
        }

        if out.is_empty() {
            return Err(DomainError::invalid_input("stage catalog cannot be empty"));
        }
        Ok(Self { stages: out })
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn terminal(&self) -> &str {
        // Non-empty by construction.
        &self.stages[self.stages.len() - 1]
    }

    pub fn is_terminal(&self, stage: &str) -> bool {
        self.terminal() == stage
    }

    pub fn index_of(&self, stage: &str) -> Option<usize> {
        self.stages.iter().position(|s| s == stage)
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.stages.get(index).map(String::as_str)
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self {
            stages: [
                "Manufacturing",
                "Regulatory Approval",
                "Packaging and Labeling",
                "Storage",
                "Distribution",
                "Complete",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Where a product currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePosition {
    /// No stage recorded yet.
    Created,
    /// Index into the catalog of the last recorded stage.
    At(usize),
}

/// Command: RecordStage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStage {
    pub product_id: ProductId,
    pub stage_name: String,
    pub authenticator: Identity,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleCommand {
    RecordStage(RecordStage),
}

/// Event: StageRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecorded {
    pub product_id: ProductId,
    pub stage_name: String,
    pub stage_index: usize,
    pub authenticator: Identity,
    pub recorded_at: DateTime<Utc>,
    /// True when this stage is the catalog's terminal stage.
    pub completes_lifecycle: bool,
}

impl StageRecorded {
    pub fn to_record(&self) -> StageRecord {
        StageRecord {
            product_id: self.product_id.clone(),
            stage_name: self.stage_name.clone(),
            authenticator: self.authenticator.clone(),
            timestamp: self.recorded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    StageRecorded(StageRecorded),
}

/// Aggregate root: the stage lifecycle of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLifecycle {
    product_id: ProductId,
    catalog: Arc<StageCatalog>,
    position: StagePosition,
    last_recorded_at: Option<DateTime<Utc>>,
    version: u64,
}

impl ProductLifecycle {
    /// A lifecycle with no stages recorded.
    pub fn new(product_id: ProductId, catalog: Arc<StageCatalog>) -> Self {
        Self {
            product_id,
            catalog,
            position: StagePosition::Created,
            last_recorded_at: None,
            version: 0,
        }
    }

    /// Rehydrate from a product's stored stage log (insertion order).
    ///
    /// Fails if the log names a stage the catalog does not know, which means
    /// the store and the configured catalog disagree.
    pub fn from_history(
        product_id: ProductId,
        catalog: Arc<StageCatalog>,
        history: &[StageRecord],
    ) -> DomainResult<Self> {
        let mut lifecycle = Self::new(product_id, catalog);
        for record in history {
            let stage_index = lifecycle.catalog.index_of(&record.stage_name).ok_or_else(|| {
                DomainError::invalid_input(format!(
                    "stored stage \"{}\" is not in the configured catalog",
                    record.stage_name
                ))
            })?;

            lifecycle.apply(&LifecycleEvent::StageRecorded(StageRecorded {
                product_id: record.product_id.clone(),
                stage_name: record.stage_name.clone(),
                stage_index,
                authenticator: record.authenticator.clone(),
                recorded_at: record.timestamp,
                completes_lifecycle: stage_index + 1 == lifecycle.catalog.len(),
            }));
        }
        Ok(lifecycle)
    }

    pub fn position(&self) -> StagePosition {
        self.position
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    /// Name of the latest stage, or the `Created` sentinel.
    pub fn current_stage(&self) -> &str {
        match self.position {
            StagePosition::Created => INITIAL_STAGE,
            StagePosition::At(i) => self.catalog.name_at(i).unwrap_or(INITIAL_STAGE),
        }
    }

    /// The only stage that may be recorded next, if any.
    pub fn next_stage(&self) -> Option<&str> {
        self.catalog.name_at(self.next_index())
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.position, StagePosition::At(i) if i + 1 == self.catalog.len())
    }

    /// Fail unless the terminal stage has been reached.
    pub fn ensure_complete(&self) -> DomainResult<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(TransitionRejection::NotTerminal {
                current: self.current_stage().to_string(),
                terminal: self.catalog.terminal().to_string(),
            }
            .into())
        }
    }

    fn next_index(&self) -> usize {
        match self.position {
            StagePosition::Created => 0,
            StagePosition::At(i) => i + 1,
        }
    }

    /// Stage timestamps are strictly increasing per product, even if the
    /// wall clock steps backwards between two requests.
    fn monotonic_timestamp(&self, occurred_at: DateTime<Utc>) -> DateTime<Utc> {
        let candidate = truncate_to_micros(occurred_at);
        match self.last_recorded_at {
            Some(last) if candidate <= last => last + Duration::microseconds(1),
            _ => candidate,
        }
    }

    fn handle_record_stage(&self, cmd: &RecordStage) -> DomainResult<Vec<LifecycleEvent>> {
        if cmd.product_id != self.product_id {
            return Err(DomainError::invalid_input("product_id mismatch"));
        }

        if self.is_complete() {
            return Err(TransitionRejection::AlreadyTerminal {
                terminal: self.catalog.terminal().to_string(),
            }
            .into());
        }

        let requested = cmd.stage_name.trim();
        let Some(stage_index) = self.catalog.index_of(requested) else {
            return Err(TransitionRejection::UnknownStage {
                requested: requested.to_string(),
            }
            .into());
        };

        let expected = self.next_index();
        if stage_index != expected {
            return Err(TransitionRejection::NonAdjacent {
                current: self.current_stage().to_string(),
                requested: requested.to_string(),
                expected: self.catalog.name_at(expected).unwrap_or_default().to_string(),
            }
            .into());
        }

        Ok(vec![LifecycleEvent::StageRecorded(StageRecorded {
            product_id: self.product_id.clone(),
            stage_name: requested.to_string(),
            stage_index,
            authenticator: cmd.authenticator.clone(),
            recorded_at: self.monotonic_timestamp(cmd.occurred_at),
            completes_lifecycle: stage_index + 1 == self.catalog.len(),
        })])
    }
}

impl AggregateRoot for ProductLifecycle {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for ProductLifecycle {
    type Command = LifecycleCommand;
    type Event = LifecycleEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LifecycleEvent::StageRecorded(e) => {
                self.position = StagePosition::At(e.stage_index);
                self.last_recorded_at = Some(e.recorded_at);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LifecycleCommand::RecordStage(cmd) => self.handle_record_stage(cmd),
        }
    }
}

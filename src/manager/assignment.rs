//! Agent assignment: which entries an agent may search.
//!
//! Toggles never send a diff. Each one computes the complete next set and
//! PUTs it; local state follows only after the server accepted it.

use std::collections::BTreeSet;

use super::{Capability, KnowledgeBaseManager};
use crate::error::{ErrorContext, KbResult, ValidationError};
use crate::state::AssignmentState;

impl KnowledgeBaseManager {
    fn agent_id(&self) -> KbResult<String> {
        self.config
            .agent_id
            .clone()
            .ok_or_else(|| ValidationError::NoAgent.into())
    }

    /// Load the configured agent's current selection.
    pub async fn load_assignment(&self) -> KbResult<()> {
        self.require(Capability::Assignment)?;
        let agent_id = self.agent_id()?;
        let ctx = ErrorContext::new("load_assignment");

        match self.api.get_assignment(&agent_id).await {
            Ok(ids) => {
                tracing::debug!("Agent {} has {} assigned entries", agent_id, ids.len());
                self.update(|s| s.assignment = Some(AssignmentState::new(agent_id, ids)));
                Ok(())
            }
            Err(e) => Err(self.report("load agent files", e, ctx)),
        }
    }

    /// Flip one entry in the selection.
    pub async fn toggle_entry_assignment(&self, entry_id: &str) -> KbResult<()> {
        self.require(Capability::Assignment)?;
        self.require_entry(entry_id)?;
        let current = self.current_assignment().await?;

        let next = current.toggled_entry(entry_id);
        self.save_assignment(current.agent_id, next, ErrorContext::new("toggle_entry").with_entry(entry_id))
            .await
    }

    /// Select or deselect all of a folder's entries at once.
    ///
    /// A folder whose entries were never loaded is loaded first.
    pub async fn toggle_folder_assignment(&self, folder_id: &str) -> KbResult<()> {
        self.require(Capability::Assignment)?;
        self.require_folder(folder_id)?;
        if !self.read(|s| s.is_cached(folder_id)) {
            self.load_folder_entries(folder_id).await?;
        }
        let current = self.current_assignment().await?;

        let children = self.read(|s| s.child_ids(folder_id));
        let next = current.toggled_folder(children.iter().map(String::as_str));
        self.save_assignment(
            current.agent_id,
            next,
            ErrorContext::new("toggle_folder").with_folder(folder_id),
        )
        .await
    }

    async fn current_assignment(&self) -> KbResult<AssignmentState> {
        if let Some(current) = self.read(|s| s.assignment.clone()) {
            return Ok(current);
        }
        self.load_assignment().await?;
        self.read(|s| s.assignment.clone())
            .ok_or_else(|| ValidationError::NoAgent.into())
    }

    async fn save_assignment(
        &self,
        agent_id: String,
        next: BTreeSet<String>,
        ctx: ErrorContext,
    ) -> KbResult<()> {
        self.update(|s| s.transient.saving_assignment = true);
        let result = self
            .api
            .set_assignment(&agent_id, next.iter().cloned().collect())
            .await;
        self.update(|s| s.transient.saving_assignment = false);

        match result {
            Ok(()) => {
                tracing::debug!("Agent {} now has {} assigned entries", agent_id, next.len());
                self.update(|s| {
                    s.assignment = Some(AssignmentState {
                        agent_id,
                        selected: next,
                    })
                });
                Ok(())
            }
            Err(e) => Err(self.report("update agent files", e, ctx)),
        }
    }
}

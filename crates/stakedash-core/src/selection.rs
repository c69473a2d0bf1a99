//! Pending nomination set.

use serde::{Deserialize, Serialize};

use crate::validator::Validator;

/// Maximum number of nominations per nominator (protocol constant).
pub const MAX_NOMINATIONS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Maximum {max} validators can be selected")]
    Full { max: usize },
}

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
}

/// Ordered, address-unique set of validators to nominate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSet {
    validators: Vec<Validator>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a validator by address.
    ///
    /// Adding to a full set is rejected and leaves the set unchanged.
    pub fn toggle(&mut self, validator: Validator) -> Result<SelectionChange, SelectionError> {
        if let Some(pos) = self
            .validators
            .iter()
            .position(|v| v.address == validator.address)
        {
            self.validators.remove(pos);
            return Ok(SelectionChange::Removed);
        }
        if self.validators.len() >= MAX_NOMINATIONS {
            return Err(SelectionError::Full {
                max: MAX_NOMINATIONS,
            });
        }
        self.validators.push(validator);
        Ok(SelectionChange::Added)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.validators.iter().any(|v| v.address == address)
    }

    pub fn clear(&mut self) {
        self.validators.clear();
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Addresses in selection order.
    pub fn addresses(&self) -> Vec<String> {
        self.validators.iter().map(|v| v.address.clone()).collect()
    }
}

//! Error types for herald-presenter.

use thiserror::Error;

use herald_core::{EditionId, EntityRef, Locale};

/// All errors that can arise while building a payload.
#[derive(Debug, Error)]
pub enum PresentError {
    /// Neither the requested locale nor the primary locale has a translation.
    #[error("{entity} has no translation for '{locale}' or its primary locale")]
    MissingTranslation { entity: EntityRef, locale: Locale },

    /// A coming-soon payload was requested for an edition with no
    /// scheduled publication time.
    #[error("edition {edition} has no scheduled publication time")]
    MissingPublishTime { edition: EditionId },
}

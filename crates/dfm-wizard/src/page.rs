//! Wizard pages and their routing slugs

use crate::error::WizardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A page of the wizard, identified by its slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Login,
    Home,
    Dfm,
    DfmConfig,
    ProjectDetails,
    ParticipantDetails,
    SubassemblyDetails,
    ProductImages,
    AreaSelection,
    QuestionnaireFull,
    QuestionnaireSubarea,
}

impl Page {
    /// Every page, in wizard order
    pub const ALL: [Page; 11] = [
        Page::Login,
        Page::Home,
        Page::Dfm,
        Page::DfmConfig,
        Page::ProjectDetails,
        Page::ParticipantDetails,
        Page::SubassemblyDetails,
        Page::ProductImages,
        Page::AreaSelection,
        Page::QuestionnaireFull,
        Page::QuestionnaireSubarea,
    ];

    /// Routing slug
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Home => "home",
            Self::Dfm => "dfm",
            Self::DfmConfig => "dfm-config",
            Self::ProjectDetails => "project-details",
            Self::ParticipantDetails => "participant-details",
            Self::SubassemblyDetails => "subassembly-details",
            Self::ProductImages => "product-images",
            Self::AreaSelection => "area-selection",
            Self::QuestionnaireFull => "questionnaire-full",
            Self::QuestionnaireSubarea => "questionnaire-subarea",
        }
    }

    /// Whether a form controller exists for this page
    #[inline]
    #[must_use]
    pub const fn has_form(self) -> bool {
        matches!(
            self,
            Self::DfmConfig
                | Self::ProjectDetails
                | Self::ParticipantDetails
                | Self::SubassemblyDetails
                | Self::ProductImages
                | Self::AreaSelection
                | Self::QuestionnaireFull
        )
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| WizardError::UnknownPage(s.to_string()))
    }
}

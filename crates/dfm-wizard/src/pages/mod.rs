//! Page controllers

pub mod area_selection;
pub mod configuration;
pub mod product_images;
pub mod project_details;
pub mod questionnaire;
pub mod rows;

pub use area_selection::{AreaSelection, AreaSelectionPage, QuestionnaireType};
pub use configuration::{ConfigurationPage, CONFIG_STEPS};
pub use product_images::ProductImagesPage;
pub use project_details::{ProjectDetailsPage, PROJECT_FIELDS};
pub use questionnaire::QuestionnairePage;
pub use rows::{RowPage, RowTable};

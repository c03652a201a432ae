//! Study domain
//!
//! The dataset under analysis and the research context that frames it:
//! [`DataTable`] and its [`DatasetProfile`], the [`JournalFormat`] catalogue,
//! [`StudyDesign`] with its reporting guideline, and [`AnalysisMode`].

mod context;
mod journal;
mod profile;
mod table;

pub use context::{AnalysisMode, ResearchContext, StudyDesign};
pub use journal::{
    DecimalPlaces, JOURNAL_FORMATS, JournalFormat, MlMetrics, PValueStyle, SurvivalAnalysis,
    Table1Format,
};
pub use profile::{ColumnKind, ColumnProfile, DatasetProfile, NumericSummary};
pub use table::DataTable;

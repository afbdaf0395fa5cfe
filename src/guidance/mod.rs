pub mod band;
pub mod chart;
pub mod equity;
pub mod error;
pub mod format;
pub mod synthesizer;
pub mod types;

pub use band::RiskBand;
pub use chart::{BarChart, BarEntry, ColorBand, GaugeChart};
pub use equity::compare_profiles;
pub use error::{SynthesisError, SynthesisErrorKind};
pub use synthesizer::{FeverFinding, PressureFinding, synthesize};
pub use types::{DisparityAssessment, EquityComparison};

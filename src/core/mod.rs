pub mod errors;
pub mod health;
pub mod projection;
pub mod scenario;
pub mod session;

pub use errors::{FlowError, Result};
pub use health::{
    assess, DaysUntilDanger, HealthMetrics, MonthlyRunway, ScoreBand, ScoreColor, Trend,
};
pub use projection::{project, ProjectionPoint, DEFAULT_HORIZON_DAYS};
pub use scenario::{Scenario, ScenarioEngine, ScenarioReport};
pub use session::FlowSession;

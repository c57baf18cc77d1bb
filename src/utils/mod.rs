/// Timezone conversion and display formatting helpers
pub mod datetime;
/// Consistent-prefix tracing helpers
pub mod logging;
/// Field and appointment-interval validation
pub mod validation;

// Scenarios module
// Contains load test scenario implementations

pub mod login_attempt;
pub mod verdict;

//! Phishing-detection verdicts returned on a successful login attempt

use serde::Deserialize;

/// Tally label for responses flagged as phishing.
pub const PHISHING_TALLY: &str = "is_phishing";

/// Body of a 200 response from the login-attempt endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginVerdict {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_phishing: bool,
    #[serde(default)]
    pub risk_factors: RiskFactors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RiskFactors {
    pub device_mismatch: bool,
    pub otp_replay: bool,
    pub geo_distance_high: bool,
    pub high_login_freq: bool,
    pub multiple_ips: bool,
}

impl RiskFactors {
    /// Names of the factors the service raised.
    pub fn flagged(&self) -> impl Iterator<Item = &'static str> {
        [
            ("device_mismatch", self.device_mismatch),
            ("otp_replay", self.otp_replay),
            ("geo_distance_high", self.geo_distance_high),
            ("high_login_freq", self.high_login_freq),
            ("multiple_ips", self.multiple_ips),
        ]
        .into_iter()
        .filter_map(|(name, raised)| raised.then_some(name))
    }
}

impl LoginVerdict {
    /// Parse a response body; `None` when it is not a verdict document.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Tally labels for this verdict.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.is_phishing {
            labels.push(PHISHING_TALLY);
        }
        labels.extend(self.risk_factors.flagged());
        labels
    }
}

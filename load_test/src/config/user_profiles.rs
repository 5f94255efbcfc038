/// Swarm size preset selected with `--profile`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserProfile {
    pub users: usize,
    pub spawn_rate: f64,
}

/// Get user profile by name
pub fn get_user_profile(profile: &str) -> UserProfile {
    match profile {
        "smoke" => smoke_profile(),
        "baseline" => baseline_profile(),
        "stress" => stress_profile(),
        _ => {
            tracing::warn!("Unknown profile '{}', using 'baseline' profile", profile);
            baseline_profile()
        }
    }
}

/// Smoke profile for checking the endpoint is wired up
///
/// - 1 virtual user
/// - spawned immediately
pub fn smoke_profile() -> UserProfile {
    UserProfile {
        users: 1,
        spawn_rate: 1.0,
    }
}

/// Baseline profile for everyday runs
///
/// - 10 virtual users
/// - 2 users/sec ramp (full load after 5s)
pub fn baseline_profile() -> UserProfile {
    UserProfile {
        users: 10,
        spawn_rate: 2.0,
    }
}

/// Stress profile for pushing the detection service
///
/// - 500 virtual users
/// - 25 users/sec ramp (full load after 20s)
pub fn stress_profile() -> UserProfile {
    UserProfile {
        users: 500,
        spawn_rate: 25.0,
    }
}

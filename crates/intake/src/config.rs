use crate::extract::DeadlinePolicy;

/// Runtime options of the intake pipeline
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub deadline_policy: DeadlinePolicy,
    pub listen_for_registry_changes: bool,
}

impl IntakeConfig {
    pub fn from_env() -> Self {
        let deadline_policy = match std::env::var("INTAKE_DEADLINE_POLICY") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using the default", e);
                DeadlinePolicy::default()
            }),
            Err(_) => DeadlinePolicy::default(),
        };

        let listen_for_registry_changes = std::env::var("INTAKE_LISTEN_REGISTRY")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        Self {
            deadline_policy,
            listen_for_registry_changes,
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            deadline_policy: DeadlinePolicy::default(),
            listen_for_registry_changes: true,
        }
    }
}

use std::env;

/// Who the CLI acts as. The actor is resolved against the backend user list
/// by email at startup; there is no local credential handling.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub actor_email: Option<String>,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let actor_email = env::var("TASKDECK_ACTOR_EMAIL")
            .ok()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Self { actor_email }
    }
}

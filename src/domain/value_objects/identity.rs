use serde::{Deserialize, Serialize};

/// How the chat platform presents the acting player. Only used to fill in
/// bribe templates; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub discriminator: String,
}

impl PlayerIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            discriminator: String::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = discriminator.into();
        self
    }
}

use serde::{Deserialize, Serialize};

/// The structured profile forwarded to the generation service with every
/// artifact request. Collected by the profile form upstream; the core only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub target_role: String,
    pub target_region: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
}

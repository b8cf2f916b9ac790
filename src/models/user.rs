use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public account metadata from `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_ignores_unknown_fields() {
        let json = r#"{
            "login": "octocat",
            "id": 583231,
            "public_repos": 8,
            "followers": 4000,
            "following": 9,
            "created_at": "2011-01-25T18:44:36Z"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.public_repos, 8);
        assert_eq!(profile.followers, 4000);
        assert_eq!(profile.created_at.to_rfc3339(), "2011-01-25T18:44:36+00:00");
    }
}

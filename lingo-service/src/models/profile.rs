use serde::Deserialize;

/// Row from the `profiles` table.
///
/// Every field may be null or missing; an empty string is treated the same
/// as an absent value by the context-resolution policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub native_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

impl UserProfile {
    pub fn context(&self) -> Option<&str> {
        non_empty(self.context.as_deref())
    }

    pub fn native_language(&self) -> Option<&str> {
        non_empty(self.native_language.as_deref())
    }

    pub fn target_language(&self) -> Option<&str> {
        non_empty(self.target_language.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

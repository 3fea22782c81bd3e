use serde::{Deserialize, Serialize};

/// Who is making a request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// WebID of the authenticated agent, `None` for anonymous callers.
    pub web_id: Option<String>,
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn agent(web_id: impl Into<String>) -> Self {
        Self {
            web_id: Some(web_id.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.web_id.is_some()
    }
}

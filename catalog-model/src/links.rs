use serde::{Deserialize, Serialize};

/// Hypermedia links attached to read representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_href: String,
}

impl ResourceLinks {
    pub fn new(self_href: impl Into<String>) -> Self {
        Self {
            self_href: self_href.into(),
        }
    }
}

//! Built-in resource catalog.

use std::collections::BTreeMap;

use crate::types::ResourceDefinition;

pub fn builtin() -> BTreeMap<&'static str, ResourceDefinition> {
    BTreeMap::from([(
        "user_data",
        ResourceDefinition {
            uri: "file:///etc/passwd".to_string(),
            description: "A sample file resource URI.".to_string(),
            mime_type: "text/plain".to_string(),
        },
    )])
}

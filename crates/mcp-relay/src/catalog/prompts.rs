//! Built-in prompt catalog.

use std::collections::BTreeMap;

use crate::types::PromptDefinition;

pub fn builtin() -> BTreeMap<&'static str, PromptDefinition> {
    BTreeMap::from([(
        "summarize_text",
        PromptDefinition {
            description: "Summarize the provided text.".to_string(),
            template: "Please summarize the following text: {text}".to_string(),
        },
    )])
}

use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "target": {
                "type": "object",
                "properties": {
                    "url": { "type": "string", "format": "uri" },
                    "client_id": { "type": "string" },
                    "client_secret": { "type": "string" }
                }
            },
            "scan": {
                "type": "object",
                "properties": {
                    "parallel": { "type": "boolean" },
                    "request_timeout_secs": { "type": "integer", "minimum": 1, "maximum": 300 },
                    "rate_limit_attempts": { "type": "integer", "minimum": 1, "maximum": 1000 }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "report_path": { "type": "string" }
                }
            }
        }
    })
});

use serde_json::json;

use contracts::Platform;

pub mod contracts;
pub mod errors;

pub fn tool_definitions(platforms: &[Platform]) -> Vec<serde_json::Value> {
    contracts::CONTRACTS
        .iter()
        .filter(|contract| platforms.contains(&contract.platform))
        .map(|contract| {
            json!({
                "name": contract.name,
                "description": contract.description,
                "inputSchema": contract.input_schema()
            })
        })
        .collect()
}

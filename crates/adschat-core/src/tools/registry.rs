//! Tool catalogue offered to the model

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

use crate::types::Tool;

const CUSTOMER_ID_DESCRIPTION: &str =
    "Google Ads customer ID (10 digits, no dashes). Example: '9873186703'";
/// `run_gaql` describes its customer id without the example
const GAQL_CUSTOMER_ID_DESCRIPTION: &str = "Google Ads customer ID (10 digits, no dashes)";

static GOOGLE_ADS_TOOLS: Lazy<Vec<Tool>> = Lazy::new(|| {
    vec![
        Tool::new("list_accounts", "List all accessible Google Ads accounts"),
        Tool::new(
            "get_account_currency",
            "Get the default currency code for a Google Ads account",
        )
        .with_schema(schema(vec![customer_id()], &["customer_id"])),
        Tool::new(
            "get_campaign_performance",
            "Get campaign performance metrics for specified time period",
        )
        .with_schema(schema(vec![customer_id(), days()], &["customer_id"])),
        Tool::new(
            "get_ad_performance",
            "Get ad performance metrics for specified time period",
        )
        .with_schema(schema(vec![customer_id(), days()], &["customer_id"])),
        Tool::new(
            "run_gaql",
            "Execute any arbitrary GAQL query with custom formatting",
        )
        .with_schema(schema(
            vec![
                (
                    "customer_id",
                    json!({"type": "string", "description": GAQL_CUSTOMER_ID_DESCRIPTION}),
                ),
                ("query", json!({"type": "string", "description": "Valid GAQL query string"})),
                (
                    "format",
                    json!({
                        "type": "string",
                        "description": "Output format: 'table', 'json', or 'csv'",
                        "default": "table",
                    }),
                ),
            ],
            &["customer_id", "query"],
        )),
        Tool::new(
            "get_ad_creatives",
            "Get ad creative details including headlines, descriptions, and URLs",
        )
        .with_schema(schema(vec![customer_id()], &["customer_id"])),
        Tool::new(
            "get_image_assets",
            "Retrieve all image assets in account including their full-size URLs",
        )
        .with_schema(schema(
            vec![
                customer_id(),
                (
                    "limit",
                    json!({
                        "type": "integer",
                        "description": "Maximum number of image assets to return (default: 50)",
                        "default": 50,
                    }),
                ),
            ],
            &["customer_id"],
        )),
        Tool::new(
            "analyze_image_assets",
            "Analyze image assets with their performance metrics across campaigns",
        )
        .with_schema(schema(vec![customer_id(), days()], &["customer_id"])),
    ]
});

fn customer_id() -> (&'static str, Value) {
    (
        "customer_id",
        json!({"type": "string", "description": CUSTOMER_ID_DESCRIPTION}),
    )
}

fn days() -> (&'static str, Value) {
    (
        "days",
        json!({"type": "integer", "description": "Number of days to look back (default: 30)", "default": 30}),
    )
}

fn schema(properties: Vec<(&str, Value)>, required: &[&str]) -> Value {
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, prop)| (name.to_string(), prop))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// The Google Ads reporting tools, in the order they are offered
pub fn definitions() -> &'static [Tool] {
    &GOOGLE_ADS_TOOLS
}

/// Immutable set of tools the model may call
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Registry holding the Google Ads catalogue
    pub fn google_ads() -> Self {
        Self {
            tools: definitions().to_vec(),
        }
    }

    /// Registry over an arbitrary tool list
    pub fn from_tools(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    /// Tools to send to the model
    pub fn definitions(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::google_ads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_order() {
        let registry = ToolRegistry::google_ads();
        assert_eq!(
            registry.names(),
            vec![
                "list_accounts",
                "get_account_currency",
                "get_campaign_performance",
                "get_ad_performance",
                "run_gaql",
                "get_ad_creatives",
                "get_image_assets",
                "analyze_image_assets",
            ]
        );
    }

    #[test]
    fn test_definitions_are_deterministic() {
        assert_eq!(definitions(), ToolRegistry::google_ads().definitions());
        assert_eq!(definitions(), definitions());
    }

    #[test]
    fn test_required_parameters() {
        let registry = ToolRegistry::google_ads();
        assert!(registry.get("list_accounts").unwrap().required_parameters().is_empty());
        assert_eq!(
            registry.get("run_gaql").unwrap().required_parameters(),
            vec!["customer_id", "query"]
        );
        for name in ["get_account_currency", "get_ad_creatives", "analyze_image_assets"] {
            assert_eq!(registry.get(name).unwrap().required_parameters(), vec!["customer_id"]);
        }
    }

    #[test]
    fn test_defaults_in_schema() {
        let registry = ToolRegistry::google_ads();
        let perf = &registry.get("get_campaign_performance").unwrap().parameters;
        assert_eq!(perf["properties"]["days"]["default"], 30);
        assert_eq!(perf["properties"]["customer_id"]["type"], "string");

        let gaql = &registry.get("run_gaql").unwrap().parameters;
        assert_eq!(gaql["properties"]["format"]["default"], "table");

        let images = &registry.get("get_image_assets").unwrap().parameters;
        assert_eq!(images["properties"]["limit"]["default"], 50);
    }

    #[test]
    fn test_parameter_descriptions() {
        let registry = ToolRegistry::google_ads();
        let perf = &registry.get("get_campaign_performance").unwrap().parameters;
        assert_eq!(
            perf["properties"]["customer_id"]["description"],
            "Google Ads customer ID (10 digits, no dashes). Example: '9873186703'"
        );
        assert_eq!(
            perf["properties"]["days"]["description"],
            "Number of days to look back (default: 30)"
        );

        let gaql = &registry.get("run_gaql").unwrap().parameters;
        assert_eq!(
            gaql["properties"]["customer_id"]["description"],
            "Google Ads customer ID (10 digits, no dashes)"
        );

        let images = &registry.get("get_image_assets").unwrap().parameters;
        assert_eq!(
            images["properties"]["limit"]["description"],
            "Maximum number of image assets to return (default: 50)"
        );
    }

    #[test]
    fn test_lookup() {
        let registry = ToolRegistry::google_ads();
        assert_eq!(registry.len(), 8);
        assert!(registry.contains("run_gaql"));
        assert!(!registry.contains("delete_campaign"));
        assert!(registry.get("delete_campaign").is_none());
    }
}

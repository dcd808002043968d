use serde::{Deserialize, Serialize};

use crate::errors::{UiTreeError, UiTreeResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub names: UiNames,
}

/// Type names and `_name` markers the feature extractors look for.
///
/// Exact-match names (`ship_ui`, `route_panel`, `route_marker`) are compared
/// verbatim. The others are matched against lower-cased type names or `_name`
/// values, so they must be lower case themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiNames {
    pub ship_ui: String,
    /// Substring of the `_name` attribute of the ship's indication container.
    pub indication_container: String,
    pub menu_layer: String,
    pub menu: String,
    pub menu_entry: String,
    pub route_panel: String,
    pub route_marker: String,
}

impl Default for UiNames {
    fn default() -> Self {
        Self {
            ship_ui: "ShipUI".to_string(),
            indication_container: "indicationcontainer".to_string(),
            menu_layer: "l_menu".to_string(),
            menu: "menu".to_string(),
            menu_entry: "menuentry".to_string(),
            route_panel: "InfoPanelRoute".to_string(),
            route_marker: "AutopilotDestinationIcon".to_string(),
        }
    }
}

impl ParserConfig {
    /// Parse a config from TOML text. Reading the file is the caller's job.
    pub fn from_toml_str(content: &str) -> UiTreeResult<Self> {
        let config: ParserConfig = toml::from_str(content)?;
        config.validate()?;
        tracing::debug!(ship_ui = %config.names.ship_ui, route_panel = %config.names.route_panel, "parser config loaded");
        Ok(config)
    }

    fn validate(&self) -> UiTreeResult<()> {
        let n = &self.names;
        let exact = [
            ("ship_ui", &n.ship_ui),
            ("route_panel", &n.route_panel),
            ("route_marker", &n.route_marker),
        ];
        let lowered = [
            ("indication_container", &n.indication_container),
            ("menu_layer", &n.menu_layer),
            ("menu", &n.menu),
            ("menu_entry", &n.menu_entry),
        ];

        for (key, value) in exact.iter().chain(lowered.iter()) {
            if value.is_empty() {
                return Err(UiTreeError::Config(format!("names.{key} must not be empty")));
            }
        }
        for (key, value) in lowered {
            if value.to_lowercase() != *value {
                return Err(UiTreeError::Config(format!(
                    "names.{key} is matched case-insensitively and must be lower case, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}

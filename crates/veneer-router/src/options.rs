//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Router settings.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
///
/// ```
/// use veneer_router::RouterOptions;
///
/// let options = RouterOptions::from_json(r#"{ "expectedParams": ["id"] }"#).unwrap();
/// assert_eq!(options.expected_params, vec!["id"]);
/// assert_eq!(options.outlet_id, "child");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterOptions {
    /// Param and query names that may reach render callbacks.
    pub expected_params: Vec<String>,
    /// `id` of the element that receives nested route output.
    pub outlet_id: String,
    /// Tag of the scratch container created for each rendered route.
    pub container_tag: String,
    /// Consecutive redirects allowed before giving up.
    pub max_redirects: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            expected_params: Vec::new(),
            outlet_id: "child".to_string(),
            container_tag: "div".to_string(),
            max_redirects: 16,
        }
    }
}

impl RouterOptions {
    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let options = RouterOptions::from_json("{}").unwrap();
        assert_eq!(options, RouterOptions::default());
        assert_eq!(options.max_redirects, 16);
        assert_eq!(options.container_tag, "div");
    }

    #[test]
    fn test_full_options() {
        let options = RouterOptions::from_json(
            r#"{"expectedParams":["id","tab"],"outletId":"outlet","containerTag":"section","maxRedirects":2}"#,
        )
        .unwrap();
        assert_eq!(options.expected_params, vec!["id", "tab"]);
        assert_eq!(options.outlet_id, "outlet");
        assert_eq!(options.container_tag, "section");
        assert_eq!(options.max_redirects, 2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(RouterOptions::from_json("[").is_err());
    }
}

//! `[publish]` section configuration.

use super::defaults;
use educe::Educe;
use serde::Deserialize;

/// `[publish]` section in postkit.toml.
///
/// # Example
/// ```toml
/// [publish]
/// date_format = "%Y-%m-%d %H:%M:%S"
/// ```
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// strftime format of the `date:` front matter field.
    #[serde(default = "defaults::publish::date_format")]
    #[educe(Default = defaults::publish::date_format())]
    pub date_format: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_publish_config_default_format() {
        let config: SiteConfig = toml::from_str("[publish]").unwrap();
        assert_eq!(config.publish.date_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_publish_config_custom_format() {
        let config = r#"
            [publish]
            date_format = "%Y-%m-%d"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.publish.date_format, "%Y-%m-%d");
    }
}

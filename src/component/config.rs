//! Configuration for the component framework

/// Configuration options for instance elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkConfig {
    /// Attribute holding the global component id
    pub component_id_attribute: String,

    /// Attribute holding the per-name instance id
    pub instance_id_attribute: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            component_id_attribute: "data-component-id".to_string(),
            instance_id_attribute: "data-instance-id".to_string(),
        }
    }
}

impl FrameworkConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component id attribute name
    pub fn with_component_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.component_id_attribute = name.into();
        self
    }

    /// Set the instance id attribute name
    pub fn with_instance_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.instance_id_attribute = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FrameworkConfig::default();
        assert_eq!(config.component_id_attribute, "data-component-id");
        assert_eq!(config.instance_id_attribute, "data-instance-id");
    }

    #[test]
    fn test_builder_pattern() {
        let config = FrameworkConfig::new()
            .with_component_id_attribute("data-cid")
            .with_instance_id_attribute("data-iid");
        assert_eq!(config.component_id_attribute, "data-cid");
        assert_eq!(config.instance_id_attribute, "data-iid");
    }
}

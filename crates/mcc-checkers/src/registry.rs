//! Name to validator mapping for catalogs.

use std::sync::Arc;

use mcc_engine::ValidatorRegistry;

use crate::{
    CheckCommaSeparated, CheckDeprecated, CheckExistence, CheckIsoDateTime, CheckIsoDuration,
    CheckPossibleValues, CheckTypes,
};

/// Registry of every built-in validator under its catalog name.
pub fn builtin_registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry.register("existence", Arc::new(CheckExistence));
    registry.register("comma_separated", Arc::new(CheckCommaSeparated));
    registry.register("possible_values", Arc::new(CheckPossibleValues));
    registry.register("iso_datetime", Arc::new(CheckIsoDateTime));
    registry.register("iso_duration", Arc::new(CheckIsoDuration));
    registry.register("deprecated", Arc::new(CheckDeprecated));
    registry.register("types", Arc::new(CheckTypes));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_builtin() {
        let registry = builtin_registry();
        assert_eq!(
            registry.names(),
            vec![
                "comma_separated",
                "deprecated",
                "existence",
                "iso_datetime",
                "iso_duration",
                "possible_values",
                "types",
            ]
        );
        assert_eq!(
            registry.resolve("existence").unwrap().name(),
            "check for existence"
        );
        assert!(registry.resolve("udunits").is_err());
    }
}

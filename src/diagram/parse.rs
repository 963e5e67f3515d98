use std::fs;
use std::path::Path;

use tracing::debug;

use super::model::DiagramData;
use crate::error::LoadError;

/// Parses `{ "entities": [...], "relations": [...] }` and validates it.
pub fn parse_diagram(raw: &str, origin: &str) -> Result<DiagramData, LoadError> {
    let data: DiagramData = serde_json::from_str(raw).map_err(|source| LoadError::Json {
        origin: origin.to_owned(),
        source,
    })?;
    data.validate()?;

    debug!(
        origin,
        entities = data.entities.len(),
        relations = data.relations.len(),
        "parsed diagram"
    );
    Ok(data)
}

pub fn load_diagram(path: &Path) -> Result<DiagramData, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_diagram(&raw, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn missing_label_lists_default_to_empty() {
        let data = parse_diagram(
            r#"{
                "entities": [
                    { "name": "Order", "attributes": ["id"] },
                    { "name": "Customer", "methods": ["pay()"], "group": 1 }
                ],
                "relations": [{ "source": 1, "target": 0 }]
            }"#,
            "inline",
        )
        .expect("valid diagram");

        assert!(data.entities[0].methods.is_empty());
        assert!(data.entities[1].attributes.is_empty());
        assert_eq!(data.entities[1].group, Some(1));
        assert_eq!(data.relations.len(), 1);
    }

    #[test]
    fn entity_without_name_is_a_json_error() {
        let error = parse_diagram(r#"{ "entities": [{ "attributes": [] }] }"#, "inline")
            .expect_err("name is required");
        assert!(matches!(error, LoadError::Json { .. }));
    }

    #[test]
    fn out_of_range_relation_is_a_config_error() {
        let error = parse_diagram(
            r#"{ "entities": [{ "name": "A" }], "relations": [{ "source": 0, "target": 5 }] }"#,
            "inline",
        )
        .expect_err("dangling relation");
        assert!(matches!(
            error,
            LoadError::Config(ConfigError::DanglingRelation { index: 5, .. })
        ));
    }

    #[test]
    fn unreadable_file_keeps_the_path() {
        let error = load_diagram(Path::new("/nonexistent/diagram.json")).expect_err("no file");
        assert!(error.to_string().contains("/nonexistent/diagram.json"));
    }
}

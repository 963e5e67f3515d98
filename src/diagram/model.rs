use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// One class box. Shape is fixed once constructed; positions live in the
/// simulation, keyed by the entity's index.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub group: Option<i64>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group(mut self, group: i64) -> Self {
        self.group = Some(group);
        self
    }

    pub fn label_count(&self) -> usize {
        self.attributes.len() + self.methods.len()
    }
}

/// A directed association between two entities, by index.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Relation {
    pub source: usize,
    pub target: usize,
}

impl Relation {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl Endpoint {
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DiagramData {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl DiagramData {
    pub fn new(entities: Vec<Entity>, relations: Vec<Relation>) -> Self {
        Self {
            entities,
            relations,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_entities(&self.entities)?;
        check_relations(self.entities.len(), &self.relations)
    }
}

pub fn check_entities(entities: &[Entity]) -> Result<(), ConfigError> {
    match entities
        .iter()
        .position(|entity| entity.name.trim().is_empty())
    {
        Some(index) => Err(ConfigError::MissingName { index }),
        None => Ok(()),
    }
}

/// Rejects the first relation whose source or target falls outside
/// `0..entity_count`.
pub fn check_relations(entity_count: usize, relations: &[Relation]) -> Result<(), ConfigError> {
    for (relation, edge) in relations.iter().enumerate() {
        for (endpoint, index) in [
            (Endpoint::Source, edge.source),
            (Endpoint::Target, edge.target),
        ] {
            if index >= entity_count {
                return Err(ConfigError::DanglingRelation {
                    relation,
                    endpoint,
                    index,
                    count: entity_count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected_with_their_index() {
        let entities = vec![Entity::new("A"), Entity::new("  ")];
        assert_eq!(
            check_entities(&entities),
            Err(ConfigError::MissingName { index: 1 })
        );
    }

    #[test]
    fn dangling_target_reports_the_offending_endpoint() {
        let relations = [Relation::new(0, 1), Relation::new(1, 3)];
        assert_eq!(
            check_relations(3, &relations),
            Err(ConfigError::DanglingRelation {
                relation: 1,
                endpoint: Endpoint::Target,
                index: 3,
                count: 3,
            })
        );
        assert!(check_relations(4, &relations).is_ok());
    }

    #[test]
    fn label_count_sums_both_stacks() {
        let entity = Entity::new("X")
            .with_attributes(["a", "b"])
            .with_methods(["m"])
            .with_group(2);
        assert_eq!(entity.label_count(), 3);
        assert_eq!(entity.group, Some(2));
    }
}

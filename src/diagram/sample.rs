use super::model::{DiagramData, Entity, Relation};

/// Placeholder dataset used when no diagram file is supplied.
pub fn sample_diagram() -> DiagramData {
    let entities = vec![
        Entity::new("Company").with_attributes(["name", "address"]),
        Entity::new("Department").with_attributes(["department name"]),
        Entity::new("Employee").with_attributes(["employee name", "hire date"]),
        Entity::new("Account")
            .with_attributes(["user id", "password"])
            .with_methods(["login()"]),
        Entity::new("Project")
            .with_attributes(["project name", "scale"])
            .with_methods(Vec::<String>::new()),
    ];

    let relations = vec![
        Relation::new(0, 1),
        Relation::new(1, 2),
        Relation::new(2, 3),
        Relation::new(2, 4),
    ];

    DiagramData::new(entities, relations)
}

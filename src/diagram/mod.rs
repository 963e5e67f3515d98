mod model;
mod parse;
mod sample;

pub use model::{DiagramData, Endpoint, Entity, Relation, check_entities, check_relations};
pub use parse::{load_diagram, parse_diagram};
pub use sample::sample_diagram;

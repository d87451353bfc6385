//! Stateless analyses over networks and nodesets.
//!
//! - shortest path lengths by breadth-first search
//! - connected components with descending component sizes
//! - degree centrality and layer density
//! - derived layers: dichotomization, symmetrization, two-mode projection
//! - uniform random node and random alter selection

pub mod components;
pub mod degree;
pub mod derive;
pub mod paths;
pub mod sampling;

pub use components::{connected_components, ComponentSummary};
pub use degree::{degree_attribute_name, degree_centrality, density, DegreeReport};
pub use derive::{dichotomize, project_two_mode, symmetrize, DichotomizeOptions, SymmetrizeMethod};
pub use paths::{shortest_path, UNREACHABLE};
pub use sampling::{random_alter, random_node, AlterSampling};

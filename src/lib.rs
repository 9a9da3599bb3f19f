/// Auxiliary registry of prefix/suffix modifier groups
pub mod affix;
/// Server configuration file
pub mod config;
/// Error definitions
pub mod error;
/// Vectors, quaternions and collision geometry descriptors
pub mod geometry;
/// The prototype registry: two-phase loading, ids and saving
pub mod manager;
/// Collaborator seam for reading data out of model assets
pub mod models;
/// Every prototype class and its XML rules
pub mod prototypes;
/// By-name links between prototypes
pub mod reference;
/// Belong ids and the tolerance between them
pub mod relationship;
/// Hierarchical resource type categories
pub mod resource_type;
/// Composition root wiring the registries together
pub mod server;
/// Unit-converting attribute types (degrees, km/h)
pub mod units;
/// Field wrapper that knows its attribute name and default
pub mod value;
/// Reading and writing the game's XML dialect
pub mod xml;

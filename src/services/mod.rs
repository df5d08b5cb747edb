pub mod host;
pub mod per_vertex;
pub mod resolver;

pub use host::{PerVertexHost, PerVertexState};
pub use per_vertex::{
    get_per_vertex, GetPerVertexCommand, PreviousWeights, SetCommandPhase, SetPerVertexCommand,
};
pub use resolver::NodeResolver;

#[cfg(test)]
mod tests;

pub mod per_vertex;
pub mod scene;

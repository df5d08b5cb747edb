pub mod per_vertex;

pub mod body;
pub mod config;
pub mod context;
pub mod demographics;
pub mod mood_graph;
pub mod orchestrator;
pub mod romance;
pub mod selection;
pub mod social_graph;

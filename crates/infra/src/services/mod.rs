mod push_gateway;

pub use push_gateway::*;

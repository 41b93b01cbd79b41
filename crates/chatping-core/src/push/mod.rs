pub mod gateway;

pub use gateway::PushGateway;

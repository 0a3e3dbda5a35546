pub mod dto;
pub mod handlers;
pub mod problem;
pub mod routes;

pub mod id_generator;
pub mod middleware_auth;

pub mod actuator;
pub mod webhook;

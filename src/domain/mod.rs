pub mod action;
pub mod branch;
pub mod event;
pub mod outcome;
pub mod protection;

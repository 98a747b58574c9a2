pub mod booking;
pub mod building;
pub mod floor_plan;
pub mod room;
pub mod seat;
pub mod user;

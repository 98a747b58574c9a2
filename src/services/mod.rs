pub mod bookings;
pub mod users;
pub mod workspaces;

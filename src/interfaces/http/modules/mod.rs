pub mod health;
pub mod reservations;
pub mod reviews;
pub mod venue;

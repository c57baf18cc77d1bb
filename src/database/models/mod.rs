pub mod appointment;
pub mod contact;
pub mod country;
pub mod customer;
pub mod division;
pub mod user;

pub use appointment::*;
pub use contact::*;
pub use country::*;
pub use customer::*;
pub use division::*;
pub use user::*;

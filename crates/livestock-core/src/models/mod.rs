//! Domain models for livestock records.

mod animal;
mod drug;
mod report;
mod treatment;
mod user;

pub use animal::*;
pub use drug::*;
pub use report::*;
pub use treatment::*;
pub use user::*;

pub mod company;
pub mod user;

pub use company::{Company, CompanyFilter, CompanyUpdate, NewCompany};
pub use user::{Credentials, NewUser, User, UserRecord, UserUpdate};

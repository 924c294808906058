pub mod inspect;
pub mod layout;

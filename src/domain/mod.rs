mod phone_number;
mod recipient;

pub use phone_number::PhoneNumber;
pub use recipient::Recipient;

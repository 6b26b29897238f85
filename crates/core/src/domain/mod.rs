pub mod field;
pub mod kyc;
pub mod registrant;

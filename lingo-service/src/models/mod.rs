pub mod identity;
pub mod profile;

pub use identity::{Credential, UserIdentity};
pub use profile::UserProfile;

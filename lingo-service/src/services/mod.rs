pub mod context;
pub mod crew;
pub mod generation;
pub mod identity;
pub mod metrics;
pub mod profile_store;
pub mod providers;

pub use context::{PhraseParams, TranslationParams};
pub use generation::{CrewGateway, GenerationError, GenerationGateway, GenerationOutcome};
pub use identity::{AuthError, AuthResolver, IdentityVerifier, SupabaseIdentityClient};
pub use profile_store::{ProfileError, ProfileStore, SupabaseProfileStore};

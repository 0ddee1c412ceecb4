mod jwt;
pub use jwt::{JwtConfig, JwtCredentialProvider};

mod authorized_user;
pub use authorized_user::AuthorizedUserCredentialProvider;

mod vm_metadata;
pub use vm_metadata::VmMetadataCredentialProvider;

mod impersonated;
pub use impersonated::ImpersonatedCredentialProvider;

mod default;
pub use default::{CredentialSource, DefaultCredentialProvider};

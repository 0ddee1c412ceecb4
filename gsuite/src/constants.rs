/// Env value holding the credentials path or content.
pub const GOOGLE_CREDENTIALS: &str = "GOOGLE_CREDENTIALS";
/// Fallback env value for the credentials.
pub const GOOGLE_CLOUD_KEYFILE_JSON: &str = "GOOGLE_CLOUD_KEYFILE_JSON";
/// Second fallback env value for the credentials.
pub const GCLOUD_KEYFILE_JSON: &str = "GCLOUD_KEYFILE_JSON";
/// Env value holding the user to impersonate.
pub const IMPERSONATED_USER_EMAIL: &str = "IMPERSONATED_USER_EMAIL";
/// Env value holding the customer id.
pub const CUSTOMER_ID: &str = "CUSTOMER_ID";

pub(crate) const CREDENTIALS_ENV_VARS: [&str; 3] =
    [GOOGLE_CREDENTIALS, GOOGLE_CLOUD_KEYFILE_JSON, GCLOUD_KEYFILE_JSON];

/// Alias Google resolves to the customer of the authenticated admin.
pub const DEFAULT_CUSTOMER_ID: &str = "my_customer";
/// Default operation timeout in minutes.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 1;

/// Default base path of the Directory API.
pub const DIRECTORY_BASE_PATH: &str = "https://admin.googleapis.com/admin/directory/v1/";
/// Default base path of the Groups Settings API.
pub const GROUP_SETTINGS_BASE_PATH: &str = "https://www.googleapis.com/groups/v1/groups/";

/// Name the logging transport tags its records with.
pub const LOGGING_TRANSPORT_NAME: &str = "Google";

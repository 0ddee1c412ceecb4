use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// The last credential is cached and reused until it stops being valid, at which
/// point the loader is asked again. Cloning a signer shares the cache.
#[derive(Clone)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Debug for Signer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("loader", &self.loader)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Return a valid credential, loading a fresh one if the cached one is missing or stale.
    pub async fn credential(&self) -> Result<Option<K>> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if cached.is_valid() {
            return Ok(cached);
        }

        debug!("cached credential is missing or invalid, loading a new one");
        let loaded = self.loader.provide_credential(&self.ctx).await?;
        *self.credential.lock().expect("lock poisoned") = loaded.clone();
        Ok(loaded)
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let credential = self.credential().await?;

        self.builder
            .sign_request(&self.ctx, req, credential.as_ref())
            .await
    }
}

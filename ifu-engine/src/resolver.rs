//! Completes a partially scanned identity with one remote lookup.

use std::collections::HashMap;
use std::sync::Arc;

use scan_payload::ResolvedIdentity;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument};

use crate::backend::{IfuBackend, LookupResponse};
use crate::error_handler::{EngineResult, IfuEngineError};

type SharedLookup = Arc<OnceCell<EngineResult<LookupResponse>>>;

/// Resolves `model -> assistantid/containerid`.
///
/// Concurrent callers asking for the same model while a lookup is in flight
/// await that lookup instead of issuing their own. Entries are dropped as
/// soon as the lookup finishes; nothing is cached across scans.
pub struct IdentifierResolver<B> {
    backend: Arc<B>,
    in_flight: Mutex<HashMap<String, SharedLookup>>,
}

impl<B: IfuBackend> IdentifierResolver<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the completed identity.
    ///
    /// - `assistantid` already known: returned unchanged, no remote call.
    /// - only `model` known: one `get_ifu` lookup; `model` is kept as scanned.
    /// - nothing known: returned unchanged.
    ///
    /// # Errors
    /// - [`IfuEngineError::NotFound`] if the backend has no document for the model.
    /// - Transport/HTTP/decode errors from the lookup.
    #[instrument(skip_all, fields(model = %identity.model))]
    pub async fn resolve(&self, identity: ResolvedIdentity) -> EngineResult<ResolvedIdentity> {
        if !identity.needs_lookup() {
            debug!("identity needs no lookup");
            return Ok(identity);
        }

        let lookup = self.lookup_shared(&identity.model).await?;

        let Some(assistantid) = lookup.assistantid() else {
            info!("no IFU registered for model");
            return Err(IfuEngineError::NotFound {
                model: identity.model,
            });
        };

        let resolved = ResolvedIdentity {
            assistantid: assistantid.to_string(),
            containerid: lookup
                .containerid()
                .map(str::to_string)
                .unwrap_or(identity.containerid),
            ..identity
        };
        info!(assistantid = %resolved.assistantid, "identity resolved");
        Ok(resolved)
    }

    async fn lookup_shared(&self, model: &str) -> EngineResult<LookupResponse> {
        let cell = {
            let mut map = self.in_flight.lock().await;
            Arc::clone(map.entry(model.to_string()).or_default())
        };

        let outcome = cell
            .get_or_init(|| async {
                debug!(%model, "starting lookup");
                self.backend.get_ifu(model).await
            })
            .await
            .clone();

        // A newer lookup for the same model may already own the entry.
        let mut map = self.in_flight.lock().await;
        if map.get(model).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
            map.remove(model);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{FakeBackend, transport};
    use std::sync::atomic::Ordering;
    use tokio::sync::Notify;

    fn found(assistantid: &str, containerid: &str) -> EngineResult<LookupResponse> {
        Ok(LookupResponse {
            assistantid: Some(assistantid.into()),
            containerid: Some(containerid.into()),
        })
    }

    #[tokio::test]
    async fn known_document_skips_lookup() {
        let backend = Arc::new(FakeBackend::default());
        let resolver = IdentifierResolver::new(Arc::clone(&backend));
        let id = ResolvedIdentity {
            model: "Vista 300".into(),
            assistantid: "ifus/Vista_300.pdf".into(),
            ..ResolvedIdentity::default()
        };

        assert_eq!(resolver.resolve(id.clone()).await.unwrap(), id);
        assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_identity_is_a_no_op() {
        let backend = Arc::new(FakeBackend::default());
        let resolver = IdentifierResolver::new(Arc::clone(&backend));

        let out = resolver.resolve(ResolvedIdentity::default()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lookup_merges_ids_and_keeps_model() {
        let backend = Arc::new(FakeBackend::default().with_lookup(found("a1", "c1")));
        let resolver = IdentifierResolver::new(Arc::clone(&backend));
        let scanned = ResolvedIdentity {
            model: "Vista 300".into(),
            device_type: "ventilator".into(),
            ..ResolvedIdentity::default()
        };

        let out = resolver.resolve(scanned).await.unwrap();
        assert_eq!(out.model, "Vista 300");
        assert_eq!(out.assistantid, "a1");
        assert_eq!(out.containerid, "c1");
        assert_eq!(out.device_type, "ventilator");
    }

    #[tokio::test]
    async fn blank_assistantid_is_not_found() {
        let backend = Arc::new(FakeBackend::default().with_lookup(found("", "c1")));
        let resolver = IdentifierResolver::new(backend);

        let err = resolver
            .resolve(ResolvedIdentity::from_model("X-1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IfuEngineError::NotFound {
                model: "X-1".into()
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let backend = Arc::new(FakeBackend::default().with_lookup(Err(transport("reset"))));
        let resolver = IdentifierResolver::new(backend);

        let err = resolver
            .resolve(ResolvedIdentity::from_model("X-1"))
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_request() {
        let gate = Arc::new(Notify::new());
        let backend =
            Arc::new(FakeBackend::gated(Arc::clone(&gate)).with_lookup(found("a1", "c1")));
        let resolver = IdentifierResolver::new(Arc::clone(&backend));

        let release = async {
            while backend.lookups.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            // let the second caller reach the shared cell
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        };

        let (a, b, ()) = tokio::join!(
            resolver.resolve(ResolvedIdentity::from_model("Vista 300")),
            resolver.resolve(ResolvedIdentity::from_model("Vista 300")),
            release,
        );

        assert_eq!(a.unwrap().assistantid, "a1");
        assert_eq!(b.unwrap().assistantid, "a1");
        assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn finished_lookup_is_not_reused() {
        let backend = Arc::new(FakeBackend::default().with_lookup(found("a1", "")));
        let resolver = IdentifierResolver::new(Arc::clone(&backend));

        resolver
            .resolve(ResolvedIdentity::from_model("M"))
            .await
            .unwrap();
        resolver
            .resolve(ResolvedIdentity::from_model("M"))
            .await
            .unwrap();
        assert_eq!(backend.lookups.load(Ordering::SeqCst), 2);
    }
}

//! Identity resolution for chemical mentions.
//!
//! Given a free-text label plus an optional structured identifier
//! (InChIKey), decide which canonical chemical the mention refers to, or
//! create a new one. Exact identifier hits are trusted; identifiers that
//! miss the store lose to a strong embedding match, because extraction
//! passes are known to hallucinate keys. Unused identifiers are
//! quarantined for human review rather than silently dropped.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::traits::{ChemicalRegistry, Embedder};
use crate::types::chemical::{canonicalize, is_valid_inchikey, ChemicalRole, Resolution};
use crate::types::config::IngestConfig;

/// A non-creating resolution hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupHit {
    pub chemical_id: Uuid,
    /// Alias the embedding search matched on; `None` for exact-key hits.
    pub alias_id: Option<Uuid>,
}

/// Resolver service over the alias registry and an embedding provider.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: IngestConfig,
}

impl Resolver {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Resolve a mention, creating the entity when nothing matches.
    ///
    /// Priority order:
    /// 1. syntactically valid identifier, exact store hit;
    /// 2. nearest alias by vector distance, below the threshold;
    /// 3. create a new chemical (identifier attached only if valid).
    ///
    /// Always finishes by ensuring an alias row for the canonicalized
    /// input label. A malformed identifier never fails the operation.
    pub async fn resolve<S, E>(
        &self,
        store: &mut S,
        embedder: &E,
        identifier: Option<&str>,
        label: &str,
        role: ChemicalRole,
        document_id: Option<Uuid>,
    ) -> Result<Resolution>
    where
        S: ChemicalRegistry,
        E: Embedder,
    {
        let valid_key = identifier.filter(|k| is_valid_inchikey(k));
        if identifier.is_some() && valid_key.is_none() {
            warn!(label, identifier, "malformed identifier, ignoring as key");
        }

        // Aliases live under the canonical form so case and whitespace
        // variants of one surface form collapse to a single row.
        let canon = canonicalize(label);
        // Computed up front: every path needs it for alias maintenance.
        let embedding = embedder.embed(&canon).await?;

        if let Some(key) = valid_key {
            if let Some(chemical_id) = store.find_chemical_by_inchikey(key).await? {
                debug!(label, key, %chemical_id, "resolved by exact identifier");
                let alias_id = store
                    .ensure_alias(chemical_id, &canon, &embedding, false)
                    .await?;
                return Ok(Resolution {
                    chemical_id,
                    alias_id: Some(alias_id),
                    created: false,
                    identifier_quarantined: false,
                });
            }
        }

        if let Some(hit) = store.nearest_alias(&embedding).await? {
            debug!(label, distance = hit.distance, "nearest alias");
            if hit.distance < self.config.similarity_threshold {
                // Semantic similarity wins over an identifier the store has
                // never seen; park the identifier for review instead.
                let quarantined = match identifier {
                    Some(id) => {
                        warn!(label, identifier = id, "identifier unused, quarantining");
                        store
                            .quarantine_identifier(id, label, Some(hit.chemical_id), document_id)
                            .await?;
                        true
                    }
                    None => false,
                };
                let alias_id = store
                    .ensure_alias(hit.chemical_id, &canon, &embedding, false)
                    .await?;
                return Ok(Resolution {
                    chemical_id: hit.chemical_id,
                    alias_id: Some(alias_id),
                    created: false,
                    identifier_quarantined: quarantined,
                });
            }
        }

        // Truly new.
        let chemical_id = store
            .insert_chemical(valid_key, label, role, &embedding)
            .await?;
        info!(label, ?valid_key, %chemical_id, "created new chemical");
        let quarantined = match (identifier, valid_key) {
            (Some(id), None) => {
                store
                    .quarantine_identifier(id, label, Some(chemical_id), document_id)
                    .await?;
                true
            }
            _ => false,
        };
        let alias_id = store.ensure_alias(chemical_id, &canon, &embedding, true).await?;
        Ok(Resolution {
            chemical_id,
            alias_id: Some(alias_id),
            created: true,
            identifier_quarantined: quarantined,
        })
    }

    /// Read-only resolution: exact identifier, then embedding search.
    ///
    /// Used where caller policy disallows creation (the property pass: the
    /// agents pass should already have inserted the chemical). Performs no
    /// writes at all.
    pub async fn lookup<S, E>(
        &self,
        store: &mut S,
        embedder: &E,
        identifier: Option<&str>,
        label: &str,
    ) -> Result<Option<LookupHit>>
    where
        S: ChemicalRegistry,
        E: Embedder,
    {
        if let Some(key) = identifier.filter(|k| is_valid_inchikey(k)) {
            if let Some(chemical_id) = store.find_chemical_by_inchikey(key).await? {
                return Ok(Some(LookupHit {
                    chemical_id,
                    alias_id: None,
                }));
            }
        }

        let embedding = embedder.embed(&canonicalize(label)).await?;
        if let Some(hit) = store.nearest_alias(&embedding).await? {
            if hit.distance < self.config.similarity_threshold {
                return Ok(Some(LookupHit {
                    chemical_id: hit.chemical_id,
                    alias_id: Some(hit.alias_id),
                }));
            }
        }

        Ok(None)
    }
}

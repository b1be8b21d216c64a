//! Resolution Coordinator: the engine proper.
//!
//! Drives the Phase A-F algorithm over whatever `RangeAllocation`/
//! `AuditSink` pair the caller hands it. The coordinator itself never
//! touches a database connection or a transaction — that's `lsk-db`'s
//! job. Whether Phase B and Phase E end up sharing one transaction (the
//! recommended default) or running on two separate connections is
//! entirely a property of what the caller passes in; see `resolve` vs
//! `resolve_split` below.

use indexmap::IndexMap;
use lsk_core::{AuditRecord, Placeholder, RangeInfo, RangeKey, ResolutionError, ResolutionResult, ResolvedPlaceholder};
use tracing::{debug, info, instrument};

use crate::traits::{AuditSink, RangeAllocation};

/// Inputs to one `resolve` call.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub module_name: String,
    pub input_xml: String,
    pub dev_email: String,
}

#[derive(Debug, Default)]
pub struct ResolutionCoordinator;

impl ResolutionCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Run the full algorithm with `allocator` and `audit` sharing
    /// whatever transactional scope the caller constructed them with.
    /// This is the recommended default: when `allocator` and `audit` are
    /// backed by the same Postgres transaction, the advisory lock taken
    /// in Phase B stays held through the Phase E commit, so no other
    /// request can observe a stale `MAX(end_value)` in between.
    #[instrument(skip_all, fields(module = %req.module_name))]
    pub async fn resolve<A, S>(&self, allocator: &A, audit: &S, req: &ResolveRequest) -> ResolutionResult<String>
    where
        A: RangeAllocation,
        S: AuditSink,
    {
        self.resolve_inner(allocator, audit, req).await
    }

    /// Run the algorithm accepting the narrower guarantee of the literal
    /// two-transaction protocol: if `allocator` and `audit` are backed by
    /// independent connections, the advisory lock is released when
    /// Phase B's transaction commits, opening a window before Phase E
    /// commits in which a concurrent request could read the same
    /// `MAX(end_value)`. Prefer `resolve` unless a separate connection
    /// for the audit write is a hard requirement.
    #[instrument(skip_all, fields(module = %req.module_name))]
    pub async fn resolve_split<A, S>(&self, allocator: &A, audit: &S, req: &ResolveRequest) -> ResolutionResult<String>
    where
        A: RangeAllocation,
        S: AuditSink,
    {
        tracing::warn!(
            "resolve_split drives Phase B and Phase E as independent transactions; \
             concurrent requests for the same RangeKey may observe a stale MAX(end_value) \
             in the window between Phase B's commit and Phase E's commit"
        );
        self.resolve_inner(allocator, audit, req).await
    }

    async fn resolve_inner<A, S>(&self, allocator: &A, audit: &S, req: &ResolveRequest) -> ResolutionResult<String>
    where
        A: RangeAllocation,
        S: AuditSink,
    {
        if req.module_name.is_empty() {
            return Err(ResolutionError::InvalidArgument("moduleName is empty".to_string()));
        }
        if req.dev_email.is_empty() {
            return Err(ResolutionError::InvalidArgument("devEmail is empty".to_string()));
        }
        if req.input_xml.is_empty() {
            return Err(ResolutionError::InvalidArgument("xmlContent is empty".to_string()));
        }

        debug!("scanning");
        let pk_matches = lsk_scanner::scan_pk(&req.input_xml)?;
        let fk_matches = lsk_scanner::scan_fk(&req.input_xml)?;

        if pk_matches.is_empty() && fk_matches.is_empty() {
            info!("no placeholders found, returning input unchanged");
            return Ok(req.input_xml.clone());
        }

        debug!(pk_count = pk_matches.len(), fk_count = fk_matches.len(), "allocating");
        let (pk_map, per_key) = self.allocate(allocator, &req.module_name, pk_matches).await?;

        debug!("resolving references");
        let final_map = Self::resolve_fks(&pk_map, fk_matches)?;

        debug!("substituting");
        let resolved_xml = substitute(&req.input_xml, &final_map);

        debug!(range_keys = per_key.len(), "writing audit rows");
        self.audit(audit, &req.dev_email, &per_key, &final_map).await?;

        info!("resolved");
        Ok(resolved_xml)
    }

    async fn allocate<A: RangeAllocation>(
        &self,
        allocator: &A,
        module_name: &str,
        pk_matches: lsk_scanner::PkMatches,
    ) -> ResolutionResult<(IndexMap<Placeholder, ResolvedPlaceholder>, IndexMap<RangeKey, RangeInfo>)> {
        let mut next_value: IndexMap<RangeKey, i64> = IndexMap::new();
        let mut per_key: IndexMap<RangeKey, RangeInfo> = IndexMap::new();
        let mut pk_map: IndexMap<Placeholder, ResolvedPlaceholder> = IndexMap::new();

        for (placeholder, fragments) in pk_matches {
            let key = RangeKey::new(placeholder.table(), placeholder.column(), module_name);

            let assigned = match next_value.get(&key) {
                Some(&v) => v,
                None => allocator.next_starting_value(&key).await?,
            };
            next_value.insert(key.clone(), assigned + 1);

            let info = per_key.entry(key.clone()).or_default();
            info.record_assignment(assigned);
            info.fragments.extend(fragments);

            let resolved = ResolvedPlaceholder {
                table: key.table.clone(),
                column: key.column.clone(),
                module: key.module.clone(),
                value: assigned,
            };
            info.mapping.insert(placeholder.to_string(), resolved.to_string());
            pk_map.insert(placeholder, resolved);
        }

        Ok((pk_map, per_key))
    }

    fn resolve_fks(
        pk_map: &IndexMap<Placeholder, ResolvedPlaceholder>,
        fk_matches: lsk_scanner::FkMatches,
    ) -> ResolutionResult<IndexMap<String, String>> {
        let mut final_map: IndexMap<String, String> = IndexMap::new();

        for (ref_string, target) in fk_matches {
            let resolved = pk_map
                .get(&target)
                .ok_or_else(|| ResolutionError::UnresolvedReference(target.to_string()))?;
            final_map.insert(ref_string, resolved.to_string());
        }

        for (placeholder, resolved) in pk_map {
            final_map.insert(placeholder.to_string(), resolved.to_string());
        }

        Ok(final_map)
    }

    async fn audit<S: AuditSink>(
        &self,
        audit: &S,
        dev_email: &str,
        per_key: &IndexMap<RangeKey, RangeInfo>,
        final_map: &IndexMap<String, String>,
    ) -> ResolutionResult<()> {
        for (key, info) in per_key {
            let (first, last) = match (info.first_value, info.last_value) {
                (Some(f), Some(l)) => (f, l),
                _ => {
                    return Err(ResolutionError::Internal(format!(
                        "RangeInfo for {key} has no recorded assignments"
                    )))
                }
            };

            let placeholder_mapping = serde_json::to_value(&info.mapping)
                .map_err(|e| ResolutionError::Internal(format!("serializing placeholder_mapping: {e}")))?;
            let source_xml_elements = info.fragments.join("\n");
            let resolved_xml_elements = info
                .fragments
                .iter()
                .map(|fragment| substitute(fragment, final_map))
                .collect::<Vec<_>>()
                .join("\n");

            let record = AuditRecord {
                dev_email: dev_email.to_string(),
                table: key.table.clone(),
                column: key.column.clone(),
                module: key.module.clone(),
                start_value: first,
                end_value: last,
                placeholder_mapping,
                source_xml_elements,
                resolved_xml_elements,
            };

            audit.insert(&record).await?;
        }

        Ok(())
    }
}

/// Replace every quoted occurrence of each key in `replacements` with its
/// quoted value. Safe to apply in any order: keys are pairwise
/// non-overlapping by construction (none is a substring of another's
/// replacement after quoting).
fn substitute(text: &str, replacements: &IndexMap<String, String>) -> String {
    let mut out = text.to_string();
    for (from, to) in replacements {
        out = out.replace(&format!("\"{from}\""), &format!("\"{to}\""));
    }
    out
}

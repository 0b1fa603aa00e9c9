// ==========================================
// Vendas Ingest - employee name resolution
// ==========================================
// Maps a raw employee token to (store name, operator name).
// Two strategies coexist as pipeline variants:
// - static mapping: token -> store via the configured table,
//   identity fallback for unmapped tokens (permissive)
// - filename scoping: the store is derived once per file from
//   the filename; operator matching happens later, against the
//   store's registered operators only (fail closed)
// Pure logic over injected configuration; no storage access.
// ==========================================

use crate::config::IngestConfig;

/// Outcome of static-mapping resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub store_name: String,
    pub operator_name: String,
}

// ==========================================
// NameResolver
// ==========================================
pub struct NameResolver<'a> {
    config: &'a IngestConfig,
}

impl<'a> NameResolver<'a> {
    pub fn new(config: &'a IngestConfig) -> Self {
        Self { config }
    }

    /// Static-mapping strategy: exact lookup in the configured
    /// operator->store table.
    ///
    /// Tokens absent from the table resolve to themselves as both
    /// store and operator name. That permissive default is
    /// deliberate: a new branch export names the branch itself in
    /// the employee column.
    pub fn resolve_mapped(&self, employee_token: &str) -> ResolvedName {
        let store_name = self
            .config
            .operator_store_map
            .get(employee_token)
            .cloned()
            .unwrap_or_else(|| employee_token.to_string());

        ResolvedName {
            store_name,
            operator_name: employee_token.to_string(),
        }
    }

    /// Filename-scoped strategy: scan the uppercased filename for a
    /// known branch name (substring match).
    ///
    /// The first branch in configured order wins; no attempt is made
    /// to disambiguate multiple matches. None rejects the whole file.
    pub fn infer_store_from_filename(&self, filename: &str) -> Option<String> {
        let upper = filename.to_uppercase();
        self.config
            .known_branches
            .iter()
            .find(|branch| upper.contains(branch.to_uppercase().as_str()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;

    #[test]
    fn test_resolve_mapped_known_operator() {
        let config = IngestConfig::default();
        let resolver = NameResolver::new(&config);

        let resolved = resolver.resolve_mapped("ROBERTO");
        assert_eq!(resolved.store_name, "Belvedere");
        assert_eq!(resolved.operator_name, "ROBERTO");

        let resolved = resolver.resolve_mapped("PILLY");
        assert_eq!(resolved.store_name, "Betim");
    }

    #[test]
    fn test_resolve_mapped_is_case_sensitive() {
        let config = IngestConfig::default();
        let resolver = NameResolver::new(&config);

        // "Egberto" is mapped with that exact casing; "EGBERTO" is not
        assert_eq!(resolver.resolve_mapped("Egberto").store_name, "Belvedere");
        assert_eq!(resolver.resolve_mapped("EGBERTO").store_name, "EGBERTO");
    }

    #[test]
    fn test_resolve_mapped_identity_fallback() {
        let config = IngestConfig::default();
        let resolver = NameResolver::new(&config);

        let resolved = resolver.resolve_mapped("Savassi");
        assert_eq!(resolved.store_name, "Savassi");
        assert_eq!(resolved.operator_name, "Savassi");
    }

    #[test]
    fn test_infer_store_from_filename() {
        let config = IngestConfig::default();
        let resolver = NameResolver::new(&config);

        assert_eq!(
            resolver.infer_store_from_filename("vendas_BETIM.csv"),
            Some("Betim".to_string())
        );
        assert_eq!(
            resolver.infer_store_from_filename("relatorio-contagem-setembro.csv"),
            Some("Contagem".to_string())
        );
        assert_eq!(resolver.infer_store_from_filename("vendas_savassi.csv"), None);
    }

    #[test]
    fn test_infer_store_first_match_wins() {
        let mut config = IngestConfig::default();
        config.known_branches = vec!["CONTAGEM".to_string(), "BETIM".to_string()];
        let resolver = NameResolver::new(&config);

        // Both branches appear; configured order decides
        assert_eq!(
            resolver.infer_store_from_filename("CONTAGEM_BETIM.csv"),
            Some("CONTAGEM".to_string())
        );
    }
}

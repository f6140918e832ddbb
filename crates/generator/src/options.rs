//! Per-call generation options

/// Default limit on relation nesting
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options controlling the shape of a generated schema
///
/// Options are immutable per call; nested relations receive a copy with
/// `id_mode` recomputed for their level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Only primary key fields (and primary relations) are generated
    pub id_mode: bool,

    /// Every relation is generated as identity only, whatever its include flag
    pub ignore_includes: bool,

    /// Entities with a single key accept the bare key value as well as the
    /// wrapping object. Only effective together with `id_mode`.
    pub use_mixed_ids: bool,

    /// Relation nesting deeper than this fails with `DepthExceeded`
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            id_mode: false,
            ignore_includes: false,
            use_mixed_ids: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    /// All flags off
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity-only options
    pub fn ids() -> Self {
        Self::new().id_mode(true)
    }

    /// Restrict the schema to primary key columns and relations
    pub fn id_mode(mut self, enabled: bool) -> Self {
        self.id_mode = enabled;
        self
    }

    /// Reduce every relation to its identity schema, whatever its `include` flag
    pub fn ignore_includes(mut self, enabled: bool) -> Self {
        self.ignore_includes = enabled;
        self
    }

    /// Accept a bare key value for single-key entities in identity schemas
    pub fn use_mixed_ids(mut self, enabled: bool) -> Self {
        self.use_mixed_ids = enabled;
        self
    }

    /// Set how many relation levels may nest below the root entity
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Options for the entity behind a relation
    ///
    /// The related entity is generated in full only when the relation is
    /// included and neither `id_mode` nor `ignore_includes` is set here.
    pub fn nested(&self, include: bool) -> Self {
        Self {
            id_mode: !include || self.id_mode || self.ignore_includes,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::new();
        assert!(!options.id_mode);
        assert!(!options.ignore_includes);
        assert!(!options.use_mixed_ids);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(Options::ids().id_mode);
    }

    #[test]
    fn test_nested_id_mode() {
        let full = Options::new();
        assert!(!full.nested(true).id_mode);
        assert!(full.nested(false).id_mode);

        assert!(Options::ids().nested(true).id_mode);
        assert!(Options::new().ignore_includes(true).nested(true).id_mode);
    }

    #[test]
    fn test_nested_keeps_other_flags() {
        let options = Options::new()
            .ignore_includes(true)
            .use_mixed_ids(true)
            .max_depth(4);
        let nested = options.nested(false);
        assert!(nested.ignore_includes);
        assert!(nested.use_mixed_ids);
        assert_eq!(nested.max_depth, 4);
    }
}
